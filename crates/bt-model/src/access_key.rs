//! Shared access keys: named, typed locks referenced by access-limit decorators.

use crate::error::EditError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AccessKeyType {
    /// Limits how many behaviors hold the key at once.
    #[default]
    CounterLimit,
    /// The key stays locked for an interval after each access.
    TimeLimit,
}

string_enum!(AccessKeyType { CounterLimit, TimeLimit });

#[derive(Debug, Clone, PartialEq)]
pub enum AccessKey {
    CounterLimit { key: String, max_access_count: i32 },
    TimeLimit { key: String, time_interval: f32 },
}

impl AccessKey {
    pub fn counter_limit(key: impl Into<String>, max_access_count: i32) -> Self {
        AccessKey::CounterLimit {
            key: key.into(),
            max_access_count,
        }
    }

    pub fn time_limit(key: impl Into<String>, time_interval: f32) -> Self {
        AccessKey::TimeLimit {
            key: key.into(),
            time_interval,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            AccessKey::CounterLimit { key, .. } | AccessKey::TimeLimit { key, .. } => key,
        }
    }

    pub fn key_type(&self) -> AccessKeyType {
        match self {
            AccessKey::CounterLimit { .. } => AccessKeyType::CounterLimit,
            AccessKey::TimeLimit { .. } => AccessKeyType::TimeLimit,
        }
    }
}

/// A named collection of access keys, persisted as its own document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessKeySet {
    pub name: String,
    keys: Vec<AccessKey>,
}

impl AccessKeySet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: Vec::new(),
        }
    }

    pub fn keys(&self) -> &[AccessKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn find(&self, key: &str) -> Option<&AccessKey> {
        self.keys.iter().find(|k| k.key() == key)
    }

    /// Add a key; empty and duplicate names are refused.
    pub fn add(&mut self, key: AccessKey) -> Result<(), EditError> {
        if key.key().is_empty() {
            return Err(EditError::EmptyAccessKey);
        }
        if self.find(key.key()).is_some() {
            return Err(EditError::DuplicateAccessKey(key.key().to_string()));
        }
        self.keys.push(key);
        Ok(())
    }

    /// Append without checks (document loading).
    pub fn push(&mut self, key: AccessKey) {
        self.keys.push(key);
    }

    pub fn remove(&mut self, key: &str) -> Option<AccessKey> {
        let index = self.keys.iter().position(|k| k.key() == key)?;
        Some(self.keys.remove(index))
    }
}

/// Look up a set by name among the sets known to a compile.
pub fn find_set<'a>(sets: &'a [AccessKeySet], name: &str) -> Option<&'a AccessKeySet> {
    sets.iter().find(|s| s.name == name)
}

//! Shared access-keys document. The variant name of each key is its type discriminator.

use serde::{Deserialize, Serialize};

use bt_model::{AccessKey, AccessKeySet};

use crate::error::DocumentError;

fn one_i32() -> i32 {
    1
}

fn one_f32() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessKeysDocument {
    #[serde(default)]
    pub name: String,
    /// Number of keys; written for readers that want it, ignored on load.
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub keys: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AccessKeyRecord {
    CounterLimit(CounterLimitRecord),
    TimeLimit(TimeLimitRecord),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CounterLimitRecord {
    #[serde(default)]
    pub key: String,
    #[serde(default = "one_i32")]
    pub max_access_count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeLimitRecord {
    #[serde(default)]
    pub key: String,
    #[serde(default = "one_f32")]
    pub time_interval: f32,
}

impl From<&AccessKey> for AccessKeyRecord {
    fn from(key: &AccessKey) -> Self {
        match key {
            AccessKey::CounterLimit {
                key,
                max_access_count,
            } => AccessKeyRecord::CounterLimit(CounterLimitRecord {
                key: key.clone(),
                max_access_count: *max_access_count,
            }),
            AccessKey::TimeLimit { key, time_interval } => {
                AccessKeyRecord::TimeLimit(TimeLimitRecord {
                    key: key.clone(),
                    time_interval: *time_interval,
                })
            }
        }
    }
}

impl From<AccessKeyRecord> for AccessKey {
    fn from(record: AccessKeyRecord) -> Self {
        match record {
            AccessKeyRecord::CounterLimit(r) => AccessKey::counter_limit(r.key, r.max_access_count),
            AccessKeyRecord::TimeLimit(r) => AccessKey::time_limit(r.key, r.time_interval),
        }
    }
}

pub fn save_access_keys(set: &AccessKeySet) -> Result<String, DocumentError> {
    let keys = set
        .keys()
        .iter()
        .map(|k| serde_json::to_value(AccessKeyRecord::from(k)))
        .collect::<Result<Vec<_>, _>>()?;
    let doc = AccessKeysDocument {
        name: set.name.clone(),
        count: keys.len(),
        keys,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Keys of an unknown type are skipped with a warning; the rest of the set still loads.
pub fn load_access_keys(text: &str) -> Result<AccessKeySet, DocumentError> {
    let doc: AccessKeysDocument = serde_json::from_str(text)?;
    let mut set = AccessKeySet::new(doc.name);
    for (index, value) in doc.keys.into_iter().enumerate() {
        match serde_json::from_value::<AccessKeyRecord>(value) {
            Ok(record) => set.push(record.into()),
            Err(e) => tracing::warn!(set = %set.name, index, error = %e, "Skipped access key"),
        }
    }
    tracing::debug!(set = %set.name, keys = set.len(), "Loaded access keys");
    Ok(set)
}

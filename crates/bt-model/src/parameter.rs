//! Parameter definitions (on nodes) and parameter bindings (on edges).
//!
//! Both are a [`ParameterSet`]. A definition set is the schema a node declares; a binding set is
//! the value committed for one parent -> child attachment. [`ParameterSet::match_definitions`]
//! keeps the latter in step with the former.

use std::fmt;

use crate::error::EditError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ParameterType {
    #[default]
    Int,
    Bool,
    Float,
    String,
}

string_enum!(ParameterType { Int, Bool, Float, String });

impl ParameterType {
    /// Value used when a definition is created without one.
    pub fn default_value(self) -> &'static str {
        match self {
            ParameterType::Int | ParameterType::Float => "0",
            ParameterType::Bool => "false",
            ParameterType::String => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: ParameterType,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: ParameterType, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            value: value.into(),
        }
    }

    /// Parameter with the type's default value.
    pub fn of_type(name: impl Into<String>, ty: ParameterType) -> Self {
        Self::new(name, ty, ty.default_value())
    }

    /// Signature fragment used by code generation, e.g. `int count`.
    pub fn template(&self) -> String {
        format!("{} {}", self.ty.as_str().to_lowercase(), self.name)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

/// Ordered list of parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    params: Vec<Parameter>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.params.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Add a definition. Names must be non-empty and unique in the set.
    pub fn add(&mut self, param: Parameter) -> Result<(), EditError> {
        if param.name.is_empty() {
            return Err(EditError::EmptyParameterName);
        }
        if self.contains(&param.name) {
            return Err(EditError::DuplicateParameter(param.name));
        }
        self.params.push(param);
        Ok(())
    }

    /// Append without any checks. Loaders use this so malformed data reaches the compiler.
    pub fn push(&mut self, param: Parameter) {
        self.params.push(param);
    }

    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        let index = self.params.iter().position(|p| p.name == name)?;
        Some(self.params.remove(index))
    }

    /// Set the value of the first parameter called `name`.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.params.iter_mut().find(|p| p.name == name) {
            Some(p) => {
                p.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Reconcile these bindings with `definitions`.
    ///
    /// Bindings whose name is not defined are dropped, definitions without a binding are
    /// appended with their default value, and surviving bindings keep their order and value
    /// while taking the definition's type.
    pub fn match_definitions(&mut self, definitions: &ParameterSet) {
        self.params.retain(|p| definitions.contains(&p.name));
        for p in self.params.iter_mut() {
            if let Some(def) = definitions.get(&p.name) {
                p.ty = def.ty;
            }
        }
        for def in definitions.iter() {
            if !self.contains(&def.name) {
                self.params.push(def.clone());
            }
        }
    }

    /// Pure form of [`ParameterSet::match_definitions`].
    pub fn matched(&self, definitions: &ParameterSet) -> ParameterSet {
        let mut out = self.clone();
        out.match_definitions(definitions);
        out
    }

    /// Bindings for a fresh edge: every definition at its default value.
    pub fn from_definitions(definitions: &ParameterSet) -> ParameterSet {
        definitions.clone()
    }

    /// Argument list template, e.g. `(int count, bool loud)`. Empty sets render as "".
    pub fn template(&self) -> String {
        if self.params.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self.params.iter().map(Parameter::template).collect();
        format!("({})", parts.join(", "))
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{p}")?;
        }
        f.write_str(")")
    }
}

impl FromIterator<Parameter> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_template() {
        let set: ParameterSet = [
            Parameter::new("count", ParameterType::Int, "3"),
            Parameter::new("loud", ParameterType::Bool, "true"),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.to_string(), "(count = 3, loud = true)");
        assert_eq!(set.template(), "(int count, bool loud)");
        assert_eq!(ParameterSet::new().to_string(), "");
    }

    #[test]
    fn add_rejects_duplicates_and_empty_names() {
        let mut set = ParameterSet::new();
        set.add(Parameter::of_type("a", ParameterType::Int)).unwrap();
        assert_eq!(
            set.add(Parameter::of_type("a", ParameterType::Float)),
            Err(EditError::DuplicateParameter("a".into()))
        );
        assert_eq!(
            set.add(Parameter::of_type("", ParameterType::Float)),
            Err(EditError::EmptyParameterName)
        );
        assert_eq!(set.len(), 1);
    }
}

//! On-disk shapes of the behavior tree document.
//!
//! Enum-valued attributes are kept as strings here so an unknown value degrades into a load
//! warning instead of failing the record.

use serde::{Deserialize, Serialize};

use bt_model::{Parameter, ParameterSet, DEFAULT_STATE_NAME};

fn default_state() -> String {
    DEFAULT_STATE_NAME.to_string()
}

fn default_weight() -> f32 {
    1.0
}

/// A saved behavior tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TreeDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_state")]
    pub default_state: String,
    #[serde(default)]
    pub expand_methods: bool,
    /// Root of a document written before states existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_id: Option<i64>,
    #[serde(default)]
    pub behaviors: Vec<BehaviorRecord>,
    #[serde(default)]
    pub hierarchy: Vec<BehaviorChildren>,
}

/// Same document with every record left undecoded, so one bad record can be skipped.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawTreeDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_state")]
    pub default_state: String,
    #[serde(default)]
    pub expand_methods: bool,
    #[serde(default)]
    pub root_id: Option<i64>,
    #[serde(default)]
    pub behaviors: Vec<serde_json::Value>,
    #[serde(default)]
    pub hierarchy: Vec<serde_json::Value>,
}

/// Node-local attributes of one behavior. Children live in the hierarchy section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BehaviorRecord {
    pub behavior_type: String,
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrent_properties: Option<ConcurrentRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decorator_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub never_fail: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ParameterRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConcurrentRecord {
    #[serde(default)]
    pub break_on_condition_failure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_policy: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DebugRecord {
    #[serde(default)]
    pub is_valid: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "Type")]
    pub ty: String,
    #[serde(default)]
    pub value: String,
}

impl From<&Parameter> for ParameterRecord {
    fn from(p: &Parameter) -> Self {
        Self {
            name: p.name.clone(),
            ty: p.ty.as_str().to_string(),
            value: p.value.clone(),
        }
    }
}

pub(crate) fn parameter_records(set: &ParameterSet) -> Vec<ParameterRecord> {
    set.iter().map(ParameterRecord::from).collect()
}

/// Ordered children of one parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BehaviorChildren {
    pub id: i64,
    #[serde(default)]
    pub children: Vec<BehaviorContainer>,
}

/// One edge: the child id and the bindings committed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BehaviorContainer {
    pub child_id: i64,
    #[serde(default)]
    pub parameters: Vec<ParameterRecord>,
}

use thiserror::Error;

use bt_model::EditError;

/// Something a load tolerated instead of failing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadWarning {
    #[error("dropped behavior record {index}: {reason}")]
    DroppedBehavior { index: usize, reason: String },
    #[error("dropped hierarchy entry {index}: {reason}")]
    DroppedHierarchy { index: usize, reason: String },
    #[error("hierarchy references unknown behavior id {id}")]
    UnresolvedEdge { id: i64 },
    #[error("edge {parent} -> {child} rejected: {reason}")]
    RejectedEdge {
        parent: i64,
        child: i64,
        reason: EditError,
    },
    #[error("'{value}' is not a valid {field} on '{node}', using {fallback}")]
    UnknownValue {
        node: String,
        field: &'static str,
        value: String,
        fallback: String,
    },
    #[error("'{node}' has no {field}, using {fallback}")]
    MissingValue {
        node: String,
        field: &'static str,
        fallback: String,
    },
    #[error("legacy document: promoted root '{0}' to the default state")]
    LegacyMigration(String),
    #[error("document has no states, created an empty '{0}' state")]
    SynthesizedDefaultState(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub(crate) fn push(&mut self, warning: LoadWarning) {
        match &warning {
            LoadWarning::LegacyMigration(_) | LoadWarning::SynthesizedDefaultState(_) => {
                tracing::info!("{warning}");
            }
            _ => tracing::warn!("{warning}"),
        }
        self.warnings.push(warning);
    }
}

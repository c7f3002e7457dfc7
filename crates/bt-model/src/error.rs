//! Errors raised by edit operations on the model.

use thiserror::Error;

use crate::node::NodeId;

/// An edit the model refused to apply. The tree is unchanged when one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
    #[error("behavior node '{0}' is a leaf and can not have children")]
    LeafNode(String),
    #[error("decorator '{0}' already has a child")]
    DecoratorOccupied(String),
    #[error("state '{0}' can not be attached as a child")]
    StateAsChild(String),
    #[error("state '{0}' can only be created with add_state")]
    StateNode(String),
    #[error("behavior node '{0}' is not a composite")]
    NotAComposite(String),
    #[error("composite '{0}' can not change into or out of a state")]
    StateKindChange(String),
    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("child index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("'{0}' is not a valid identifier")]
    InvalidName(String),
    #[error("a state named '{0}' already exists")]
    DuplicateStateName(String),
    #[error("there is no state named '{0}'")]
    UnknownState(String),
    #[error("{0} is not a state")]
    NotAState(NodeId),
    #[error("the last state of a behavior tree can not be removed")]
    LastState,
    #[error("weight must be greater than 0 (got {0})")]
    InvalidWeight(f32),
    #[error("behavior node '{0}' does not carry parameters")]
    NoParameters(String),
    #[error("parameter name can not be empty")]
    EmptyParameterName,
    #[error("a parameter named '{0}' already exists")]
    DuplicateParameter(String),
    #[error("there is no parameter named '{0}'")]
    UnknownParameter(String),
    #[error("access key name can not be empty")]
    EmptyAccessKey,
    #[error("an access key named '{0}' already exists")]
    DuplicateAccessKey(String),
    #[error("behavior node '{0}' is in the hierarchy and can not be deleted")]
    InHierarchy(String),
}

/// A string that does not name any variant of a model enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {type_name}")]
pub struct UnknownVariant {
    pub type_name: &'static str,
    pub value: String,
}

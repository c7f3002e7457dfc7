//! Behavior tree authoring model.
//!
//! A [`BehaviorTree`] owns every node it knows about in an arena addressed by [`NodeId`]. States
//! are the roots of the hierarchy; anything in the arena that no State reaches is an "extra"
//! behavior kept around so authors don't lose detached work.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

/// Gives a fieldless enum its canonical string form (`as_str`, `Display`, `FromStr`).
macro_rules! string_enum {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok($name::$variant),)+
                    _ => Err($crate::error::UnknownVariant {
                        type_name: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

pub mod access_key;
pub mod error;
pub mod node;
pub mod parameter;
pub mod tree;

pub use access_key::{AccessKey, AccessKeySet, AccessKeyType};
pub use error::{EditError, UnknownVariant};
pub use node::{
    AccessLimit, BehaviorType, ChangeState, ChildEdge, Composite, CompositeType, ConcurrencyMode,
    ConcurrentPolicy, DebugInfo, Decorator, DecoratorKind, DecoratorType, FailurePolicy, Leaf,
    Node, NodeId, NodeKind, PriorityType, SuccessPolicy,
};
pub use parameter::{Parameter, ParameterSet, ParameterType};
pub use tree::{is_identifier, BehaviorTree, TreeBuilder, DEFAULT_STATE_NAME};

//! Behavior tree compiler.
//!
//! Two independent passes: [`compile_tree`] checks a tree (structure, names, weights, access-key
//! references) and [`compile_access_keys`] checks one shared access-key set. Neither stops at the
//! first problem, and both are pure functions of their inputs.

#![forbid(unsafe_code)]

pub mod access_keys;
pub mod diagnostic;
pub mod tree;

pub use access_keys::{compile_access_keys, compile_access_keys_with};
pub use diagnostic::{CompileOptions, CompileResult, Diagnostic, Issue, Severity};
pub use tree::{compile_tree, compile_tree_with};

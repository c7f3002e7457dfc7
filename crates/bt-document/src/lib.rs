//! Behavior tree documents.
//!
//! A tree is saved as a flat list of behavior records keyed by a document-local id plus a
//! separate hierarchy section of parent -> children edges carrying each edge's parameter
//! bindings. Loading never fails on bad records: they are dropped and listed in the
//! [`LoadReport`] instead.

#![forbid(unsafe_code)]

pub mod access_keys;
pub mod error;
pub mod flatten;
pub mod reconstruct;
pub mod record;
pub mod report;
pub mod store;

pub use access_keys::{load_access_keys, save_access_keys, AccessKeyRecord, AccessKeysDocument};
pub use error::DocumentError;
pub use flatten::{assign_ids, flatten};
pub use reconstruct::LoadedTree;
pub use record::{BehaviorChildren, BehaviorContainer, BehaviorRecord, TreeDocument};
pub use report::{LoadReport, LoadWarning};
pub use store::{DocumentStore, FileStore};

use bt_model::{AccessKeySet, BehaviorTree};

/// Serialize a tree to its JSON document.
pub fn save_tree(tree: &BehaviorTree) -> Result<String, DocumentError> {
    Ok(serde_json::to_string_pretty(&flatten(tree))?)
}

/// Parse a tree document. Only a document that is not JSON at all is an error.
pub fn load_tree(text: &str) -> Result<LoadedTree, DocumentError> {
    let raw = serde_json::from_str(text)?;
    Ok(reconstruct::reconstruct(raw))
}

pub fn load_tree_from(store: &impl DocumentStore) -> Result<LoadedTree, DocumentError> {
    load_tree(&store.load()?)
}

pub fn save_tree_to(store: &impl DocumentStore, tree: &BehaviorTree) -> Result<(), DocumentError> {
    store.save(&save_tree(tree)?)
}

pub fn load_access_keys_from(store: &impl DocumentStore) -> Result<AccessKeySet, DocumentError> {
    load_access_keys(&store.load()?)
}

pub fn save_access_keys_to(
    store: &impl DocumentStore,
    set: &AccessKeySet,
) -> Result<(), DocumentError> {
    store.save(&save_access_keys(set)?)
}

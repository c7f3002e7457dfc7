//! Where documents live. The core only needs text in and text out.

use std::path::{Path, PathBuf};

use crate::error::DocumentError;

pub trait DocumentStore {
    fn load(&self) -> Result<String, DocumentError>;
    fn save(&self, text: &str) -> Result<(), DocumentError>;
}

/// A document stored in one file. Parent directories are created on save.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for FileStore {
    fn load(&self) -> Result<String, DocumentError> {
        Ok(std::fs::read_to_string(&self.path)?)
    }

    fn save(&self, text: &str) -> Result<(), DocumentError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, text)?;
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "Saved document");
        Ok(())
    }
}

//! Project configuration, loaded from .btree/config.yaml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH: &str = ".btree/config.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Config version
    pub version: Option<String>,

    /// Behavior tree documents (relative to project root)
    #[serde(default = "default_trees_dir")]
    pub trees_dir: PathBuf,

    /// Shared access-key documents (relative to project root)
    #[serde(default = "default_access_keys_dir")]
    pub access_keys_dir: PathBuf,

    #[serde(default)]
    pub compile: CompileConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Fail a compile on warnings too
    #[serde(default)]
    pub warnings_as_errors: bool,

    /// Compile every access-key set before the trees that use them
    #[serde(default = "default_true")]
    pub check_access_keys: bool,
}

fn default_trees_dir() -> PathBuf {
    PathBuf::from("trees")
}

fn default_access_keys_dir() -> PathBuf {
    PathBuf::from("access_keys")
}

fn default_true() -> bool {
    true
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            version: None,
            trees_dir: default_trees_dir(),
            access_keys_dir: default_access_keys_dir(),
            compile: CompileConfig::default(),
        }
    }
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            warnings_as_errors: false,
            check_access_keys: true,
        }
    }
}

impl ProjectConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// Load from project root, falling back to defaults when there is no config file
    pub fn load_from_project(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(CONFIG_PATH);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve paths relative to project root
    pub fn resolve_paths(&mut self, project_root: &Path) {
        self.trees_dir = project_root.join(&self.trees_dir);
        self.access_keys_dir = project_root.join(&self.access_keys_dir);
    }
}

pub const DEFAULT_CONFIG: &str = r#"# Behavior tree project configuration

version: "1"

trees_dir: trees
access_keys_dir: access_keys

compile:
  warnings_as_errors: false
  check_access_keys: true
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ProjectConfig::load_from_project(dir.path()).expect("config");
        assert_eq!(config.trees_dir, PathBuf::from("trees"));
        assert!(config.compile.check_access_keys);
        assert!(!config.compile.warnings_as_errors);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join(".btree")).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_PATH),
            "trees_dir: ai/trees\ncompile:\n  warnings_as_errors: true\n",
        )
        .unwrap();

        let mut config = ProjectConfig::load_from_project(dir.path()).expect("config");
        assert!(config.compile.warnings_as_errors);
        assert!(config.compile.check_access_keys);
        assert_eq!(config.access_keys_dir, PathBuf::from("access_keys"));

        config.resolve_paths(dir.path());
        assert_eq!(config.trees_dir, dir.path().join("ai/trees"));
    }

    #[test]
    fn default_config_parses() {
        let config: ProjectConfig = serde_yaml::from_str(DEFAULT_CONFIG).expect("parse");
        assert_eq!(config.version.as_deref(), Some("1"));
        assert_eq!(config.access_keys_dir, PathBuf::from("access_keys"));
    }
}

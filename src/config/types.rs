//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/extprofile/) and project (.extprofile.toml) level configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::{ExtProfileError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where profile and enablement state is persisted
    pub storage: StorageConfig,

    /// Marker walk settings
    pub detection: DetectionConfig,

    /// Installed-tool catalog sources
    pub catalog: CatalogConfig,

    /// Host enable/disable commands
    pub host: HostConfig,
}

impl Config {
    /// Validate configuration values.
    /// Returns `ExtProfileError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.storage.profiles_file.trim().is_empty() {
            return Err(ExtProfileError::Config(
                "storage.profiles_file must not be empty".to_string(),
            ));
        }

        if self.storage.enablement_file.trim().is_empty() {
            return Err(ExtProfileError::Config(
                "storage.enablement_file must not be empty".to_string(),
            ));
        }

        if self.storage.profiles_file == self.storage.enablement_file {
            return Err(ExtProfileError::Config(
                "storage.profiles_file and storage.enablement_file must differ".to_string(),
            ));
        }

        if self.host.timeout_secs == 0 {
            return Err(ExtProfileError::Config(
                "host.timeout_secs must be greater than 0".to_string(),
            ));
        }

        let templates = [
            ("host.enable", &self.host.enable),
            ("host.disable", &self.host.disable),
        ];
        for (key, template) in templates {
            if let Some(argv) = template
                && argv.first().is_none_or(|program| program.trim().is_empty())
            {
                return Err(ExtProfileError::Config(format!(
                    "{} must start with a program name",
                    key
                )));
            }
        }

        for pattern in &self.detection.exclude {
            glob::Pattern::new(pattern).map_err(|e| {
                ExtProfileError::Config(format!(
                    "Invalid detection.exclude pattern '{}': {}",
                    pattern, e
                ))
            })?;
        }

        Ok(())
    }
}

// =============================================================================
// Storage Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// State directory, relative to the project root
    pub dir: PathBuf,

    /// Profile document file name
    pub profiles_file: String,

    /// Enablement map file name
    pub enablement_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".vscode"),
            profiles_file: "extension-profiles.json".to_string(),
            enablement_file: "virtual-env-config.json".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn profiles_path(&self, root: &Path) -> PathBuf {
        root.join(&self.dir).join(&self.profiles_file)
    }

    pub fn enablement_path(&self, root: &Path) -> PathBuf {
        root.join(&self.dir).join(&self.enablement_file)
    }
}

// =============================================================================
// Detection Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Maximum walk depth for glob markers (None = unbounded)
    pub max_depth: Option<usize>,

    /// Glob patterns (relative to the root) skipped by glob markers
    pub exclude: Vec<String>,

    /// Honor .gitignore files during glob walks
    pub respect_gitignore: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            exclude: vec![
                "node_modules/**".to_string(),
                ".git/**".to_string(),
                "target/**".to_string(),
                "bin/**".to_string(),
                "obj/**".to_string(),
            ],
            respect_gitignore: true,
        }
    }
}

// =============================================================================
// Catalog Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON file listing installed tools
    pub path: Option<PathBuf>,

    /// Editor extensions directory to scan for manifests
    pub extensions_dir: Option<PathBuf>,
}

impl CatalogConfig {
    pub fn is_configured(&self) -> bool {
        self.path.is_some() || self.extensions_dir.is_some()
    }
}

// =============================================================================
// Host Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Enable command template, `{id}` is replaced by the identifier
    pub enable: Option<Vec<String>>,

    /// Disable command template, `{id}` is replaced by the identifier
    pub disable: Option<Vec<String>>,

    /// Per-command timeout
    pub timeout_secs: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            enable: None,
            disable: None,
            timeout_secs: 30,
        }
    }
}

impl HostConfig {
    /// Both templates are present, so a command host can be built
    pub fn has_commands(&self) -> bool {
        self.enable.is_some() && self.disable.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(!config.catalog.is_configured());
        assert!(!config.host.has_commands());
    }

    #[test]
    fn test_storage_paths_are_derived_from_root() {
        let storage = StorageConfig::default();
        let root = Path::new("/work/app");

        assert_eq!(
            storage.profiles_path(root),
            PathBuf::from("/work/app/.vscode/extension-profiles.json")
        );
        assert_eq!(
            storage.enablement_path(root),
            PathBuf::from("/work/app/.vscode/virtual-env-config.json")
        );
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.host.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_host_template() {
        let mut config = Config::default();
        config.host.enable = Some(vec![]);
        assert!(config.validate().is_err());

        config.host.enable = Some(vec!["code".to_string(), "{id}".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_exclude_glob() {
        let mut config = Config::default();
        config.detection.exclude.push("[unclosed".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_shared_file_name() {
        let mut config = Config::default();
        config.storage.enablement_file = config.storage.profiles_file.clone();
        assert!(config.validate().is_err());
    }
}

//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/extprofile/config.toml)
//! 3. Project config (<root>/.extprofile.toml)
//! 4. Environment variables (EXTPROFILE_* prefix, `__` between nested keys)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{ExtProfileError, Result, ResultExt};

/// Project config file name, relative to the project root
pub const PROJECT_CONFIG_FILE: &str = ".extprofile.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "EXTPROFILE_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load(root: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path(root);
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // EXTPROFILE_STORAGE__DIR -> storage.dir
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        Self::extract(figment)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| ExtProfileError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/extprofile/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("extprofile"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(PROJECT_CONFIG_FILE)
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path(root: &Path) {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path(root);
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(root: &Path, as_json: bool) -> Result<()> {
        let config = Self::load(root)?;

        if as_json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config)
                    .map_err(|e| ExtProfileError::Config(e.to_string()))?
            );
        }

        Ok(())
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a default project config file
    pub fn init_project(root: &Path, force: bool) -> Result<PathBuf> {
        let config_path = Self::project_config_path(root);

        if config_path.exists() && !force {
            return Err(ExtProfileError::Config(format!(
                "{} already exists. Use --force to overwrite.",
                config_path.display()
            )));
        }

        fs::write(&config_path, Self::default_project_config()).at_path(&config_path)?;
        info!("Created project config: {}", config_path.display());

        Ok(config_path)
    }

    /// Generate default project config content (TOML)
    fn default_project_config() -> String {
        r#"# extprofile project configuration
# Overrides ~/.config/extprofile/config.toml; EXTPROFILE_* env vars override this file.

[storage]
dir = ".vscode"
profiles_file = "extension-profiles.json"
enablement_file = "virtual-env-config.json"

[detection]
# max_depth = 6
exclude = ["node_modules/**", ".git/**", "target/**", "bin/**", "obj/**"]
respect_gitignore = true

[catalog]
# path = "installed-tools.json"
# extensions_dir = "~/.vscode/extensions"

[host]
# enable = ["code", "--enable-extension", "{id}"]
# disable = ["code", "--disable-extension", "{id}"]
timeout_secs = 30
"#
        .to_string()
    }
}

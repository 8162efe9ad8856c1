//! CLI Common Utilities
//!
//! Shared context for command handlers: resolved root, merged config,
//! installed catalog, host, and the opened workspace.

use std::path::PathBuf;

use tracing::debug;

use crate::catalog::InstalledCatalog;
use crate::config::{Config, ConfigLoader};
use crate::enablement::{CommandHost, ExtensionHost, SimulatedHost};
use crate::types::{ExtProfileError, Result};
use crate::workspace::Workspace;

/// Flags shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub root: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub extensions_dir: Option<PathBuf>,
}

/// Command execution context
pub struct CommandContext {
    pub workspace: Workspace,
    /// `None` when no catalog source is configured
    pub catalog: Option<InstalledCatalog>,
    pub host: Box<dyn ExtensionHost>,
}

impl CommandContext {
    /// Resolve the root, load config and catalog, pick a host, open the workspace
    pub async fn load(options: &GlobalOptions) -> Result<Self> {
        let root = resolve_root(options)?;
        let config = load_config(&root, options)?;

        let catalog = InstalledCatalog::load(&config.catalog).await?;
        let host = host_for(&config)?;
        debug!("Using {} host", host.name());

        let workspace = Workspace::open(Some(root), config).await?;

        Ok(Self {
            workspace,
            catalog,
            host,
        })
    }
}

/// `--root`, or the current directory
pub fn resolve_root(options: &GlobalOptions) -> Result<PathBuf> {
    match &options.root {
        Some(root) => Ok(root.clone()),
        None => std::env::current_dir().map_err(|e| {
            ExtProfileError::NoWorkspace(format!("cannot read current directory: {}", e))
        }),
    }
}

/// Merged config with catalog flags applied on top
pub fn load_config(root: &std::path::Path, options: &GlobalOptions) -> Result<Config> {
    let mut config = ConfigLoader::load(root)?;
    if let Some(path) = &options.catalog {
        config.catalog.path = Some(path.clone());
    }
    if let Some(dir) = &options.extensions_dir {
        config.catalog.extensions_dir = Some(dir.clone());
    }
    Ok(config)
}

/// Command host when both templates are configured, simulated otherwise
pub fn host_for(config: &Config) -> Result<Box<dyn ExtensionHost>> {
    Ok(match CommandHost::from_config(&config.host)? {
        Some(host) => Box::new(host),
        None => Box::new(SimulatedHost::new()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_catalog_config() {
        let temp_dir = TempDir::new().unwrap();
        let options = GlobalOptions {
            root: Some(temp_dir.path().to_path_buf()),
            catalog: Some(PathBuf::from("tools.json")),
            extensions_dir: None,
        };

        let config = load_config(temp_dir.path(), &options).unwrap();
        assert_eq!(config.catalog.path, Some(PathBuf::from("tools.json")));
        assert_eq!(resolve_root(&options).unwrap(), temp_dir.path());
    }

    #[test]
    fn test_host_defaults_to_simulated() {
        let host = host_for(&Config::default()).unwrap();
        assert_eq!(host.name(), "simulated");

        let mut config = Config::default();
        config.host.enable = Some(vec!["code".into(), "--enable-extension".into(), "{id}".into()]);
        config.host.disable = Some(vec!["code".into(), "--disable-extension".into(), "{id}".into()]);
        assert_eq!(host_for(&config).unwrap().name(), "command");
    }
}

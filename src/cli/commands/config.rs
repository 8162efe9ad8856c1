//! Config Command
//!
//! Usage:
//!   extprofile config show [-f json]
//!   extprofile config path
//!   extprofile config init [--force]

use crate::cli::ui::Output;
use crate::cli::util::{GlobalOptions, resolve_root};
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the merged configuration for the root
pub fn show(options: &GlobalOptions, format: &str) -> Result<()> {
    let root = resolve_root(options)?;
    ConfigLoader::show_config(&root, format == "json")
}

/// Show configuration file paths
pub fn path(options: &GlobalOptions) -> Result<()> {
    let root = resolve_root(options)?;
    ConfigLoader::show_path(&root);
    Ok(())
}

/// Write `.extprofile.toml` into the root
pub fn init(options: &GlobalOptions, force: bool) -> Result<()> {
    let root = resolve_root(options)?;
    let path = ConfigLoader::init_project(&root, force)?;

    Output::new().success(&format!("Created {}", path.display()));
    Ok(())
}

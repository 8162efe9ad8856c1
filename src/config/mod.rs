//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/extprofile/config.toml)
//! 3. Project config (<root>/.extprofile.toml)
//! 4. Environment variables (EXTPROFILE_*)

mod loader;
mod types;

pub use loader::{ConfigLoader, ENV_PREFIX, PROJECT_CONFIG_FILE};
pub use types::*;

//! extprofile - Project-aware tool profiles
//!
//! Classifies a project directory by its marker files and manages two
//! persisted profiles of companion-tool identifiers for it: a user-curated
//! custom profile and a recommended profile derived from the detected type.
//! Applying a profile reconciles per-tool enabled states with a host.
//!
//! ## Quick Start
//!
//! ```ignore
//! use extprofile::{Config, InstalledCatalog, ProfileKind, SimulatedHost, Workspace};
//!
//! let mut workspace = Workspace::open(Some(root), Config::default()).await?;
//! let project_type = workspace.detect().await?;
//! workspace
//!     .profiles_mut()
//!     .recommended_profile(project_type, Some(&catalog))
//!     .await?;
//! let report = workspace
//!     .profiles_mut()
//!     .apply_profile(ProfileKind::Recommended, &SimulatedHost::new())
//!     .await?;
//! ```
//!
//! ## Modules
//!
//! - [`detect`]: marker predicates and the ordered rule table
//! - [`catalog`]: recommended identifiers and installed-tool catalogs
//! - [`profile`]: custom and recommended profile store
//! - [`enablement`]: enablement map and host reconciliation
//! - [`storage`]: atomic JSON documents with per-path write serialization
//! - [`config`]: layered configuration

pub mod catalog;
pub mod cli;
pub mod config;
pub mod detect;
pub mod enablement;
pub mod profile;
pub mod storage;
pub mod types;
pub mod workspace;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader};
pub use types::error::{ErrorCategory, ExtProfileError, Result, ResultExt};
pub use types::{
    EnablementDocument, ExtensionEntry, InstalledTool, Profile, ProfileDocument, ProfileKind,
    ProjectType,
};
pub use workspace::Workspace;

// =============================================================================
// Component Re-exports
// =============================================================================

pub use catalog::{InstalledCatalog, recommended_identifiers};
pub use detect::{Detection, DetectionEngine, DetectionRule, Marker, default_rules};
pub use enablement::{
    CommandHost, EnablementStore, ExtensionHost, HostFailure, ReconcileReport, SimulatedHost,
};
pub use profile::{ProfileStore, ToggleOutcome};
pub use storage::{LoadStatus, WriteLocks};

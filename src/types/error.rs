//! Unified Error Type System
//!
//! Centralized error types for detection, profile storage and enablement.
//!
//! ## Error Categories
//!
//! - **Storage**: Unreadable root or unreadable/unwritable state file (fatal to the operation)
//! - **Corruption**: Malformed persisted data. Reported through `LoadStatus`, never
//!   as an error; a serialization failure on save is a Storage error
//! - **NoWorkspace**: No usable project root
//! - **Config**: Invalid configuration
//! - **Host**: A single host enable/disable call failed (collected, never aborts a batch)
//!
//! Unknown identifiers on toggle are not errors at all.

use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories for callers that route on error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Filesystem I/O failed
    Storage,
    /// Persisted data could not be decoded
    Corruption,
    /// No project root to operate on
    NoWorkspace,
    /// Invalid configuration or catalog source
    Config,
    /// Host enable/disable delegation failed
    Host,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage => write!(f, "STORAGE"),
            Self::Corruption => write!(f, "CORRUPTION"),
            Self::NoWorkspace => write!(f, "NO_WORKSPACE"),
            Self::Config => write!(f, "CONFIG"),
            Self::Host => write!(f, "HOST"),
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ExtProfileError {
    #[error("Storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No workspace: {0}")]
    NoWorkspace(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Catalog error in {source_name}: {message}")]
    Catalog {
        source_name: String,
        message: String,
    },

    #[error("Host failed for {identifier}: {message}")]
    Host { identifier: String, message: String },
}

pub type Result<T> = std::result::Result<T, ExtProfileError>;

impl ExtProfileError {
    /// Create a storage error for a path
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a host delegation error
    pub fn host(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Host {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Storage { .. } => ErrorCategory::Storage,
            Self::Json(_) => ErrorCategory::Storage,
            Self::NoWorkspace(_) => ErrorCategory::NoWorkspace,
            Self::Config(_) | Self::Catalog { .. } => ErrorCategory::Config,
            Self::Host { .. } => ErrorCategory::Host,
        }
    }

    /// Check if the error only affects a single identifier of a batch
    pub fn is_per_identifier(&self) -> bool {
        matches!(self, Self::Host { .. })
    }
}

/// Path context extension for I/O results
pub trait ResultExt<T> {
    /// Convert an I/O error into a storage error for `path`
    fn at_path(self, path: &Path) -> Result<T>;
}

impl<T> ResultExt<T> for std::io::Result<T> {
    fn at_path(self, path: &Path) -> Result<T> {
        self.map_err(|e| ExtProfileError::storage(path, e))
    }
}

// =============================================================================
// Tests
// =============================================================================

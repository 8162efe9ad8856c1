//! Typed JSON documents on disk
//!
//! Loads tolerate missing and malformed files (defaults plus a [`LoadStatus`]).
//! Saves are atomic: the whole document goes to a temp file in the target
//! directory, is synced, then renamed over the target.

use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::locks::WriteLocks;
use crate::types::{ExtProfileError, Result, ResultExt};

/// Outcome of loading a persisted document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// No file yet, defaults in use
    Missing,
    /// File decoded successfully
    Loaded,
    /// File was malformed, defaults in use
    CorruptionRecovered { reason: String },
}

impl LoadStatus {
    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::CorruptionRecovered { .. })
    }
}

/// JSON document of type `T` at a fixed path
#[derive(Debug, Clone)]
pub struct JsonFile<T> {
    path: PathBuf,
    locks: WriteLocks,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>, locks: WriteLocks) -> Self {
        Self {
            path: path.into(),
            locks,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, falling back to `T::default()` when the file is
    /// missing or malformed. Only real I/O failures are errors.
    pub async fn load(&self) -> Result<(T, LoadStatus)> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => match serde_json::from_str::<T>(&content) {
                Ok(value) => {
                    debug!("Loaded {}", self.path.display());
                    Ok((value, LoadStatus::Loaded))
                }
                Err(e) => {
                    warn!(
                        "Malformed {} ({}), falling back to defaults",
                        self.path.display(),
                        e
                    );
                    Ok((
                        T::default(),
                        LoadStatus::CorruptionRecovered {
                            reason: e.to_string(),
                        },
                    ))
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No file at {}, using defaults", self.path.display());
                Ok((T::default(), LoadStatus::Missing))
            }
            // Non-UTF-8 content is malformed data, not an I/O failure
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                warn!(
                    "Unreadable content in {} ({}), falling back to defaults",
                    self.path.display(),
                    e
                );
                Ok((
                    T::default(),
                    LoadStatus::CorruptionRecovered {
                        reason: e.to_string(),
                    },
                ))
            }
            Err(e) => Err(ExtProfileError::storage(&self.path, e)),
        }
    }

    /// Write the complete document atomically
    pub async fn save(&self, value: &T) -> Result<()> {
        let mut contents = serde_json::to_string_pretty(value)?;
        contents.push('\n');

        let _guard = self.locks.acquire(&self.path).await;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &contents))
            .await
            .map_err(|e| ExtProfileError::storage(&self.path, std::io::Error::other(e)))??;

        debug!("Saved {}", self.path.display());
        Ok(())
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent).at_path(parent)?;
    }

    let mut tmp = NamedTempFile::new_in(parent).at_path(parent)?;
    tmp.write_all(contents.as_bytes()).at_path(tmp.path())?;
    tmp.as_file().sync_all().at_path(tmp.path())?;

    tmp.persist(path)
        .map_err(|e| ExtProfileError::storage(path, e.error))?;

    Ok(())
}

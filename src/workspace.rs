//! Workspace Context
//!
//! Everything bound to one project root, built once and passed explicitly:
//! resolved root, configuration, detection engine, and the profile store
//! (which owns the enablement store). Both stores share one `WriteLocks`
//! registry so writes to the same file are serialized.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::detect::{Detection, DetectionEngine};
use crate::enablement::EnablementStore;
use crate::profile::ProfileStore;
use crate::storage::WriteLocks;
use crate::types::{ExtProfileError, ProjectType, Result};

pub struct Workspace {
    root: PathBuf,
    config: Config,
    engine: DetectionEngine,
    locks: WriteLocks,
    profiles: ProfileStore,
}

impl Workspace {
    /// Open the workspace at `root`.
    ///
    /// Fails with `NoWorkspace` when no root is given or it is not a directory.
    pub async fn open(root: Option<PathBuf>, config: Config) -> Result<Self> {
        let root = root.ok_or_else(|| {
            ExtProfileError::NoWorkspace("no project root was provided".to_string())
        })?;

        let is_dir = tokio::fs::metadata(&root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(ExtProfileError::NoWorkspace(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        let engine = DetectionEngine::new(&config.detection)?;
        let locks = WriteLocks::new();

        let enablement =
            EnablementStore::open(config.storage.enablement_path(&root), locks.clone()).await?;
        let profiles = ProfileStore::open(
            config.storage.profiles_path(&root),
            enablement,
            locks.clone(),
        )
        .await?;

        debug!("Opened workspace at {}", root.display());

        Ok(Self {
            root,
            config,
            engine,
            locks,
            profiles,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn locks(&self) -> &WriteLocks {
        &self.locks
    }

    pub fn engine(&self) -> &DetectionEngine {
        &self.engine
    }

    pub async fn detect(&self) -> Result<ProjectType> {
        self.engine.detect(&self.root).await
    }

    /// Detection with the matching rule
    pub async fn explain(&self) -> Result<Detection> {
        self.engine.explain(&self.root).await
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn profiles_mut(&mut self) -> &mut ProfileStore {
        &mut self.profiles
    }

    pub fn enablement(&self) -> &EnablementStore {
        self.profiles.enablement()
    }
}

//! Enablement Store
//!
//! Persisted `identifier → enabled` map for one project root, stored as
//! `{"extensionStates": {...}}`. Identifiers without a record are enabled.
//!
//! Reconciliation writes the map first, then pushes every state of the batch
//! to the host. Host failures are collected per identifier and never abort
//! the batch.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::host::ExtensionHost;
use crate::storage::{JsonFile, LoadStatus, WriteLocks};
use crate::types::{EnablementDocument, Result};

/// One state successfully pushed to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedState {
    pub identifier: String,
    pub enabled: bool,
}

/// One host call that failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostFailure {
    pub identifier: String,
    pub enabled: bool,
    pub message: String,
}

/// Outcome of pushing states to the host
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub host: String,
    pub applied: Vec<AppliedState>,
    pub failures: Vec<HostFailure>,
    pub finished_at: DateTime<Utc>,
}

impl ReconcileReport {
    /// Every host call succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> usize {
        self.applied.len() + self.failures.len()
    }
}

/// Owner of the enablement map file for one root
#[derive(Debug)]
pub struct EnablementStore {
    file: JsonFile<EnablementDocument>,
    document: EnablementDocument,
    load_status: LoadStatus,
}

impl EnablementStore {
    /// Load the map at `path`; malformed files start empty
    pub async fn open(path: impl Into<PathBuf>, locks: WriteLocks) -> Result<Self> {
        let file: JsonFile<EnablementDocument> = JsonFile::new(path, locks);
        let (document, load_status) = file.load().await?;
        Ok(Self {
            file,
            document,
            load_status,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// Recorded state, enabled when absent
    pub fn is_enabled(&self, identifier: &str) -> bool {
        self.document
            .extension_states
            .get(identifier)
            .copied()
            .unwrap_or(true)
    }

    /// Recorded states only
    pub fn states(&self) -> &BTreeMap<String, bool> {
        &self.document.extension_states
    }

    /// Record the desired states, persist, then push each one to the host
    pub async fn reconcile<I>(
        &mut self,
        entries: I,
        host: &dyn ExtensionHost,
    ) -> Result<ReconcileReport>
    where
        I: IntoIterator<Item = (String, bool)>,
    {
        let entries: Vec<(String, bool)> = entries.into_iter().collect();
        let previous = self.document.clone();
        for (identifier, enabled) in &entries {
            self.document
                .extension_states
                .insert(identifier.clone(), *enabled);
        }
        if let Err(e) = self.file.save(&self.document).await {
            // Nothing was pushed; keep memory in line with the file
            self.document = previous;
            return Err(e);
        }

        let report = push_states(host, &entries).await;
        info!(
            "Reconciled {} tools via {} host ({} failed)",
            report.total(),
            report.host,
            report.failures.len()
        );
        Ok(report)
    }

    /// Flip one identifier (absent counts as enabled), persist and push it
    pub async fn toggle(
        &mut self,
        identifier: &str,
        host: &dyn ExtensionHost,
    ) -> Result<ReconcileReport> {
        let enabled = !self.is_enabled(identifier);
        self.reconcile([(identifier.to_string(), enabled)], host)
            .await
    }

    /// Push every recorded state to the host again
    pub async fn reapply_all(&self, host: &dyn ExtensionHost) -> ReconcileReport {
        let entries: Vec<(String, bool)> = self
            .document
            .extension_states
            .iter()
            .map(|(id, enabled)| (id.clone(), *enabled))
            .collect();
        push_states(host, &entries).await
    }
}

async fn push_states(host: &dyn ExtensionHost, entries: &[(String, bool)]) -> ReconcileReport {
    let mut applied = Vec::new();
    let mut failures = Vec::new();

    for (identifier, enabled) in entries {
        match host.set_enabled(identifier, *enabled).await {
            Ok(()) => applied.push(AppliedState {
                identifier: identifier.clone(),
                enabled: *enabled,
            }),
            Err(e) => {
                warn!("Host {} failed for {}: {}", host.name(), identifier, e);
                failures.push(HostFailure {
                    identifier: identifier.clone(),
                    enabled: *enabled,
                    message: e.to_string(),
                });
            }
        }
    }

    ReconcileReport {
        host: host.name().to_string(),
        applied,
        failures,
        finished_at: Utc::now(),
    }
}

//! Profile Store
//!
//! Owns the custom and recommended profiles of one project root, persisted
//! together as a single JSON document. Every mutation is written through
//! before the call returns. Unknown identifiers are a silent no-op and never
//! trigger a write.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{InstalledCatalog, recommended_identifiers};
use crate::enablement::{EnablementStore, ExtensionHost, ReconcileReport};
use crate::storage::{JsonFile, LoadStatus, WriteLocks};
use crate::types::{ExtensionEntry, Profile, ProfileDocument, ProfileKind, ProjectType, Result};

/// Result of a toggle or add call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Added,
    Removed,
    Enabled,
    Disabled,
    /// Entry already present, nothing to do
    Unchanged,
    /// Identifier is neither in the profile nor in the catalog
    NotFound,
}

impl ToggleOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Unchanged | Self::NotFound)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::Unchanged => "unchanged",
            Self::NotFound => "not found",
        }
    }
}

impl std::fmt::Display for ToggleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ProfileStore {
    file: JsonFile<ProfileDocument>,
    document: ProfileDocument,
    load_status: LoadStatus,
    enablement: EnablementStore,
}

impl ProfileStore {
    /// Load the document at `path`. Missing or malformed files start with
    /// two empty profiles.
    pub async fn open(
        path: impl Into<PathBuf>,
        enablement: EnablementStore,
        locks: WriteLocks,
    ) -> Result<Self> {
        let file: JsonFile<ProfileDocument> = JsonFile::new(path, locks);
        let (mut document, load_status) = file.load().await?;

        for kind in [ProfileKind::Custom, ProfileKind::Recommended] {
            let profile = document.profile_mut(kind);
            profile.name = kind;
            let removed = profile.dedup();
            if removed > 0 {
                warn!("Dropped {} duplicate entries from {} profile", removed, kind);
            }
        }

        debug!(
            "Opened profiles at {} (custom: {}, recommended: {})",
            file.path().display(),
            document.custom_profile.len(),
            document.recommended_profile.len()
        );

        Ok(Self {
            file,
            document,
            load_status,
            enablement,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    pub fn document(&self) -> &ProfileDocument {
        &self.document
    }

    pub fn enablement(&self) -> &EnablementStore {
        &self.enablement
    }

    pub fn enablement_mut(&mut self) -> &mut EnablementStore {
        &mut self.enablement
    }

    pub fn custom_profile(&self) -> &Profile {
        &self.document.custom_profile
    }

    /// Stored profile, without generating anything
    pub fn profile(&self, kind: ProfileKind) -> &Profile {
        self.document.profile(kind)
    }

    // =========================================================================
    // Recommended profile
    // =========================================================================

    /// Recommended profile for `project_type`.
    ///
    /// Generated once, when the stored list is empty and a catalog is given:
    /// the catalog tools whose identifiers are recommended for the type, in
    /// catalog order. A non-empty stored list is returned as is.
    pub async fn recommended_profile(
        &mut self,
        project_type: ProjectType,
        catalog: Option<&InstalledCatalog>,
    ) -> Result<&Profile> {
        if let Some(catalog) = catalog
            && self.document.recommended_profile.is_empty()
        {
            let previous = self.document.clone();
            let recommended = recommended_identifiers(project_type);
            let extensions: Vec<ExtensionEntry> = catalog
                .iter()
                .filter(|tool| recommended.contains(&tool.identifier.as_str()))
                .map(ExtensionEntry::from_tool)
                .collect();

            info!(
                "Generated recommended profile for {}: {} of {} installed tools",
                project_type,
                extensions.len(),
                catalog.len()
            );
            self.document.recommended_profile.extensions = extensions;
            self.persist(previous).await?;
        }

        Ok(&self.document.recommended_profile)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Remove the entry if present, otherwise add it from the catalog
    pub async fn toggle_custom_extension(
        &mut self,
        identifier: &str,
        catalog: &InstalledCatalog,
    ) -> Result<ToggleOutcome> {
        let previous = self.document.clone();
        let custom = &mut self.document.custom_profile;

        let outcome = if let Some(index) = custom.position(identifier) {
            custom.extensions.remove(index);
            ToggleOutcome::Removed
        } else if let Some(tool) = catalog.get(identifier) {
            custom.extensions.push(ExtensionEntry::from_tool(tool));
            ToggleOutcome::Added
        } else {
            ToggleOutcome::NotFound
        };

        self.finish_mutation(ProfileKind::Custom, identifier, outcome, previous)
            .await
    }

    /// Add an installed tool to the custom profile unless already present
    pub async fn add_custom_extension(
        &mut self,
        identifier: &str,
        catalog: &InstalledCatalog,
    ) -> Result<ToggleOutcome> {
        let previous = self.document.clone();
        let custom = &mut self.document.custom_profile;

        let outcome = if custom.contains(identifier) {
            ToggleOutcome::Unchanged
        } else if let Some(tool) = catalog.get(identifier) {
            custom.extensions.push(ExtensionEntry::from_tool(tool));
            ToggleOutcome::Added
        } else {
            ToggleOutcome::NotFound
        };

        self.finish_mutation(ProfileKind::Custom, identifier, outcome, previous)
            .await
    }

    /// Flip `isEnabled` on a recommended entry
    pub async fn toggle_recommended_extension(&mut self, identifier: &str) -> Result<ToggleOutcome> {
        let previous = self.document.clone();
        let outcome = match self
            .document
            .recommended_profile
            .extensions
            .iter_mut()
            .find(|e| e.identifier == identifier)
        {
            Some(entry) => {
                entry.is_enabled = !entry.is_enabled;
                if entry.is_enabled {
                    ToggleOutcome::Enabled
                } else {
                    ToggleOutcome::Disabled
                }
            }
            None => ToggleOutcome::NotFound,
        };

        self.finish_mutation(ProfileKind::Recommended, identifier, outcome, previous)
            .await
    }

    /// Toggle within either profile. Custom toggles need the catalog to add.
    pub async fn toggle_extension(
        &mut self,
        kind: ProfileKind,
        identifier: &str,
        catalog: Option<&InstalledCatalog>,
    ) -> Result<ToggleOutcome> {
        match kind {
            ProfileKind::Custom => {
                let empty = InstalledCatalog::default();
                self.toggle_custom_extension(identifier, catalog.unwrap_or(&empty))
                    .await
            }
            ProfileKind::Recommended => self.toggle_recommended_extension(identifier).await,
        }
    }

    /// Clear a profile. The recommended one is regenerated on next request.
    pub async fn reset_profile(&mut self, kind: ProfileKind) -> Result<()> {
        let previous = self.document.clone();
        let profile = self.document.profile_mut(kind);
        let removed = profile.len();
        profile.extensions.clear();
        self.persist(previous).await?;

        info!("Reset {} profile ({} entries removed)", kind, removed);
        Ok(())
    }

    /// Push the profile's desired states through the enablement store
    pub async fn apply_profile(
        &mut self,
        kind: ProfileKind,
        host: &dyn ExtensionHost,
    ) -> Result<ReconcileReport> {
        let desired = self.document.profile(kind).desired_states();
        info!("Applying {} profile ({} entries)", kind, desired.len());
        self.enablement.reconcile(desired, host).await
    }

    async fn finish_mutation(
        &mut self,
        kind: ProfileKind,
        identifier: &str,
        outcome: ToggleOutcome,
        previous: ProfileDocument,
    ) -> Result<ToggleOutcome> {
        if outcome.changed() {
            self.persist(previous).await?;
            debug!("{} profile: {} {}", kind, identifier, outcome);
        } else {
            debug!("{} profile: {} {}, nothing written", kind, identifier, outcome);
        }
        Ok(outcome)
    }

    /// Save the document; on failure put `previous` back so the failed
    /// change is not kept in memory
    async fn persist(&mut self, previous: ProfileDocument) -> Result<()> {
        if let Err(e) = self.file.save(&self.document).await {
            warn!("Save of {} failed, change discarded", self.path().display());
            self.document = previous;
            return Err(e);
        }
        Ok(())
    }
}

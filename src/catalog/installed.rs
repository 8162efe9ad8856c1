//! Installed Tool Catalog
//!
//! Ordered, identifier-unique list of tools the host reports as installed.
//! The core never enumerates tools on its own; this type only loads the lists
//! a host hands over (a JSON file or an editor extensions directory).

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::CatalogConfig;
use crate::types::{ExtProfileError, InstalledTool, Result, ResultExt, log_filter_warn};

/// Installed-tool catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledCatalog {
    tools: Vec<InstalledTool>,
}

/// Subset of an editor extension manifest (`package.json`)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtensionManifest {
    publisher: String,
    name: String,
    display_name: Option<String>,
}

impl ExtensionManifest {
    fn into_tool(self) -> InstalledTool {
        let tool = InstalledTool::new(format!("{}.{}", self.publisher, self.name));
        match self.display_name {
            // %key% is an unresolved localization placeholder
            Some(name) if !(name.starts_with('%') && name.ends_with('%')) => {
                tool.with_display_name(name)
            }
            _ => tool,
        }
    }
}

impl InstalledCatalog {
    /// Build a catalog, keeping the first tool for each identifier
    pub fn new(tools: impl IntoIterator<Item = InstalledTool>) -> Self {
        let mut seen = HashSet::new();
        let tools = tools
            .into_iter()
            .filter(|t| seen.insert(t.identifier.clone()))
            .collect();
        Self { tools }
    }

    pub fn get(&self, identifier: &str) -> Option<&InstalledTool> {
        self.tools.iter().find(|t| t.identifier == identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.get(identifier).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstalledTool> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Display name of an installed tool, or its identifier
    pub fn display_name_for<'a>(&'a self, identifier: &'a str) -> &'a str {
        self.get(identifier).map_or(identifier, |t| t.label())
    }

    /// Append tools from `other` whose identifiers are not yet present
    pub fn merge(self, other: InstalledCatalog) -> Self {
        Self::new(self.tools.into_iter().chain(other.tools))
    }

    // =========================================================================
    // Sources
    // =========================================================================

    /// Read `[{"id": ..., "displayName": ...}, ...]`
    pub async fn from_json_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.at_path(path)?;
        let tools: Vec<InstalledTool> =
            serde_json::from_str(&content).map_err(|e| ExtProfileError::Catalog {
                source_name: path.display().to_string(),
                message: e.to_string(),
            })?;

        debug!("Read {} tools from {}", tools.len(), path.display());
        Ok(Self::new(tools))
    }

    /// Scan `<dir>/*/package.json` extension manifests.
    /// Entries without a manifest are skipped; unreadable or malformed
    /// manifests are skipped with a warning.
    pub async fn scan_extensions_dir(dir: &Path) -> Result<Self> {
        let mut entries = tokio::fs::read_dir(dir).await.at_path(dir)?;
        let mut tools = Vec::new();

        while let Some(entry) = entries.next_entry().await.at_path(dir)? {
            let manifest_path = entry.path().join("package.json");
            let content = match tokio::fs::read_to_string(&manifest_path).await {
                Ok(content) => content,
                Err(e)
                    if matches!(
                        e.kind(),
                        std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
                    ) =>
                {
                    continue;
                }
                Err(e) => {
                    warn!("Skipping unreadable manifest {}: {}", manifest_path.display(), e);
                    continue;
                }
            };
            let parsed = serde_json::from_str::<ExtensionManifest>(&content);
            if let Some(manifest) = log_filter_warn(parsed, "reading extension manifest") {
                tools.push(manifest.into_tool());
            }
        }

        tools.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        debug!("Found {} extensions in {}", tools.len(), dir.display());
        Ok(Self::new(tools))
    }

    /// Load every configured source. `None` when no source is configured.
    pub async fn load(config: &CatalogConfig) -> Result<Option<Self>> {
        if !config.is_configured() {
            return Ok(None);
        }

        let mut catalog = Self::default();
        if let Some(path) = &config.path {
            catalog = catalog.merge(Self::from_json_file(path).await?);
        }
        if let Some(dir) = &config.extensions_dir {
            catalog = catalog.merge(Self::scan_extensions_dir(dir).await?);
        }

        info!("Installed catalog: {} tools", catalog.len());
        Ok(Some(catalog))
    }
}

impl FromIterator<InstalledTool> for InstalledCatalog {
    fn from_iter<I: IntoIterator<Item = InstalledTool>>(iter: I) -> Self {
        Self::new(iter)
    }
}

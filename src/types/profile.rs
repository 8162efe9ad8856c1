//! Profile and tool types
//!
//! Serialized field names follow the persisted document layout:
//! `{"id", "name", "isEnabled", "isCompatible"}` per extension entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Installed tool descriptor supplied by the host. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledTool {
    #[serde(rename = "id")]
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl InstalledTool {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Display name, falling back to the identifier
    pub fn label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.identifier,
        }
    }
}

/// Profile member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionEntry {
    #[serde(rename = "id")]
    pub identifier: String,
    pub name: String,
    pub is_enabled: bool,
    pub is_compatible: bool,
}

impl ExtensionEntry {
    /// Entry for an installed tool, enabled and compatible
    pub fn from_tool(tool: &InstalledTool) -> Self {
        Self {
            identifier: tool.identifier.clone(),
            name: tool.label().to_string(),
            is_enabled: true,
            is_compatible: true,
        }
    }
}

/// Which of the two per-project profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileKind {
    Custom,
    Recommended,
}

impl ProfileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Custom => "Custom",
            Self::Recommended => "Recommended",
        }
    }
}

impl std::fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProfileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "custom" => Ok(Self::Custom),
            "recommended" => Ok(Self::Recommended),
            _ => Err(format!(
                "Invalid profile '{}'. Valid values: custom, recommended",
                s
            )),
        }
    }
}

/// Named, ordered set of extension entries, unique by identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: ProfileKind,
    #[serde(default)]
    pub extensions: Vec<ExtensionEntry>,
}

impl Profile {
    pub fn empty(kind: ProfileKind) -> Self {
        Self {
            name: kind,
            extensions: Vec::new(),
        }
    }

    pub fn position(&self, identifier: &str) -> Option<usize> {
        self.extensions
            .iter()
            .position(|e| e.identifier == identifier)
    }

    pub fn get(&self, identifier: &str) -> Option<&ExtensionEntry> {
        self.extensions.iter().find(|e| e.identifier == identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.position(identifier).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Desired `(identifier, enabled)` pairs in profile order
    pub fn desired_states(&self) -> Vec<(String, bool)> {
        self.extensions
            .iter()
            .map(|e| (e.identifier.clone(), e.is_enabled))
            .collect()
    }

    /// Drop repeated identifiers, keeping the first occurrence.
    /// Returns the number of removed entries.
    pub fn dedup(&mut self) -> usize {
        let before = self.extensions.len();
        let mut seen = std::collections::HashSet::new();
        self.extensions
            .retain(|e| seen.insert(e.identifier.clone()));
        before - self.extensions.len()
    }
}

fn default_custom() -> Profile {
    Profile::empty(ProfileKind::Custom)
}

fn default_recommended() -> Profile {
    Profile::empty(ProfileKind::Recommended)
}

/// On-disk profile document, one per project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    #[serde(default = "default_custom")]
    pub custom_profile: Profile,
    #[serde(default = "default_recommended")]
    pub recommended_profile: Profile,
}

impl Default for ProfileDocument {
    fn default() -> Self {
        Self {
            custom_profile: default_custom(),
            recommended_profile: default_recommended(),
        }
    }
}

impl ProfileDocument {
    pub fn profile(&self, kind: ProfileKind) -> &Profile {
        match kind {
            ProfileKind::Custom => &self.custom_profile,
            ProfileKind::Recommended => &self.recommended_profile,
        }
    }

    pub fn profile_mut(&mut self, kind: ProfileKind) -> &mut Profile {
        match kind {
            ProfileKind::Custom => &mut self.custom_profile,
            ProfileKind::Recommended => &mut self.recommended_profile,
        }
    }
}

/// On-disk enablement map, one per project root.
/// Absent identifiers are enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnablementDocument {
    #[serde(default)]
    pub extension_states: BTreeMap<String, bool>,
}

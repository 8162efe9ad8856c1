//! End-to-end flows through `Workspace`: detection, profile generation,
//! toggling, persistence and reconciliation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use extprofile::{
    Config, ExtProfileError, ExtensionHost, InstalledCatalog, InstalledTool, LoadStatus,
    ProfileKind, ProjectType, Result, SimulatedHost, ToggleOutcome, Workspace,
};
use tempfile::TempDir;

fn touch(root: &Path, files: &[&str]) {
    for file in files {
        fs::write(root.join(file), "").unwrap();
    }
}

fn catalog(tools: &[(&str, &str)]) -> InstalledCatalog {
    tools
        .iter()
        .map(|(id, name)| InstalledTool::new(*id).with_display_name(*name))
        .collect()
}

async fn open(root: &Path) -> Workspace {
    Workspace::open(Some(root.to_path_buf()), Config::default())
        .await
        .unwrap()
}

fn profiles_file(root: &Path) -> PathBuf {
    root.join(".vscode/extension-profiles.json")
}

/// Host that rejects one identifier
struct RejectingHost {
    rejected: String,
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl ExtensionHost for RejectingHost {
    async fn enable(&self, identifier: &str) -> Result<()> {
        self.set(identifier)
    }

    async fn disable(&self, identifier: &str) -> Result<()> {
        self.set(identifier)
    }

    fn name(&self) -> &str {
        "rejecting"
    }
}

impl RejectingHost {
    fn set(&self, identifier: &str) -> Result<()> {
        self.seen.lock().unwrap().push(identifier.to_string());
        if identifier == self.rejected {
            return Err(ExtProfileError::host(identifier, "extension is locked"));
        }
        Ok(())
    }
}

#[tokio::test]
async fn scenario_a_go_mod_only() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), &["go.mod"]);

    let workspace = open(temp_dir.path()).await;
    assert_eq!(workspace.detect().await.unwrap(), ProjectType::Go);
    // Re-running without changes gives the same answer
    assert_eq!(workspace.detect().await.unwrap(), ProjectType::Go);
}

#[tokio::test]
async fn scenario_b_angular_manifest_beats_package_json() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), &["package.json", "angular.json"]);

    let workspace = open(temp_dir.path()).await;
    assert_eq!(workspace.detect().await.unwrap(), ProjectType::Angular);
}

#[tokio::test]
async fn scenario_c_custom_toggle_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let installed = catalog(&[("acme.linter", "Acme Linter")]);
    let mut workspace = open(temp_dir.path()).await;

    let outcome = workspace
        .profiles_mut()
        .toggle_custom_extension("acme.linter", &installed)
        .await
        .unwrap();
    assert_eq!(outcome, ToggleOutcome::Added);

    let custom = workspace.profiles().custom_profile();
    assert_eq!(custom.len(), 1);
    let entry = &custom.extensions[0];
    assert_eq!(entry.identifier, "acme.linter");
    assert_eq!(entry.name, "Acme Linter");
    assert!(entry.is_enabled && entry.is_compatible);

    workspace
        .profiles_mut()
        .toggle_custom_extension("acme.linter", &installed)
        .await
        .unwrap();
    assert!(workspace.profiles().custom_profile().is_empty());
}

#[tokio::test]
async fn scenario_d_recommended_from_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let installed = catalog(&[("ms-python.python", "Python"), ("acme.linter", "Acme")]);
    let mut workspace = open(temp_dir.path()).await;

    let profile = workspace
        .profiles_mut()
        .recommended_profile(ProjectType::Python, Some(&installed))
        .await
        .unwrap();

    assert_eq!(profile.len(), 1);
    assert_eq!(profile.extensions[0].identifier, "ms-python.python");
}

#[tokio::test]
async fn profile_document_round_trips_between_workspaces() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), &["Cargo.toml"]);
    let installed = catalog(&[
        ("rust-lang.rust-analyzer", "rust-analyzer"),
        ("serayuzgur.crates", "crates"),
        ("acme.linter", "Acme"),
    ]);

    {
        let mut workspace = open(temp_dir.path()).await;
        let project_type = workspace.detect().await.unwrap();
        let profiles = workspace.profiles_mut();
        profiles
            .recommended_profile(project_type, Some(&installed))
            .await
            .unwrap();
        profiles
            .toggle_recommended_extension("serayuzgur.crates")
            .await
            .unwrap();
        profiles
            .add_custom_extension("acme.linter", &installed)
            .await
            .unwrap();
    }

    let reopened = open(temp_dir.path()).await;
    let profiles = reopened.profiles();
    assert_eq!(profiles.load_status(), &LoadStatus::Loaded);
    assert_eq!(profiles.custom_profile().len(), 1);

    let recommended = profiles.profile(ProfileKind::Recommended);
    let flags: Vec<(&str, bool)> = recommended
        .extensions
        .iter()
        .map(|e| (e.identifier.as_str(), e.is_enabled))
        .collect();
    assert_eq!(
        flags,
        vec![
            ("rust-lang.rust-analyzer", true),
            ("serayuzgur.crates", false)
        ]
    );

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(profiles_file(temp_dir.path())).unwrap())
            .unwrap();
    assert_eq!(raw["customProfile"]["name"], "Custom");
    assert_eq!(raw["recommendedProfile"]["extensions"][1]["isEnabled"], false);
}

#[tokio::test]
async fn corrupt_documents_recover_to_empty() {
    let temp_dir = TempDir::new().unwrap();
    let state_dir = temp_dir.path().join(".vscode");
    fs::create_dir_all(&state_dir).unwrap();
    fs::write(state_dir.join("extension-profiles.json"), "{\"customProfile\": [").unwrap();
    fs::write(state_dir.join("virtual-env-config.json"), "not json").unwrap();

    let mut workspace = open(temp_dir.path()).await;
    assert!(workspace.profiles().load_status().is_recovered());
    assert!(workspace.enablement().load_status().is_recovered());
    assert!(workspace.profiles().custom_profile().is_empty());

    // The next write replaces the malformed file with a valid document
    workspace
        .profiles_mut()
        .add_custom_extension("acme.linter", &catalog(&[("acme.linter", "Acme")]))
        .await
        .unwrap();
    let reopened = open(temp_dir.path()).await;
    assert_eq!(reopened.profiles().load_status(), &LoadStatus::Loaded);
}

#[tokio::test]
async fn apply_survives_partial_host_failure() {
    let temp_dir = TempDir::new().unwrap();
    let installed = catalog(&[("a.one", "One"), ("b.two", "Two"), ("c.three", "Three")]);
    let mut workspace = open(temp_dir.path()).await;
    for id in ["a.one", "b.two", "c.three"] {
        workspace
            .profiles_mut()
            .add_custom_extension(id, &installed)
            .await
            .unwrap();
    }

    let host = RejectingHost {
        rejected: "b.two".to_string(),
        seen: Mutex::new(Vec::new()),
    };
    let report = workspace
        .profiles_mut()
        .apply_profile(ProfileKind::Custom, &host)
        .await
        .unwrap();

    assert_eq!(report.applied.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].identifier, "b.two");
    assert_eq!(host.seen.lock().unwrap().len(), 3);

    let reopened = open(temp_dir.path()).await;
    assert_eq!(reopened.enablement().states().len(), 3);
}

#[tokio::test]
async fn failed_writes_leave_memory_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let installed = catalog(&[("a.one", "One"), ("b.two", "Two")]);
    let mut workspace = open(temp_dir.path()).await;
    workspace
        .profiles_mut()
        .add_custom_extension("a.one", &installed)
        .await
        .unwrap();

    let state_dir = temp_dir.path().join(".vscode");
    fs::remove_dir_all(&state_dir).unwrap();
    fs::write(&state_dir, "").unwrap();

    let err = workspace
        .profiles_mut()
        .toggle_custom_extension("b.two", &installed)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtProfileError::Storage { .. }));
    assert_eq!(workspace.profiles().custom_profile().len(), 1);

    let host = SimulatedHost::new();
    let err = workspace
        .profiles_mut()
        .apply_profile(ProfileKind::Custom, &host)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtProfileError::Storage { .. }));
    assert!(workspace.enablement().states().is_empty());
    assert!(host.context_keys().is_empty());

    fs::remove_file(&state_dir).unwrap();
    let outcome = workspace
        .profiles_mut()
        .toggle_custom_extension("b.two", &installed)
        .await
        .unwrap();
    assert_eq!(outcome, ToggleOutcome::Added);
    assert_eq!(open(temp_dir.path()).await.profiles().custom_profile().len(), 2);
}

#[tokio::test]
async fn unrecorded_identifiers_are_enabled() {
    let temp_dir = TempDir::new().unwrap();
    let mut workspace = open(temp_dir.path()).await;
    assert!(workspace.enablement().is_enabled("never.recorded"));

    let host = SimulatedHost::new();
    workspace
        .profiles_mut()
        .enablement_mut()
        .toggle("never.recorded", &host)
        .await
        .unwrap();
    assert!(!workspace.enablement().is_enabled("never.recorded"));
    assert_eq!(host.context_keys().get("never.recorded:enabled"), Some(&false));
}

#[tokio::test]
async fn missing_root_is_no_workspace() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("gone");

    let err = Workspace::open(Some(missing), Config::default())
        .await
        .err()
        .unwrap();
    assert_eq!(err.category(), extprofile::ErrorCategory::NoWorkspace);
}

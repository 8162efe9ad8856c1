//! Rule-order properties of the built-in detection table.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use extprofile::config::DetectionConfig;
use extprofile::{DetectionEngine, Marker, ProjectType, default_rules};
use proptest::prelude::*;
use tempfile::TempDir;

const MARKER_FILES: &[&str] = &[
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "node_modules",
    "angular.json",
    "go.mod",
    "Cargo.toml",
    "Gemfile",
    "requirements.txt",
    "manage.py",
    "pom.xml",
    "composer.json",
    "pubspec.yaml",
    "next.config.js",
    "src/App.csproj",
];

/// Marker semantics over a plain file set
fn holds(marker: &Marker, files: &BTreeSet<&str>) -> bool {
    match marker {
        Marker::File(path) => files.contains(path.as_str()),
        Marker::Glob(_) => files
            .iter()
            .any(|f| f.ends_with(".csproj") || f.ends_with(".fsproj") || f.ends_with(".vbproj")),
        Marker::AnyOf(markers) => markers.iter().any(|m| holds(m, files)),
        Marker::AllOf(markers) => markers.iter().all(|m| holds(m, files)),
    }
}

fn expected(files: &BTreeSet<&str>) -> ProjectType {
    default_rules()
        .into_iter()
        .find(|rule| holds(&rule.marker, files))
        .map_or(ProjectType::Unknown, |rule| rule.project_type)
}

fn materialize(root: &Path, files: &BTreeSet<&str>) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }
}

fn detect(files: &BTreeSet<&str>) -> ProjectType {
    let temp_dir = TempDir::new().unwrap();
    materialize(temp_dir.path(), files);

    let engine = DetectionEngine::new(&DetectionConfig::default()).unwrap();
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(engine.detect(temp_dir.path()))
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn proptest_first_matching_rule_wins(
        picked in proptest::sample::subsequence(MARKER_FILES.to_vec(), 0..MARKER_FILES.len())
    ) {
        let files: BTreeSet<&str> = picked.into_iter().collect();
        prop_assert_eq!(detect(&files), expected(&files));
    }
}

#[test]
fn test_ecosystem_manifest_beats_node_signals() {
    let files: BTreeSet<&str> = ["package.json", "yarn.lock", "node_modules", "go.mod"]
        .into_iter()
        .collect();
    assert_eq!(detect(&files), ProjectType::Go);
}

#[test]
fn test_shared_node_rule_resolves_to_earliest() {
    let files: BTreeSet<&str> = ["package.json", "node_modules"].into_iter().collect();
    assert_eq!(detect(&files), ProjectType::Angular);

    let files: BTreeSet<&str> = ["package.json", "yarn.lock"].into_iter().collect();
    assert_eq!(detect(&files), ProjectType::React);
}

//! Detection Rule Table
//!
//! Ordered `(marker, project type)` pairs. The first rule whose marker holds
//! wins; when none holds the result is `Unknown`.
//!
//! Table layout:
//! 1. Ecosystem and framework specific markers
//! 2. `package.json` plus lockfile/`node_modules` rules, shared by several
//!    frameworks (only the first of the identical ones can ever match)
//! 3. Bare `package.json`
//!
//! Within each group the order is the historical check order. Rules with
//! identical markers are kept so that precedence stays visible in the table.

use super::marker::Marker;
use crate::types::ProjectType;

/// One ordered rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionRule {
    pub marker: Marker,
    pub project_type: ProjectType,
}

impl DetectionRule {
    pub fn new(marker: Marker, project_type: ProjectType) -> Self {
        Self {
            marker,
            project_type,
        }
    }
}

fn files(names: &[&str]) -> Marker {
    Marker::any(names.iter().map(|n| Marker::file(*n)))
}

/// `package.json` and (`node_modules` or `yarn.lock`)
fn node_workspace() -> Marker {
    Marker::all([
        Marker::file("package.json"),
        files(&["node_modules", "yarn.lock"]),
    ])
}

/// The built-in rule table
pub fn default_rules() -> Vec<DetectionRule> {
    use ProjectType::*;

    let mut rules = vec![
        DetectionRule::new(files(&["requirements.txt", "setup.py"]), Python),
        DetectionRule::new(files(&["pom.xml", "build.gradle"]), Java),
        DetectionRule::new(Marker::glob("**/*.{csproj,fsproj,vbproj}"), DotNet),
        DetectionRule::new(Marker::file("Gemfile"), Ruby),
        DetectionRule::new(Marker::file("go.mod"), Go),
        DetectionRule::new(Marker::file("Cargo.toml"), Rust),
        DetectionRule::new(Marker::file("angular.json"), Angular),
        DetectionRule::new(Marker::file("svelte.config.js"), Svelte),
        DetectionRule::new(Marker::file("next.config.js"), NextJS),
        DetectionRule::new(Marker::file("nuxt.config.js"), NuxtJS),
        DetectionRule::new(Marker::file("composer.json"), Laravel),
        DetectionRule::new(Marker::file("composer.json"), Symfony),
        DetectionRule::new(files(&["requirements.txt", "manage.py"]), Django),
        DetectionRule::new(files(&["requirements.txt", "manage.py"]), Flask),
        DetectionRule::new(files(&["pom.xml", "build.gradle"]), Spring),
        DetectionRule::new(files(&["pom.xml", "build.gradle"]), Hibernate),
        DetectionRule::new(Marker::file("pubspec.yaml"), Flutter),
        DetectionRule::new(
            Marker::all([
                Marker::file("package.json"),
                files(&["package-lock.json", "yarn.lock"]),
            ]),
            React,
        ),
    ];

    for project_type in [
        Angular, Vue, Svelte, NextJS, NuxtJS, Laravel, Symfony, Express, Flutter,
    ] {
        rules.push(DetectionRule::new(node_workspace(), project_type));
    }

    rules.push(DetectionRule::new(Marker::file("package.json"), Node));
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_index(rules: &[DetectionRule], project_type: ProjectType) -> usize {
        rules
            .iter()
            .position(|r| r.project_type == project_type)
            .unwrap()
    }

    #[test]
    fn test_manifest_rules_precede_generic_package_json() {
        let rules = default_rules();
        let node = first_index(&rules, ProjectType::Node);
        let react = first_index(&rules, ProjectType::React);

        for project_type in [
            ProjectType::Go,
            ProjectType::Rust,
            ProjectType::Ruby,
            ProjectType::Angular,
        ] {
            assert!(first_index(&rules, project_type) < react);
        }
        assert_eq!(node, rules.len() - 1);
    }

    #[test]
    fn test_every_known_type_has_a_rule() {
        let rules = default_rules();
        for project_type in ProjectType::ALL.iter().filter(|t| t.is_known()) {
            assert!(
                rules.iter().any(|r| r.project_type == *project_type),
                "no rule for {}",
                project_type
            );
        }
        assert!(rules.iter().all(|r| r.project_type.is_known()));
    }

    #[test]
    fn test_shared_node_rules_are_identical() {
        let rules = default_rules();
        let shared: Vec<_> = rules
            .iter()
            .filter(|r| r.marker == node_workspace())
            .map(|r| r.project_type)
            .collect();

        assert_eq!(shared.first(), Some(&ProjectType::Angular));
        assert!(shared.contains(&ProjectType::Vue));
        assert!(shared.contains(&ProjectType::Express));
        assert_eq!(shared.len(), 9);
    }
}

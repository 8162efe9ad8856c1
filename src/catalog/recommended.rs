//! Recommendation Catalog
//!
//! Static mapping from project type to tool identifiers worth recommending.
//! Total over `ProjectType`; no I/O.

use crate::types::ProjectType;

const ESLINT: &str = "dbaeumer.vscode-eslint";
const PRETTIER: &str = "esbenp.prettier-vscode";

const WEB_TOOLING: &[&str] = &[ESLINT, PRETTIER];

/// Identifiers recommended for `project_type`
pub fn recommended_identifiers(project_type: ProjectType) -> &'static [&'static str] {
    match project_type {
        ProjectType::Python => &["ms-python.python", "ms-python.vscode-pylance"],
        ProjectType::Java => &["vscjava.vscode-java-pack"],
        ProjectType::DotNet => &["ms-dotnettools.csharp"],
        ProjectType::Ruby => &["rebornix.ruby", "wingrunr21.vscode-ruby"],
        ProjectType::Go => &["golang.go", "ms-vscode.Go"],
        ProjectType::Rust => &["rust-lang.rust-analyzer", "serayuzgur.crates"],
        ProjectType::Node
        | ProjectType::React
        | ProjectType::Angular
        | ProjectType::Vue
        | ProjectType::Svelte
        | ProjectType::NextJS
        | ProjectType::NuxtJS
        | ProjectType::Laravel
        | ProjectType::Symfony
        | ProjectType::Django
        | ProjectType::Flask
        | ProjectType::Express
        | ProjectType::Spring
        | ProjectType::Hibernate
        | ProjectType::Flutter
        | ProjectType::Unknown => WEB_TOOLING,
    }
}

/// Is `identifier` recommended for `project_type`?
pub fn is_recommended(project_type: ProjectType, identifier: &str) -> bool {
    recommended_identifiers(project_type).contains(&identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_recommendations() {
        for project_type in ProjectType::ALL {
            assert!(!recommended_identifiers(project_type).is_empty());
        }
    }

    #[test]
    fn test_ecosystem_specific_sets() {
        assert!(is_recommended(ProjectType::Rust, "rust-lang.rust-analyzer"));
        assert!(is_recommended(ProjectType::Python, "ms-python.vscode-pylance"));
        assert!(!is_recommended(ProjectType::Python, ESLINT));
        assert_eq!(recommended_identifiers(ProjectType::Unknown), WEB_TOOLING);
    }

    #[test]
    fn test_identifiers_are_unique_per_type() {
        for project_type in ProjectType::ALL {
            let ids = recommended_identifiers(project_type);
            let unique: std::collections::HashSet<_> = ids.iter().collect();
            assert_eq!(unique.len(), ids.len());
        }
    }
}

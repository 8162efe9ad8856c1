//! Project-level type definitions
//!
//! Contains the closed set of project classifications produced by detection.

use serde::{Deserialize, Serialize};

/// Project classification produced by a detection run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ProjectType {
    Node,
    Python,
    Java,
    DotNet,
    Ruby,
    Go,
    Rust,
    React,
    Angular,
    Vue,
    Svelte,
    NextJS,
    NuxtJS,
    Laravel,
    Symfony,
    Django,
    Flask,
    Express,
    Spring,
    Hibernate,
    Flutter,
    #[default]
    Unknown,
}

impl ProjectType {
    /// Every variant, in declaration order
    pub const ALL: [ProjectType; 22] = [
        Self::Node,
        Self::Python,
        Self::Java,
        Self::DotNet,
        Self::Ruby,
        Self::Go,
        Self::Rust,
        Self::React,
        Self::Angular,
        Self::Vue,
        Self::Svelte,
        Self::NextJS,
        Self::NuxtJS,
        Self::Laravel,
        Self::Symfony,
        Self::Django,
        Self::Flask,
        Self::Express,
        Self::Spring,
        Self::Hibernate,
        Self::Flutter,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "Node",
            Self::Python => "Python",
            Self::Java => "Java",
            Self::DotNet => "DotNet",
            Self::Ruby => "Ruby",
            Self::Go => "Go",
            Self::Rust => "Rust",
            Self::React => "React",
            Self::Angular => "Angular",
            Self::Vue => "Vue",
            Self::Svelte => "Svelte",
            Self::NextJS => "NextJS",
            Self::NuxtJS => "NuxtJS",
            Self::Laravel => "Laravel",
            Self::Symfony => "Symfony",
            Self::Django => "Django",
            Self::Flask => "Flask",
            Self::Express => "Express",
            Self::Spring => "Spring",
            Self::Hibernate => "Hibernate",
            Self::Flutter => "Flutter",
            Self::Unknown => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Self::Unknown
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown project type: {}", s))
    }
}

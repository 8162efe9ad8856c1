//! Marker Predicates
//!
//! Read-only checks answering "does file/glob X exist under root R?".
//! A missing root is not an error: every predicate reports `false`.
//! Any other I/O failure propagates as a storage error.

use std::fmt;
use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use glob::Pattern;
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use tracing::debug;

use crate::config::DetectionConfig;
use crate::types::{ExtProfileError, Result, log_filter_error};

/// Marker combination evaluated against a project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// File or directory at a root-relative path
    File(String),
    /// At least one file under the root matches the glob
    Glob(String),
    /// Short-circuit OR
    AnyOf(Vec<Marker>),
    /// Short-circuit AND
    AllOf(Vec<Marker>),
}

impl Marker {
    pub fn file(path: impl Into<String>) -> Self {
        Self::File(path.into())
    }

    pub fn glob(pattern: impl Into<String>) -> Self {
        Self::Glob(pattern.into())
    }

    pub fn any(markers: impl IntoIterator<Item = Marker>) -> Self {
        Self::AnyOf(markers.into_iter().collect())
    }

    pub fn all(markers: impl IntoIterator<Item = Marker>) -> Self {
        Self::AllOf(markers.into_iter().collect())
    }

    /// Evaluate left to right, stopping as soon as the result is known
    pub fn evaluate<'a>(&'a self, probe: &'a MarkerProbe) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            match self {
                Self::File(path) => probe.file_exists(path).await,
                Self::Glob(pattern) => probe.glob_exists(pattern).await,
                Self::AnyOf(markers) => {
                    for marker in markers {
                        if marker.evaluate(probe).await? {
                            return Ok(true);
                        }
                    }
                    Ok(false)
                }
                Self::AllOf(markers) => {
                    for marker in markers {
                        if !marker.evaluate(probe).await? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                }
            }
        })
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, markers: &[Marker], sep: &str) -> fmt::Result {
            for (i, marker) in markers.iter().enumerate() {
                if i > 0 {
                    f.write_str(sep)?;
                }
                match marker {
                    Marker::AnyOf(_) | Marker::AllOf(_) => write!(f, "({})", marker)?,
                    _ => write!(f, "{}", marker)?,
                }
            }
            Ok(())
        }

        match self {
            Self::File(path) => f.write_str(path),
            Self::Glob(pattern) => write!(f, "glob:{}", pattern),
            Self::AnyOf(markers) => join(f, markers, " | "),
            Self::AllOf(markers) => join(f, markers, " & "),
        }
    }
}

// =============================================================================
// Glob Walk Options
// =============================================================================

/// Exclusion pattern, also applied to the directory a `dir/**` pattern names
#[derive(Debug, Clone)]
struct ExcludeRule {
    full: Pattern,
    dir: Option<Pattern>,
}

impl ExcludeRule {
    fn matches(&self, rel: &Path) -> bool {
        self.full.matches_path(rel) || self.dir.as_ref().is_some_and(|d| d.matches_path(rel))
    }
}

/// Walk settings for glob markers
#[derive(Debug, Clone, Default)]
pub struct GlobOptions {
    max_depth: Option<usize>,
    exclude: Vec<ExcludeRule>,
    respect_gitignore: bool,
}

impl GlobOptions {
    pub fn from_config(config: &DetectionConfig) -> Result<Self> {
        let mut exclude = Vec::with_capacity(config.exclude.len());
        for raw in &config.exclude {
            let full = Pattern::new(raw).map_err(|e| {
                ExtProfileError::Config(format!("Invalid exclude pattern '{}': {}", raw, e))
            })?;
            let dir = raw
                .strip_suffix("/**")
                .and_then(|prefix| Pattern::new(prefix).ok());
            exclude.push(ExcludeRule { full, dir });
        }

        Ok(Self {
            max_depth: config.max_depth,
            exclude,
            respect_gitignore: config.respect_gitignore,
        })
    }

    fn is_excluded(&self, rel: &Path) -> bool {
        self.exclude.iter().any(|rule| rule.matches(rel))
    }
}

// =============================================================================
// Probe
// =============================================================================

/// Predicate evaluator bound to one project root
#[derive(Debug, Clone)]
pub struct MarkerProbe {
    root: PathBuf,
    options: GlobOptions,
}

impl MarkerProbe {
    pub fn new(root: impl Into<PathBuf>, options: GlobOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Does `relative` exist under the root (file or directory)?
    pub async fn file_exists(&self, relative: &str) -> Result<bool> {
        let path = self.root.join(relative);
        let exists = match tokio::fs::try_exists(&path).await {
            Ok(exists) => exists,
            Err(e) if is_missing(&e) => false,
            Err(e) => return Err(ExtProfileError::storage(path, e)),
        };
        debug!("marker {} -> {}", relative, exists);
        Ok(exists)
    }

    /// Does at least one file under the root match `pattern`?
    pub async fn glob_exists(&self, pattern: &str) -> Result<bool> {
        let root = self.root.clone();
        let pattern_owned = pattern.to_string();
        let options = self.options.clone();

        let found = tokio::task::spawn_blocking(move || {
            glob_exists_blocking(&root, &pattern_owned, &options)
        })
        .await
        .map_err(|e| ExtProfileError::storage(&self.root, std::io::Error::other(e)))??;

        debug!("marker glob:{} -> {}", pattern, found);
        Ok(found)
    }
}

fn is_missing(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
    )
}

fn glob_exists_blocking(root: &Path, pattern: &str, options: &GlobOptions) -> Result<bool> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Ok(false),
        Err(e) if is_missing(&e) => return Ok(false),
        Err(e) => return Err(ExtProfileError::storage(root, e)),
    }

    // Root must be listable; deeper unreadable entries are skipped below
    std::fs::read_dir(root).map_err(|e| ExtProfileError::storage(root, e))?;

    let mut builder = OverrideBuilder::new(root);
    builder.add(pattern).map_err(|e| {
        ExtProfileError::Config(format!("Invalid marker glob '{}': {}", pattern, e))
    })?;
    let matcher = builder.build().map_err(|e| {
        ExtProfileError::Config(format!("Invalid marker glob '{}': {}", pattern, e))
    })?;

    let walk_options = options.clone();
    let walk_root = root.to_path_buf();
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .parents(options.respect_gitignore)
        .ignore(options.respect_gitignore)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .follow_links(false)
        .max_depth(options.max_depth)
        .filter_entry(move |entry| {
            let rel = entry.path().strip_prefix(&walk_root).unwrap_or(entry.path());
            rel.as_os_str().is_empty() || !walk_options.is_excluded(rel)
        })
        .build();

    for entry in walker.filter_map(|e| log_filter_error(e, "walking for glob marker")) {
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if matcher.matched(rel, false).is_whitelist() {
            debug!("glob {} matched {}", pattern, rel.display());
            return Ok(true);
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn probe(dir: &Path) -> MarkerProbe {
        let options = GlobOptions::from_config(&DetectionConfig::default()).unwrap();
        MarkerProbe::new(dir, options)
    }

    #[tokio::test]
    async fn test_file_exists_sees_files_and_directories() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("go.mod"), "module x").unwrap();
        fs::create_dir(temp_dir.path().join("node_modules")).unwrap();
        let probe = probe(temp_dir.path());

        assert!(probe.file_exists("go.mod").await.unwrap());
        assert!(probe.file_exists("node_modules").await.unwrap());
        assert!(!probe.file_exists("Cargo.toml").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_root_is_false_not_error() {
        let temp_dir = TempDir::new().unwrap();
        let probe = probe(&temp_dir.path().join("does-not-exist"));

        assert!(!probe.file_exists("package.json").await.unwrap());
        assert!(!probe.glob_exists("**/*.csproj").await.unwrap());
    }

    #[tokio::test]
    async fn test_root_that_is_a_file_is_false() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, "").unwrap();
        let probe = probe(&file);

        assert!(!probe.file_exists("package.json").await.unwrap());
        assert!(!probe.glob_exists("**/*.csproj").await.unwrap());
    }

    #[tokio::test]
    async fn test_glob_matches_nested_file_with_braces() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("src/App")).unwrap();
        fs::write(temp_dir.path().join("src/App/App.fsproj"), "<Project/>").unwrap();
        let probe = probe(temp_dir.path());

        assert!(
            probe
                .glob_exists("**/*.{csproj,fsproj,vbproj}")
                .await
                .unwrap()
        );
        assert!(!probe.glob_exists("**/*.sln").await.unwrap());
    }

    #[tokio::test]
    async fn test_glob_skips_excluded_directories() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("node_modules/pkg")).unwrap();
        fs::write(temp_dir.path().join("node_modules/pkg/x.csproj"), "").unwrap();
        let probe = probe(temp_dir.path());

        assert!(!probe.glob_exists("**/*.csproj").await.unwrap());
    }

    #[tokio::test]
    async fn test_glob_respects_max_depth() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("a/b/c")).unwrap();
        fs::write(temp_dir.path().join("a/b/c/deep.csproj"), "").unwrap();

        let config = DetectionConfig {
            max_depth: Some(2),
            ..DetectionConfig::default()
        };
        let options = GlobOptions::from_config(&config).unwrap();
        let shallow = MarkerProbe::new(temp_dir.path(), options);
        assert!(!shallow.glob_exists("**/*.csproj").await.unwrap());

        let unbounded = probe(temp_dir.path());
        assert!(unbounded.glob_exists("**/*.csproj").await.unwrap());
    }

    #[tokio::test]
    async fn test_ignore_files_follow_respect_gitignore() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".ignore"), "*.csproj\n").unwrap();
        fs::write(temp_dir.path().join("App.csproj"), "<Project/>").unwrap();

        let config = DetectionConfig {
            respect_gitignore: false,
            ..DetectionConfig::default()
        };
        let options = GlobOptions::from_config(&config).unwrap();
        let raw = MarkerProbe::new(temp_dir.path(), options);
        assert!(raw.glob_exists("**/*.csproj").await.unwrap());

        let config = DetectionConfig {
            respect_gitignore: true,
            ..DetectionConfig::default()
        };
        let options = GlobOptions::from_config(&config).unwrap();
        let filtered = MarkerProbe::new(temp_dir.path(), options);
        assert!(!filtered.glob_exists("**/*.csproj").await.unwrap());
    }

    #[tokio::test]
    async fn test_combinators_short_circuit() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("package.json"), "{}").unwrap();
        fs::write(temp_dir.path().join("yarn.lock"), "").unwrap();
        let probe = probe(temp_dir.path());

        let marker = Marker::all([
            Marker::file("package.json"),
            Marker::any([Marker::file("node_modules"), Marker::file("yarn.lock")]),
        ]);
        assert!(marker.evaluate(&probe).await.unwrap());

        // The invalid glob is never evaluated because the first operand decides
        let marker = Marker::any([Marker::file("package.json"), Marker::glob("[")]);
        assert!(marker.evaluate(&probe).await.unwrap());

        let marker = Marker::all([Marker::file("pom.xml"), Marker::glob("[")]);
        assert!(!marker.evaluate(&probe).await.unwrap());
    }

    #[test]
    fn test_display_is_readable() {
        let marker = Marker::all([
            Marker::file("package.json"),
            Marker::any([Marker::file("node_modules"), Marker::file("yarn.lock")]),
        ]);
        assert_eq!(marker.to_string(), "package.json & (node_modules | yarn.lock)");
        assert_eq!(Marker::glob("**/*.csproj").to_string(), "glob:**/*.csproj");
    }
}

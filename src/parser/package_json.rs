//! Parser for npm package.json files and workspace detection.
//!
//! Reads the root manifest to decide whether the project is a monorepo
//! and, if so, enumerates the workspace members so the resolver can map
//! package names to directories.

use std::fs;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use super::types::{PackageJson, WorkspaceConfig, WorkspaceKind, WorkspacePackage};

/// Errors that can occur during package.json parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a package.json file from a file path.
pub fn parse_file(path: &Path) -> ParseResult<PackageJson> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses a package.json from a string.
///
/// # Example
///
/// ```
/// use codesweep::parser::package_json::parse_str;
///
/// let json = r#"{"name": "my-app", "version": "1.0.0"}"#;
/// let pkg = parse_str(json).unwrap();
/// assert_eq!(pkg.name, Some("my-app".to_string()));
/// ```
pub fn parse_str(content: &str) -> ParseResult<PackageJson> {
    let pkg: PackageJson = serde_json::from_str(content)?;
    Ok(pkg)
}

/// Detects the workspace layout rooted at `project_root`.
///
/// A missing or unparseable root manifest, or one without a `workspaces`
/// field, yields an empty [`WorkspaceConfig`] — detection never fails
/// the run.
pub fn detect_workspace(project_root: &Path) -> WorkspaceConfig {
    let manifest = project_root.join("package.json");
    let Ok(pkg) = parse_file(&manifest) else {
        return WorkspaceConfig::default();
    };
    if !pkg.has_workspaces() {
        return WorkspaceConfig::default();
    }

    let globs = pkg
        .workspaces
        .as_ref()
        .map(|w| w.globs().to_vec())
        .unwrap_or_default();

    let Some(matcher) = build_globset(&globs) else {
        return WorkspaceConfig::default();
    };

    let mut config = WorkspaceConfig {
        kind: WorkspaceKind::Npm,
        ..Default::default()
    };

    // Workspace globs address directories near the root; a shallow walk
    // keeps this cheap on large trees.
    for entry in WalkDir::new(project_root)
        .min_depth(1)
        .max_depth(4)
        .into_iter()
        .filter_entry(|e| e.file_type().is_dir() && !is_ignored_dir_name(e.file_name()))
        .filter_map(|e| e.ok())
    {
        let rel = match entry.path().strip_prefix(project_root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        if !matcher.is_match(rel) {
            continue;
        }

        let member_manifest = entry.path().join("package.json");
        let Ok(member) = parse_file(&member_manifest) else {
            continue;
        };
        let Some(name) = member.name else {
            continue;
        };

        config.packages.insert(
            name.clone(),
            WorkspacePackage {
                name,
                root: entry.path().to_path_buf(),
                main: member.main,
            },
        );
    }

    if config.packages.is_empty() {
        return WorkspaceConfig::default();
    }
    config
}

fn build_globset(patterns: &[String]) -> Option<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let mut added = false;
    for pat in patterns {
        let pat = pat.trim().trim_end_matches('/');
        if pat.is_empty() {
            continue;
        }
        match Glob::new(pat) {
            Ok(glob) => {
                builder.add(glob);
                added = true;
            }
            Err(err) => eprintln!("Warning: invalid workspace glob '{}': {}", pat, err),
        }
    }
    if !added {
        return None;
    }
    builder.build().ok()
}

fn is_ignored_dir_name(name: &std::ffi::OsStr) -> bool {
    matches!(
        name.to_string_lossy().as_ref(),
        "node_modules" | ".git" | "dist" | "build" | ".next" | "coverage" | ".turbo"
    )
}

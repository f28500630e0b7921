//! Shared types for project configuration parsing.
//!
//! This module defines the data structures used to represent package
//! manifests and workspace (monorepo) layout. The resolver is the only
//! consumer of the workspace data; the core analysis never reads it
//! directly.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Relevant subset of a package.json file.
///
/// Only the fields that drive workspace detection and entry-point
/// resolution are modeled; everything else is ignored during
/// deserialization.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PackageJson {
    /// The name of the package.
    pub name: Option<String>,

    /// The version of the package (semver format).
    pub version: Option<String>,

    /// Entry point of the package, used when a workspace package is
    /// imported by bare name.
    pub main: Option<String>,

    /// Workspace member globs (npm/yarn monorepos).
    pub workspaces: Option<WorkspacesField>,
}

/// The `workspaces` field comes in two shapes: a bare glob array, or an
/// object with a `packages` array (old yarn format).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WorkspacesField {
    Globs(Vec<String>),
    Object { packages: Vec<String> },
}

impl WorkspacesField {
    /// Returns the member globs regardless of which shape was used.
    pub fn globs(&self) -> &[String] {
        match self {
            WorkspacesField::Globs(globs) => globs,
            WorkspacesField::Object { packages } => packages,
        }
    }
}

impl PackageJson {
    /// Returns true if this manifest declares workspace members.
    pub fn has_workspaces(&self) -> bool {
        self.workspaces
            .as_ref()
            .is_some_and(|w| !w.globs().is_empty())
    }
}

/// The kind of workspace layout detected at the project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkspaceKind {
    /// Single-package project, no workspace configuration.
    #[default]
    None,
    /// npm/yarn workspaces declared in the root package.json.
    Npm,
}

impl fmt::Display for WorkspaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceKind::None => write!(f, "none"),
            WorkspaceKind::Npm => write!(f, "npm"),
        }
    }
}

/// One resolved workspace member.
#[derive(Debug, Clone)]
pub struct WorkspacePackage {
    /// Package name from the member's package.json.
    pub name: String,
    /// Absolute path of the member directory.
    pub root: PathBuf,
    /// Entry point relative to `root`, if the manifest declares one.
    pub main: Option<String>,
}

/// Workspace layout handed to the resolver.
///
/// `packages` maps package name to its member record so that an import
/// source like `@acme/utils/helpers` can be rewritten into a path below
/// the member root.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceConfig {
    pub kind: WorkspaceKind,
    pub packages: HashMap<String, WorkspacePackage>,
}

impl WorkspaceConfig {
    /// Returns true if no workspace layout was detected.
    pub fn is_empty(&self) -> bool {
        self.kind == WorkspaceKind::None || self.packages.is_empty()
    }

    /// Looks up the workspace member an import source belongs to.
    ///
    /// Matches the package-name prefix, so `@acme/utils/helpers` finds
    /// `@acme/utils` and returns the `helpers` remainder.
    pub fn match_package<'a>(&self, source: &'a str) -> Option<(&WorkspacePackage, &'a str)> {
        if let Some(pkg) = self.packages.get(source) {
            return Some((pkg, ""));
        }
        for (name, pkg) in &self.packages {
            if let Some(rest) = source.strip_prefix(name.as_str()) {
                if let Some(sub) = rest.strip_prefix('/') {
                    return Some((pkg, sub));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspaces_field_globs() {
        let json = r#"{"name": "root", "workspaces": ["packages/*"]}"#;
        let pkg: PackageJson = serde_json::from_str(json).unwrap();
        assert!(pkg.has_workspaces());
        assert_eq!(pkg.workspaces.unwrap().globs(), &["packages/*"]);
    }

    #[test]
    fn test_workspaces_field_object() {
        let json = r#"{"workspaces": {"packages": ["apps/*", "libs/*"]}}"#;
        let pkg: PackageJson = serde_json::from_str(json).unwrap();
        assert_eq!(pkg.workspaces.unwrap().globs().len(), 2);
    }

    #[test]
    fn test_no_workspaces() {
        let json = r#"{"name": "single"}"#;
        let pkg: PackageJson = serde_json::from_str(json).unwrap();
        assert!(!pkg.has_workspaces());
    }

    #[test]
    fn test_workspace_kind_display() {
        assert_eq!(format!("{}", WorkspaceKind::None), "none");
        assert_eq!(format!("{}", WorkspaceKind::Npm), "npm");
    }

    #[test]
    fn test_match_package_exact_and_subpath() {
        let mut config = WorkspaceConfig {
            kind: WorkspaceKind::Npm,
            packages: HashMap::new(),
        };
        config.packages.insert(
            "@acme/utils".to_string(),
            WorkspacePackage {
                name: "@acme/utils".to_string(),
                root: PathBuf::from("/repo/packages/utils"),
                main: Some("src/index.ts".to_string()),
            },
        );

        let (pkg, rest) = config.match_package("@acme/utils").unwrap();
        assert_eq!(pkg.name, "@acme/utils");
        assert_eq!(rest, "");

        let (_, rest) = config.match_package("@acme/utils/helpers").unwrap();
        assert_eq!(rest, "helpers");

        assert!(config.match_package("@acme/other").is_none());
        // Prefix without a separator must not match.
        assert!(config.match_package("@acme/utilsx").is_none());
    }

    #[test]
    fn test_empty_config() {
        let config = WorkspaceConfig::default();
        assert!(config.is_empty());
    }
}

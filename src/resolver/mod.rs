//! Import path resolution.
//!
//! Maps an import source string to the file it refers to, aware of
//! relative paths, tsconfig aliases, and workspace package names. The
//! core engines depend on exactly two operations: [`ImportResolver::is_local`]
//! (does this source point into the project?) and
//! [`ImportResolver::resolve`] (which file is it?).

use std::path::{Path, PathBuf};

use crate::parser::tsconfig::AliasTable;
use crate::parser::{package_json, WorkspaceConfig};

/// File names probed when an import points at a directory.
const INDEX_FILES: &[&str] = &["index.ts", "index.tsx", "index.js", "index.jsx"];

/// Resolver for project-internal import sources.
#[derive(Debug)]
pub struct ImportResolver {
    project_root: PathBuf,
    aliases: AliasTable,
    workspace: WorkspaceConfig,
    extensions: Vec<String>,
}

impl ImportResolver {
    /// Builds a resolver from explicit configuration.
    pub fn new(
        project_root: PathBuf,
        aliases: AliasTable,
        workspace: WorkspaceConfig,
        extensions: Vec<String>,
    ) -> Self {
        Self {
            project_root,
            aliases,
            workspace,
            extensions,
        }
    }

    /// Builds a resolver by loading tsconfig aliases and workspace
    /// layout from the project root.
    pub fn for_project(project_root: &Path, extensions: &[String]) -> Self {
        Self::new(
            project_root.to_path_buf(),
            AliasTable::load(project_root),
            package_json::detect_workspace(project_root),
            extensions.to_vec(),
        )
    }

    /// Returns true if `source` refers to project-internal code rather
    /// than a registry dependency.
    pub fn is_local(&self, source: &str) -> bool {
        source.starts_with('.')
            || source.starts_with('/')
            || self.aliases.matches(source)
            || self.workspace.match_package(source).is_some()
    }

    /// Resolves an import source to an existing file, or `None` when no
    /// file matches. Only meaningful for local sources.
    pub fn resolve(&self, source: &str, from_file: &Path) -> Option<PathBuf> {
        // Relative: resolved against the importing file.
        if source.starts_with('.') {
            let parent = from_file.parent()?;
            return self.probe(parent.join(source));
        }

        // Absolute: resolved against the project root.
        if let Some(rest) = source.strip_prefix('/') {
            return self.probe(self.project_root.join(rest));
        }

        // tsconfig alias: try each substitution target in order.
        if self.aliases.matches(source) {
            for candidate in self.aliases.expand(source) {
                if let Some(found) = self.probe(candidate) {
                    return Some(found);
                }
            }
            return None;
        }

        // Workspace package name, with optional subpath.
        if let Some((pkg, subpath)) = self.workspace.match_package(source) {
            if subpath.is_empty() {
                if let Some(main) = &pkg.main {
                    if let Some(found) = self.probe(pkg.root.join(main)) {
                        return Some(found);
                    }
                }
                return self.probe(pkg.root.clone());
            }
            return self.probe(pkg.root.join(subpath));
        }

        None
    }

    /// Probes a candidate path: as-is, with configured extensions, then
    /// as a directory with index files.
    fn probe(&self, candidate: PathBuf) -> Option<PathBuf> {
        if candidate.is_file() {
            return canonical(&candidate);
        }

        if candidate.extension().is_none() {
            for ext in &self.extensions {
                let with_ext = candidate.with_extension(ext.trim_start_matches('.'));
                if with_ext.is_file() {
                    return canonical(&with_ext);
                }
            }
        }

        if candidate.is_dir() {
            for index in INDEX_FILES {
                let index_candidate = candidate.join(index);
                if index_candidate.is_file() {
                    return canonical(&index_candidate);
                }
            }
        }

        None
    }
}

fn canonical(path: &Path) -> Option<PathBuf> {
    path.canonicalize().ok()
}

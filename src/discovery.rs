//! File discovery for analysis runs.
//!
//! Yields the ordered set of source files under a target directory,
//! filtered by extension and ignore patterns. Build/system directories
//! are always skipped regardless of user configuration.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::parser::SourceLanguage;

/// Directories that are never scanned.
const DEFAULT_IGNORE_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "out",
    ".next",
    ".vercel",
    "coverage",
    ".turbo",
    ".cache",
    ".expo",
    "storybook-static",
];

/// Options controlling discovery.
#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    /// Extensions to include, without leading dot (e.g. `ts`, `tsx`).
    pub extensions: Vec<String>,
    /// Additional ignore globs, matched against paths relative to the
    /// scan target.
    pub ignore: Vec<String>,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            extensions: vec![
                "ts".to_string(),
                "tsx".to_string(),
                "js".to_string(),
                "jsx".to_string(),
            ],
            ignore: Vec::new(),
        }
    }
}

/// Discovers source files under `target`, sorted by path for
/// deterministic output.
///
/// A file target is returned as a single-element list if its extension
/// matches. Declaration files (`.d.ts`) are always excluded.
pub fn discover_files(target: &Path, options: &DiscoverOptions) -> std::io::Result<Vec<PathBuf>> {
    let target = target.canonicalize()?;

    if target.is_file() {
        return Ok(if wanted_extension(&target, &options.extensions) {
            vec![target]
        } else {
            Vec::new()
        });
    }

    let ignore_set = build_ignore_set(&options.ignore);
    let mut files = Vec::new();

    for entry in WalkDir::new(&target)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored_dir(e))
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        if !wanted_extension(path, &options.extensions) {
            continue;
        }
        if let Some(set) = &ignore_set {
            if let Ok(rel) = path.strip_prefix(&target) {
                if set.is_match(rel) {
                    continue;
                }
            }
        }
        files.push(path.to_path_buf());
    }

    Ok(files)
}

fn wanted_extension(path: &Path, extensions: &[String]) -> bool {
    // .d.ts files declare types for other modules; rewriting them is
    // never safe.
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if name.ends_with(".d.ts") || name.ends_with(".d.mts") || name.ends_with(".d.cts") {
        return false;
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if SourceLanguage::from_extension(ext).is_none() {
        return false;
    }
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

fn build_ignore_set(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }
    let mut builder = GlobSetBuilder::new();
    let mut added = false;
    for pat in patterns {
        let pat = pat.trim();
        if pat.is_empty() {
            continue;
        }
        match Glob::new(pat) {
            Ok(glob) => {
                builder.add(glob);
                added = true;
            }
            Err(err) => eprintln!("Warning: invalid ignore glob '{}': {}", pat, err),
        }
    }
    if !added {
        return None;
    }
    builder.build().ok()
}

/// Check if a directory should be skipped during traversal.
fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    DEFAULT_IGNORE_DIRS.contains(&name.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export {};\n").unwrap();
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/b.ts");
        write(dir.path(), "src/a.ts");
        write(dir.path(), "src/style.css");
        write(dir.path(), "node_modules/pkg/index.ts");

        let files = discover_files(dir.path(), &DiscoverOptions::default()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.ts", "b.ts"]);
    }

    #[test]
    fn test_discover_extension_subset() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.ts");
        write(dir.path(), "b.jsx");

        let options = DiscoverOptions {
            extensions: vec!["ts".to_string()],
            ignore: Vec::new(),
        };
        let files = discover_files(dir.path(), &options).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.ts"));
    }

    #[test]
    fn test_discover_skips_declaration_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "types.d.ts");
        write(dir.path(), "index.ts");

        let files = discover_files(dir.path(), &DiscoverOptions::default()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("index.ts"));
    }

    #[test]
    fn test_discover_user_ignore_globs() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/keep.ts");
        write(dir.path(), "src/generated/schema.ts");

        let options = DiscoverOptions {
            ignore: vec!["**/generated/**".to_string()],
            ..Default::default()
        };
        let files = discover_files(dir.path(), &options).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("keep.ts"));
    }

    #[test]
    fn test_discover_single_file_target() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "only.tsx");

        let files =
            discover_files(&dir.path().join("only.tsx"), &DiscoverOptions::default()).unwrap();
        assert_eq!(files.len(), 1);

        let none = discover_files(&dir.path().join("only.tsx"), &DiscoverOptions {
            extensions: vec!["js".to_string()],
            ignore: Vec::new(),
        })
        .unwrap();
        assert!(none.is_empty());
    }
}

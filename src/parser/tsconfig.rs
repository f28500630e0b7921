//! tsconfig.json alias table loading.
//!
//! Extracts `compilerOptions.baseUrl` and `compilerOptions.paths` into an
//! [`AliasTable`] the resolver can query. Supports `extends` chains
//! (child options override the parent's) and tolerates JSONC syntax,
//! which tsconfig files use routinely.

use std::path::{Path, PathBuf};

use serde_json::Value;

/// One `paths` entry: an alias pattern and its substitution targets.
///
/// Patterns may carry a single `*` wildcard (`@/*`), matched as a
/// prefix/suffix pair; the capture is substituted into each target's
/// `*` in order of appearance.
#[derive(Debug, Clone)]
pub struct AliasMapping {
    pub pattern: String,
    pub targets: Vec<String>,
    wildcard: bool,
}

/// Alias table built from a project's tsconfig.json.
///
/// An empty table (no tsconfig, or one without `paths`) is valid and
/// simply never matches.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    /// Directory `paths` targets are relative to (`baseUrl`).
    pub base_dir: PathBuf,
    mappings: Vec<AliasMapping>,
}

impl AliasTable {
    /// Loads the alias table for `project_root`, walking upward to the
    /// nearest tsconfig.json. Returns an empty table when none exists.
    pub fn load(project_root: &Path) -> Self {
        let Some(ts_path) = find_tsconfig(project_root) else {
            return Self::default();
        };
        let Some(json) = load_tsconfig_recursive(&ts_path) else {
            return Self::default();
        };
        Self::from_value(&json, ts_path.parent().unwrap_or(project_root))
    }

    /// Builds the table from an already-parsed tsconfig value.
    pub fn from_value(json: &Value, config_dir: &Path) -> Self {
        let compiler = json
            .get("compilerOptions")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();

        let base_url = compiler
            .get("baseUrl")
            .and_then(|v| v.as_str())
            .unwrap_or(".");
        let base_dir = config_dir.join(base_url);

        let mut mappings = Vec::new();
        if let Some(paths) = compiler.get("paths").and_then(|p| p.as_object()) {
            for (alias, targets) in paths {
                let targets: Vec<String> = targets
                    .as_array()
                    .into_iter()
                    .flat_map(|arr| arr.iter())
                    .filter_map(|v| v.as_str())
                    .map(|s| s.replace('\\', "/"))
                    .collect();
                if targets.is_empty() {
                    continue;
                }
                let pattern = alias.replace('\\', "/");
                let wildcard = pattern.contains('*');
                mappings.push(AliasMapping {
                    pattern,
                    targets,
                    wildcard,
                });
            }
        }
        // Longest pattern first so `@app/components/*` wins over `@app/*`.
        mappings.sort_by(|a, b| b.pattern.len().cmp(&a.pattern.len()));

        Self { base_dir, mappings }
    }

    /// Returns true if no mappings are configured.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Returns true if `source` matches any alias pattern.
    pub fn matches(&self, source: &str) -> bool {
        self.mappings.iter().any(|m| match_capture(m, source).is_some())
    }

    /// Expands `source` through the first matching alias into candidate
    /// paths (relative to [`AliasTable::base_dir`]). Existence checks are
    /// the resolver's job.
    pub fn expand(&self, source: &str) -> Vec<PathBuf> {
        for mapping in &self.mappings {
            if let Some(capture) = match_capture(mapping, source) {
                return mapping
                    .targets
                    .iter()
                    .map(|target| {
                        let substituted = if mapping.wildcard {
                            target.replacen('*', capture, 1)
                        } else {
                            target.clone()
                        };
                        self.base_dir.join(substituted)
                    })
                    .collect();
            }
        }
        Vec::new()
    }
}

/// Matches `source` against a mapping, returning the wildcard capture
/// (or `""` for exact, wildcard-free patterns).
fn match_capture<'a>(mapping: &AliasMapping, source: &'a str) -> Option<&'a str> {
    if !mapping.wildcard {
        return (mapping.pattern == source).then_some("");
    }
    let (prefix, suffix) = mapping.pattern.split_once('*')?;
    let rest = source.strip_prefix(prefix)?;
    rest.strip_suffix(suffix)
}

/// Walks upward from `start` to the nearest tsconfig.json.
pub fn find_tsconfig(start: &Path) -> Option<PathBuf> {
    let mut current = start
        .canonicalize()
        .unwrap_or_else(|_| start.to_path_buf());
    loop {
        let candidate = current.join("tsconfig.json");
        if candidate.exists() {
            return Some(candidate);
        }
        match current.parent() {
            Some(parent) if parent != current => current = parent.to_path_buf(),
            _ => return None,
        }
    }
}

fn load_tsconfig_recursive(ts_path: &Path) -> Option<Value> {
    let content = std::fs::read_to_string(ts_path).ok()?;
    let mut current = parse_tsconfig_value(&content)?;

    // Merge extends (child compilerOptions override the parent's).
    if let Some(ext) = current.get("extends").and_then(|v| v.as_str()) {
        let base_path = if Path::new(ext).is_absolute() {
            PathBuf::from(ext)
        } else {
            ts_path
                .parent()
                .map(|p| p.join(ext))
                .unwrap_or_else(|| PathBuf::from(ext))
        };
        if base_path.exists() {
            if let Some(parent) = load_tsconfig_recursive(&base_path) {
                let parent_co = parent
                    .get("compilerOptions")
                    .and_then(|v| v.as_object())
                    .cloned()
                    .unwrap_or_default();
                let child_co = current
                    .get("compilerOptions")
                    .and_then(|v| v.as_object())
                    .cloned()
                    .unwrap_or_default();
                let mut merged = parent_co;
                for (k, v) in child_co {
                    merged.insert(k, v);
                }
                current["compilerOptions"] = Value::Object(merged);
            }
        }
    }

    Some(current)
}

/// Parses tsconfig content, falling back to JSON5 for comments and
/// trailing commas.
fn parse_tsconfig_value(content: &str) -> Option<Value> {
    if let Ok(v) = serde_json::from_str(content) {
        return Some(v);
    }
    json_five::from_str::<Value>(content).ok()
}

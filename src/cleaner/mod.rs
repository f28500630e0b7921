//! Unused-import analysis and safe rewriting.
//!
//! For each file, decides per import specifier whether the binding is
//! referenced and regenerates the source with unused bindings dropped.
//! The rules err on the side of keeping imports: side-effect imports
//! are never touched, markup-framework default imports survive in
//! markup files, and a file that fails to parse is left alone.
//!
//! Per-file work is stateless, so batches run on a bounded worker pool
//! (see [`clean_files`]); the bound exists to cap open file handles,
//! not to order results.

pub mod rewrite;

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::analysis::{collect_usage, extract_imports, Import, ImportSpecifier};
use crate::frameworks::FrameworkRules;
use crate::parser::{ParsedSource, SourceParser};
use crate::resolver::ImportResolver;
use rewrite::{apply_edits, Edit};

/// Specifiers removed from one import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedImport {
    /// Source module of the declaration.
    pub source: String,
    /// Local names of the removed specifiers.
    pub specifiers: Vec<String>,
}

/// Result of cleaning one file.
#[derive(Debug)]
pub struct CleanReport {
    pub file: PathBuf,
    pub removed: Vec<RemovedImport>,
    /// Import declarations before and after cleaning.
    pub import_decls_before: usize,
    pub import_decls_after: usize,
    pub changed: bool,
    /// Regenerated source, present only when `changed` is true.
    pub new_code: Option<String>,
}

impl CleanReport {
    /// Neutral zero-change report, used for unreadable or unparseable
    /// files.
    pub fn neutral(file: PathBuf) -> Self {
        Self {
            file,
            removed: Vec::new(),
            import_decls_before: 0,
            import_decls_after: 0,
            changed: false,
            new_code: None,
        }
    }

    /// Total number of removed specifiers across all declarations.
    pub fn removed_specifier_count(&self) -> usize {
        self.removed.iter().map(|r| r.specifiers.len()).sum()
    }
}

/// Options for a cleaning run.
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    /// Report only; never write files back.
    pub dry_run: bool,
    /// Verify that local imports resolve to existing files; imports of
    /// missing modules are removed wholesale.
    pub check_local_imports: bool,
}

/// Cleans a single file on disk.
///
/// Read and parse failures produce a neutral report with a console
/// warning; they never fail the run. In non-dry-run mode the rewritten
/// text is written back, but only when something changed.
pub fn clean_file(
    path: &Path,
    parser: &mut SourceParser,
    resolver: &ImportResolver,
    rules: &FrameworkRules,
    options: &CleanOptions,
) -> CleanReport {
    let parsed = match parser.parse_file(path) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("Warning: skipped {}: {}", path.display(), err);
            return CleanReport::neutral(path.to_path_buf());
        }
    };

    let report = clean_source(&parsed, path, resolver, rules, options.check_local_imports);

    if !options.dry_run && report.changed {
        if let Some(new_code) = &report.new_code {
            if let Err(err) = fs::write(path, new_code) {
                eprintln!("Warning: could not write {}: {}", path.display(), err);
            }
        }
    }

    report
}

/// Pure analysis and regeneration for already-parsed source.
pub fn clean_source(
    parsed: &ParsedSource,
    path: &Path,
    resolver: &ImportResolver,
    rules: &FrameworkRules,
    check_local_imports: bool,
) -> CleanReport {
    let usage = collect_usage(parsed);
    let imports = extract_imports(parsed);

    let import_decls_before = imports.len();
    let mut declarations_removed = 0;
    let mut removed = Vec::new();
    let mut edits = Vec::new();

    for import in &imports {
        // A local import of a file that does not exist can never be
        // legitimately used; drop the whole declaration regardless of
        // usage.
        if check_local_imports
            && !import.specifiers.is_empty()
            && resolver.is_local(&import.source)
            && resolver.resolve(&import.source, path).is_none()
        {
            removed.push(RemovedImport {
                source: import.source.clone(),
                specifiers: import.local_names(),
            });
            edits.push(Edit::delete(import, &parsed.source));
            declarations_removed += 1;
            continue;
        }

        // Side-effect imports are kept byte-identical.
        if import.is_side_effect_only() {
            continue;
        }

        let (survivors, removed_names) = partition_specifiers(import, &usage.used_symbols, || {
            rules.retains_default_import(&import.source, usage.has_markup_literal)
        });

        if removed_names.is_empty() {
            continue;
        }

        removed.push(RemovedImport {
            source: import.source.clone(),
            specifiers: removed_names,
        });

        if survivors.is_empty() {
            edits.push(Edit::delete(import, &parsed.source));
            declarations_removed += 1;
        } else {
            edits.push(Edit::replace(import, &survivors));
        }
    }

    let changed = !removed.is_empty();
    let new_code = changed.then(|| apply_edits(&parsed.source, edits));

    CleanReport {
        file: path.to_path_buf(),
        removed,
        import_decls_before,
        import_decls_after: import_decls_before - declarations_removed,
        changed,
        new_code,
    }
}

/// Splits one declaration's specifiers into kept and removed, in
/// original order.
fn partition_specifiers(
    import: &Import,
    used: &std::collections::HashSet<String>,
    retains_default: impl Fn() -> bool,
) -> (Vec<ImportSpecifier>, Vec<String>) {
    let mut survivors = Vec::new();
    let mut removed_names = Vec::new();

    for spec in &import.specifiers {
        let keep = match spec {
            // Markup lowering references the framework default import
            // even when the identifier never appears.
            ImportSpecifier::Default { local } => retains_default() || used.contains(local),
            ImportSpecifier::Named { local, .. } => used.contains(local),
            ImportSpecifier::Namespace { local } => used.contains(local),
        };
        if keep {
            survivors.push(spec.clone());
        } else {
            removed_names.push(spec.local_name().to_string());
        }
    }

    (survivors, removed_names)
}

/// Cleans a batch of files on a bounded worker pool.
///
/// Reports come back in input order; the pool size only caps open file
/// handles.
pub fn clean_files(
    files: &[PathBuf],
    resolver: &ImportResolver,
    rules: &FrameworkRules,
    options: &CleanOptions,
    jobs: usize,
) -> Vec<CleanReport> {
    let run = || {
        files
            .par_iter()
            .map_init(
                || SourceParser::new().expect("parser grammars failed to load"),
                |parser, path| clean_file(path, parser, resolver, rules, options),
            )
            .collect()
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
    {
        Ok(pool) => pool.install(run),
        Err(err) => {
            eprintln!("Warning: worker pool unavailable ({}), running on default pool", err);
            run()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tsconfig::AliasTable;
    use crate::parser::{SourceLanguage, WorkspaceConfig};
    use tempfile::TempDir;

    fn parse(source: &str) -> ParsedSource {
        let mut parser = SourceParser::new().unwrap();
        parser
            .parse_source(
                source.to_string(),
                SourceLanguage::Tsx,
                Path::new("test.tsx"),
            )
            .unwrap()
    }

    fn bare_resolver(root: &Path) -> ImportResolver {
        ImportResolver::new(
            root.to_path_buf(),
            AliasTable::default(),
            WorkspaceConfig::default(),
            vec!["ts".to_string(), "tsx".to_string()],
        )
    }

    fn clean_str(source: &str) -> CleanReport {
        let dir = TempDir::new().unwrap();
        let resolver = bare_resolver(dir.path());
        let rules = FrameworkRules::default();
        clean_source(&parse(source), Path::new("test.tsx"), &resolver, &rules, false)
    }

    #[test]
    fn test_partial_removal_keeps_declaration() {
        // Of `a` and `b`, only `a` is referenced.
        let report = clean_str("import { a, b } from './m';\nconsole.log(a);\n");
        assert!(report.changed);
        assert_eq!(
            report.removed,
            vec![RemovedImport {
                source: "./m".to_string(),
                specifiers: vec!["b".to_string()],
            }]
        );
        assert_eq!(report.import_decls_before, 1);
        assert_eq!(report.import_decls_after, 1);
        assert_eq!(
            report.new_code.as_deref(),
            Some("import { a } from './m';\nconsole.log(a);\n")
        );
    }

    #[test]
    fn test_fully_unused_declaration_deleted() {
        let report = clean_str("import { a, b } from './m';\nconst x = 1;\n");
        assert!(report.changed);
        assert_eq!(report.import_decls_after, 0);
        assert_eq!(report.new_code.as_deref(), Some("const x = 1;\n"));
    }

    #[test]
    fn test_no_change_when_all_used() {
        let report = clean_str("import { a } from './m';\nconsole.log(a);\n");
        assert!(!report.changed);
        assert!(report.new_code.is_none());
        assert_eq!(report.removed_specifier_count(), 0);
    }

    #[test]
    fn test_side_effect_import_untouched() {
        let report = clean_str("import './polyfills';\nconst x = 1;\n");
        assert!(!report.changed);
        assert_eq!(report.import_decls_before, 1);
        assert_eq!(report.import_decls_after, 1);
    }

    #[test]
    fn test_markup_retains_framework_default() {
        // Default import from the markup framework, no direct identifier
        // use, but the file renders markup.
        let report = clean_str("import React from 'react';\nexport const el = <div />;\n");
        assert!(!report.changed);
    }

    #[test]
    fn test_markup_rule_needs_markup_literal() {
        let report = clean_str("import React from 'react';\nconst x = 1;\n");
        assert!(report.changed);
        assert_eq!(report.removed[0].specifiers, vec!["React".to_string()]);
    }

    #[test]
    fn test_other_default_imports_follow_usage() {
        let report = clean_str("import axios from 'axios';\nexport const el = <div />;\n");
        assert!(report.changed);
        assert_eq!(report.removed[0].source, "axios");
    }

    #[test]
    fn test_namespace_member_access_keeps_import() {
        let report = clean_str("import * as path from 'path';\npath.join('x');\n");
        assert!(!report.changed);
    }

    #[test]
    fn test_unused_namespace_removed() {
        let report = clean_str("import * as path from 'path';\nconst x = 1;\n");
        assert!(report.changed);
        assert_eq!(report.removed[0].specifiers, vec!["path".to_string()]);
    }

    #[test]
    fn test_missing_local_module_removed_despite_usage() {
        // `util` is referenced, but `./missing` has no file behind it.
        // Non-existence overrides usage.
        let dir = TempDir::new().unwrap();
        let resolver = bare_resolver(dir.path());
        let rules = FrameworkRules::default();
        let source = "import { util } from './missing';\nutil();\n";
        let report = clean_source(
            &parse(source),
            &dir.path().join("test.tsx"),
            &resolver,
            &rules,
            true,
        );

        assert!(report.changed);
        assert_eq!(
            report.removed,
            vec![RemovedImport {
                source: "./missing".to_string(),
                specifiers: vec!["util".to_string()],
            }]
        );
        assert_eq!(report.import_decls_after, 0);
        assert_eq!(report.new_code.as_deref(), Some("util();\n"));
    }

    #[test]
    fn test_missing_module_side_effect_import_kept() {
        let dir = TempDir::new().unwrap();
        let resolver = bare_resolver(dir.path());
        let rules = FrameworkRules::default();
        let source = "import './missing.css';\n";
        let report = clean_source(
            &parse(source),
            &dir.path().join("test.tsx"),
            &resolver,
            &rules,
            true,
        );
        assert!(!report.changed);
    }

    #[test]
    fn test_registry_import_not_checked_for_existence() {
        let dir = TempDir::new().unwrap();
        let resolver = bare_resolver(dir.path());
        let rules = FrameworkRules::default();
        let source = "import { useState } from 'react';\nuseState();\n";
        let report = clean_source(
            &parse(source),
            &dir.path().join("test.tsx"),
            &resolver,
            &rules,
            true,
        );
        assert!(!report.changed);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let report = clean_str("import { a, b } from './m';\nconsole.log(a);\n");
        let second = clean_str(report.new_code.as_deref().unwrap());
        assert!(!second.changed);
    }

    #[test]
    fn test_conservation_of_specifier_counts() {
        let source = "import { a, b } from './m';\nimport x from './x';\nimport './fx';\n";
        let report = clean_str(source);
        // Three specifiers existed in declarations with >= 1 specifier;
        // no more than that may be reported removed.
        assert!(report.removed_specifier_count() <= 3);
    }

    #[test]
    fn test_clean_file_roundtrip_on_disk() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("app.tsx");
        fs::write(&file, "import { a, b } from './m';\nconsole.log(a);\n").unwrap();
        fs::write(dir.path().join("m.tsx"), "export const a = 1, b = 2;\n").unwrap();

        let resolver = bare_resolver(dir.path());
        let rules = FrameworkRules::default();
        let mut parser = SourceParser::new().unwrap();

        let options = CleanOptions {
            dry_run: false,
            check_local_imports: false,
        };
        let report = clean_file(&file, &mut parser, &resolver, &rules, &options);
        assert!(report.changed);
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "import { a } from './m';\nconsole.log(a);\n"
        );

        // Second run is a no-op.
        let report = clean_file(&file, &mut parser, &resolver, &rules, &options);
        assert!(!report.changed);
    }

    #[test]
    fn test_dry_run_leaves_file_alone() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("app.ts");
        let original = "import { unused } from './m';\nconst x = 1;\n";
        fs::write(&file, original).unwrap();

        let resolver = bare_resolver(dir.path());
        let rules = FrameworkRules::default();
        let mut parser = SourceParser::new().unwrap();
        let options = CleanOptions {
            dry_run: true,
            check_local_imports: false,
        };

        let report = clean_file(&file, &mut parser, &resolver, &rules, &options);
        assert!(report.changed);
        assert_eq!(fs::read_to_string(&file).unwrap(), original);
    }

    #[test]
    fn test_unreadable_file_neutral_report() {
        let dir = TempDir::new().unwrap();
        let resolver = bare_resolver(dir.path());
        let rules = FrameworkRules::default();
        let mut parser = SourceParser::new().unwrap();

        let report = clean_file(
            &dir.path().join("absent.ts"),
            &mut parser,
            &resolver,
            &rules,
            &CleanOptions::default(),
        );
        assert!(!report.changed);
        assert_eq!(report.import_decls_before, 0);
    }

    #[test]
    fn test_clean_files_batch_preserves_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.ts");
        let b = dir.path().join("b.ts");
        fs::write(&a, "import { unused } from 'x';\n").unwrap();
        fs::write(&b, "const y = 2;\n").unwrap();

        let resolver = bare_resolver(dir.path());
        let rules = FrameworkRules::default();
        let options = CleanOptions {
            dry_run: true,
            check_local_imports: false,
        };

        let reports = clean_files(
            &[a.clone(), b.clone()],
            &resolver,
            &rules,
            &options,
            2,
        );
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].file, a);
        assert_eq!(reports[1].file, b);
        assert!(reports[0].changed);
        assert!(!reports[1].changed);
    }
}

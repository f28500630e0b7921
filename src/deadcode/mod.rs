//! Cross-file dead-code detection.
//!
//! A two-phase batch algorithm: first every discovered file is analyzed
//! in isolation (declarations, usage, export surface), then usage is
//! propagated across resolved import edges and one hop of re-exports.
//! A declaration whose name never lands in its own file's final
//! used-symbol set is a dead-code candidate.
//!
//! The engine is heuristic by design. Everything doubtful - routing
//! conventions, namespace imports, re-export chains - resolves toward
//! "used", so candidates are safe to review but still need review.

pub mod graph;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::analysis::{analyze_source, DeclarationKind, FileAnalysis, ImportSpecifier};
use crate::frameworks::FrameworkRules;
use crate::parser::{SourceLanguage, SourceParser};
use crate::resolver::ImportResolver;
use graph::{ImportLink, ModuleGraph};

/// Files are read in fixed-size batches to bound concurrently-open
/// descriptors.
const READ_BATCH_SIZE: usize = 32;

/// One dead-code candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadCodeItem {
    pub file: PathBuf,
    pub name: String,
    pub kind: DeclarationKind,
    pub exported: bool,
    pub start_line: usize,
    pub end_line: usize,
}

impl fmt::Display for DeadCodeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {} ({})",
            self.file.display(),
            self.start_line,
            self.name,
            self.kind
        )
    }
}

/// Result of a dead-code run.
#[derive(Debug)]
pub struct DeadCodeReport {
    /// Candidates sorted by file path, then symbol name.
    pub items: Vec<DeadCodeItem>,
    /// Files analyzed (including ones that failed to parse).
    pub files_analyzed: usize,
    /// Resolved import/re-export edges between discovered files.
    pub import_links: usize,
}

/// Runs the dead-code engine over an ordered file set.
///
/// Unreadable or unparseable files contribute an empty analysis and a
/// warning; they never abort the batch.
pub fn find_dead_code(
    files: &[PathBuf],
    resolver: &ImportResolver,
    rules: &FrameworkRules,
) -> DeadCodeReport {
    // Phase 1: per-file analysis, complete before any propagation.
    let analyses = analyze_files(files);

    // Resolve links against the full file set, then hand everything to
    // the graph.
    let links = collect_links(&analyses, resolver);

    let mut graph = ModuleGraph::new();
    for (path, analysis) in analyses {
        graph.add_module(path, analysis);
    }
    for (from, to, link) in links {
        graph.add_link(&from, &to, link);
    }

    // Phase 2: imports and re-exports mark usage in their targets.
    graph.propagate_links();
    graph.propagate_re_exports();

    let files_analyzed = graph.module_count();
    let import_links = graph.link_count();

    // Candidate selection.
    let mut items = Vec::new();
    for module in graph.modules() {
        let routing = rules.is_routing_path(&module.path);
        for decl in &module.analysis.declarations {
            // Routing conventions invoke exports through mechanisms this
            // analysis cannot see.
            if routing && decl.exported {
                continue;
            }
            if module.analysis.used_symbols.contains(&decl.name) {
                continue;
            }
            items.push(DeadCodeItem {
                file: module.path.clone(),
                name: decl.name.clone(),
                kind: decl.kind,
                exported: decl.exported,
                start_line: decl.start_line,
                end_line: decl.end_line,
            });
        }
    }
    items.sort_by(|a, b| a.file.cmp(&b.file).then_with(|| a.name.cmp(&b.name)));

    DeadCodeReport {
        items,
        files_analyzed,
        import_links,
    }
}

/// Reads and analyzes every file, in batches.
fn analyze_files(files: &[PathBuf]) -> Vec<(PathBuf, FileAnalysis)> {
    let mut parser = match SourceParser::new() {
        Ok(parser) => parser,
        Err(err) => {
            eprintln!("Warning: parser unavailable: {}", err);
            return files
                .iter()
                .map(|f| (f.clone(), FileAnalysis::empty()))
                .collect();
        }
    };

    let mut analyses = Vec::with_capacity(files.len());
    for batch in files.chunks(READ_BATCH_SIZE) {
        let contents: Vec<(&PathBuf, std::io::Result<String>)> = batch
            .par_iter()
            .map(|path| (path, fs::read_to_string(path)))
            .collect();

        for (path, content) in contents {
            let analysis = match content {
                Ok(content) => analyze_content(&mut parser, path, content),
                Err(err) => {
                    eprintln!("Warning: skipped unreadable file {}: {}", path.display(), err);
                    FileAnalysis::empty()
                }
            };
            analyses.push((path.clone(), analysis));
        }
    }
    analyses
}

fn analyze_content(parser: &mut SourceParser, path: &Path, content: String) -> FileAnalysis {
    let Some(language) = SourceLanguage::from_path(path) else {
        eprintln!("Warning: skipped unsupported file {}", path.display());
        return FileAnalysis::empty();
    };
    match parser.parse_source(content, language, path) {
        Ok(parsed) => analyze_source(&parsed),
        Err(err) => {
            eprintln!("Warning: skipped unparseable file {}: {}", path.display(), err);
            FileAnalysis::empty()
        }
    }
}

/// Resolves every local import and pass-through re-export into a link
/// between discovered files.
fn collect_links(
    analyses: &[(PathBuf, FileAnalysis)],
    resolver: &ImportResolver,
) -> Vec<(PathBuf, PathBuf, ImportLink)> {
    let mut links = Vec::new();

    for (path, analysis) in analyses {
        for import in &analysis.imports {
            if !resolver.is_local(&import.source) {
                continue;
            }
            let Some(target) = resolver.resolve(&import.source, path) else {
                continue;
            };
            for spec in &import.specifiers {
                let link = match spec {
                    ImportSpecifier::Named { imported, .. } => {
                        ImportLink::Named(imported.clone())
                    }
                    ImportSpecifier::Default { .. } => ImportLink::Default,
                    ImportSpecifier::Namespace { .. } => ImportLink::AllExports,
                };
                links.push((path.clone(), target.clone(), link));
            }
        }

        // `export { x } from './m'` consumes x from its target exactly
        // like an import would.
        for re_export in &analysis.export_from {
            if !resolver.is_local(&re_export.source) {
                continue;
            }
            let Some(target) = resolver.resolve(&re_export.source, path) else {
                continue;
            };
            match &re_export.names {
                Some(names) => {
                    for name in names {
                        links.push((path.clone(), target.clone(), ImportLink::Named(name.clone())));
                    }
                }
                None => links.push((path.clone(), target.clone(), ImportLink::AllExports)),
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{discover_files, DiscoverOptions};
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn run(root: &Path) -> DeadCodeReport {
        let files = discover_files(root, &DiscoverOptions::default()).unwrap();
        let resolver = ImportResolver::for_project(root, &[
            "ts".to_string(),
            "tsx".to_string(),
            "js".to_string(),
            "jsx".to_string(),
        ]);
        find_dead_code(&files, &resolver, &FrameworkRules::default())
    }

    fn names(report: &DeadCodeReport) -> Vec<&str> {
        report.items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_unused_local_function_reported() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/a.ts", "function orphan() {}\nexport const live = 1;\n");
        write(dir.path(), "src/b.ts", "import { live } from './a';\nconsole.log(live);\n");

        let report = run(dir.path());
        assert_eq!(names(&report), vec!["orphan"]);
        assert!(!report.items[0].exported);
        assert_eq!(report.items[0].kind, DeclarationKind::Function);
    }

    #[test]
    fn test_named_import_keeps_export_alive() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/util.ts", "export function helper() {}\n");
        write(
            dir.path(),
            "src/main.ts",
            "import { helper } from './util';\nhelper();\n",
        );

        let report = run(dir.path());
        assert!(names(&report).is_empty());
    }

    #[test]
    fn test_unimported_export_reported() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/util.ts", "export function lonely() {}\n");
        write(dir.path(), "src/main.ts", "const x = 1;\nconsole.log(x);\n");

        let report = run(dir.path());
        assert_eq!(names(&report), vec!["lonely"]);
        assert!(report.items[0].exported);
    }

    #[test]
    fn test_namespace_import_marks_all_exports() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "src/util.ts",
            "export function a() {}\nexport function b() {}\n",
        );
        write(
            dir.path(),
            "src/main.ts",
            "import * as util from './util';\nutil.a();\n",
        );

        let report = run(dir.path());
        assert!(names(&report).is_empty());
    }

    #[test]
    fn test_default_import_marks_recorded_name() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "src/app.ts",
            "export default function App() {}\n",
        );
        write(dir.path(), "src/main.ts", "import App from './app';\nApp();\n");

        let report = run(dir.path());
        assert!(names(&report).is_empty());
    }

    #[test]
    fn test_re_export_chain_not_reported() {
        // a.ts defines helper; index.ts re-exports it without using it;
        // consumer.ts imports it through the index.
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/a.ts", "export function helper() {}\n");
        write(dir.path(), "src/index.ts", "export { helper } from './a';\n");
        write(
            dir.path(),
            "src/consumer.ts",
            "import { helper } from './index';\nhelper();\n",
        );

        let report = run(dir.path());
        assert!(
            names(&report).is_empty(),
            "unexpected candidates: {:?}",
            report.items
        );
    }

    #[test]
    fn test_two_unused_variables_sorted_by_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/beta.ts", "const config = 1;\nexport {};\n");
        write(dir.path(), "src/alpha.ts", "const config = 2;\nexport {};\n");

        let report = run(dir.path());
        assert_eq!(report.items.len(), 2);
        assert!(report.items[0].file < report.items[1].file);
        assert!(report.items[0].file.ends_with("alpha.ts"));
        for item in &report.items {
            assert_eq!(item.name, "config");
            assert_eq!(item.kind, DeclarationKind::Variable);
            assert!(!item.exported);
        }
    }

    #[test]
    fn test_routing_directory_exports_exempt() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "src/pages/home.tsx",
            "export default function Home() { return null; }\nexport const config = { ssr: true };\nconst local = 1;\n",
        );

        let report = run(dir.path());
        // Exported declarations are exempt under pages/; the unexported
        // local is still reported.
        assert_eq!(names(&report), vec!["local"]);
    }

    #[test]
    fn test_unparseable_file_does_not_abort() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/bad.ts", "import { from ./;;;\n");
        write(dir.path(), "src/good.ts", "const orphan = 1;\nexport {};\n");

        let report = run(dir.path());
        assert_eq!(report.files_analyzed, 2);
        assert_eq!(names(&report), vec!["orphan"]);
    }

    #[test]
    fn test_determinism_across_runs() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/a.ts", "const x1 = 1;\nexport {};\n");
        write(dir.path(), "src/b.ts", "const x2 = 1;\nexport {};\n");
        write(dir.path(), "src/c.ts", "const x3 = 1;\nexport {};\n");

        let first = run(dir.path());
        let second = run(dir.path());
        assert_eq!(first.items, second.items);
    }

    #[test]
    fn test_alias_import_resolves_through_tsconfig() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "tsconfig.json",
            r#"{"compilerOptions": {"baseUrl": ".", "paths": {"@/*": ["src/*"]}}}"#,
        );
        write(dir.path(), "src/lib/api.ts", "export function fetchData() {}\n");
        write(
            dir.path(),
            "src/main.ts",
            "import { fetchData } from '@/lib/api';\nfetchData();\n",
        );

        let report = run(dir.path());
        assert!(names(&report).is_empty());
    }

    #[test]
    fn test_type_usage_counts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/types.ts", "export interface Props { id: number }\n");
        write(
            dir.path(),
            "src/main.ts",
            "import type { Props } from './types';\nconst p: Props = { id: 1 };\nconsole.log(p);\n",
        );

        let report = run(dir.path());
        assert!(names(&report).is_empty());
    }
}

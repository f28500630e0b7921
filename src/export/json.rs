//! JSON export implementation.
//!
//! Exports sweep results in JSON format for machine-readable output.

use super::{ExportData, Exporter};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable removed-import group for JSON output.
#[derive(Serialize)]
struct JsonRemovedImport {
    source: String,
    specifiers: Vec<String>,
}

/// Serializable per-file unused-import entry for JSON output.
#[derive(Serialize)]
struct JsonUnusedImports {
    file: String,
    imports: Vec<JsonRemovedImport>,
}

/// Serializable dead-code candidate for JSON output.
#[derive(Serialize)]
struct JsonDeadCode {
    file: String,
    name: String,
    kind: String,
    exported: bool,
    start_line: usize,
    end_line: usize,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    files_with_unused_imports: usize,
    unused_specifiers: usize,
    dead_code_candidates: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport {
    project_root: String,
    summary: JsonSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unused_imports: Vec<JsonUnusedImports>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dead_code: Vec<JsonDeadCode>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let unused_imports: Vec<JsonUnusedImports> = data
            .unused_imports
            .iter()
            .map(|entry| JsonUnusedImports {
                file: data.relative(&entry.file).into_owned(),
                imports: entry
                    .removed
                    .iter()
                    .map(|r| JsonRemovedImport {
                        source: r.source.clone(),
                        specifiers: r.specifiers.clone(),
                    })
                    .collect(),
            })
            .collect();

        let dead_code: Vec<JsonDeadCode> = data
            .dead_code
            .iter()
            .map(|item| JsonDeadCode {
                file: data.relative(&item.file).into_owned(),
                name: item.name.clone(),
                kind: item.kind.label().to_string(),
                exported: item.exported,
                start_line: item.start_line,
                end_line: item.end_line,
            })
            .collect();

        let export = JsonExport {
            project_root: data.project_root.display().to_string(),
            summary: JsonSummary {
                files_with_unused_imports: data.unused_imports.len(),
                unused_specifiers: data.unused_specifier_count(),
                dead_code_candidates: data.dead_code.len(),
            },
            unused_imports,
            dead_code,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

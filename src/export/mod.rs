//! Export functionality for sweep results.
//!
//! This module provides exporters for outputting unused-import and
//! dead-code reports in various formats: JSON, CSV, and Markdown.

pub mod csv;
pub mod json;
pub mod markdown;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::cleaner::{CleanReport, RemovedImport};
use crate::deadcode::{DeadCodeItem, DeadCodeReport};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON format - machine-readable, full data
    Json,
    /// CSV format - spreadsheet-friendly
    Csv,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, csv, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Unused imports found in one file.
#[derive(Debug, Clone)]
pub struct UnusedImportsEntry {
    pub file: PathBuf,
    pub removed: Vec<RemovedImport>,
}

impl UnusedImportsEntry {
    /// All removed specifier names, flattened across declarations.
    pub fn specifiers(&self) -> Vec<&str> {
        self.removed
            .iter()
            .flat_map(|r| r.specifiers.iter().map(|s| s.as_str()))
            .collect()
    }
}

/// Data container for export operations.
///
/// Holds whichever results the command produced; the unused-import
/// section stays empty on dead-code runs and vice versa.
#[derive(Debug, Default)]
pub struct ExportData {
    /// Root the scan ran against; file paths are reported relative to
    /// it where possible.
    pub project_root: PathBuf,
    /// Files with unused import specifiers.
    pub unused_imports: Vec<UnusedImportsEntry>,
    /// Dead-code candidates, already sorted.
    pub dead_code: Vec<DeadCodeItem>,
}

impl ExportData {
    /// Builds export data from cleaning reports, keeping only files
    /// that changed.
    pub fn from_clean_reports(project_root: PathBuf, reports: &[CleanReport]) -> Self {
        let unused_imports = reports
            .iter()
            .filter(|r| r.changed)
            .map(|r| UnusedImportsEntry {
                file: r.file.clone(),
                removed: r.removed.clone(),
            })
            .collect();
        Self {
            project_root,
            unused_imports,
            dead_code: Vec::new(),
        }
    }

    /// Builds export data from a dead-code report.
    pub fn from_dead_code(project_root: PathBuf, report: &DeadCodeReport) -> Self {
        Self {
            project_root,
            unused_imports: Vec::new(),
            dead_code: report.items.clone(),
        }
    }

    /// Total removed specifiers across all files.
    pub fn unused_specifier_count(&self) -> usize {
        self.unused_imports
            .iter()
            .map(|e| e.specifiers().len())
            .sum()
    }

    /// Display form of a path, relative to the project root when it is
    /// inside it.
    pub fn relative<'a>(&self, path: &'a Path) -> std::borrow::Cow<'a, str> {
        match path.strip_prefix(&self.project_root) {
            Ok(rel) => rel.to_string_lossy(),
            Err(_) => path.to_string_lossy(),
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(format: ExportFormat, data: &ExportData, writer: &mut W) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Csv => csv::CsvExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(
            "markdown".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert!("invalid".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::Json), "json");
        assert_eq!(format!("{}", ExportFormat::Csv), "csv");
        assert_eq!(format!("{}", ExportFormat::Markdown), "markdown");
    }

    #[test]
    fn test_from_clean_reports_keeps_changed_only() {
        let changed = CleanReport {
            file: PathBuf::from("/repo/a.ts"),
            removed: vec![RemovedImport {
                source: "./m".to_string(),
                specifiers: vec!["x".to_string(), "y".to_string()],
            }],
            import_decls_before: 1,
            import_decls_after: 0,
            changed: true,
            new_code: Some(String::new()),
        };
        let untouched = CleanReport::neutral(PathBuf::from("/repo/b.ts"));

        let data = ExportData::from_clean_reports(PathBuf::from("/repo"), &[changed, untouched]);
        assert_eq!(data.unused_imports.len(), 1);
        assert_eq!(data.unused_specifier_count(), 2);
    }

    #[test]
    fn test_relative_paths() {
        let data = ExportData {
            project_root: PathBuf::from("/repo"),
            ..Default::default()
        };
        assert_eq!(data.relative(Path::new("/repo/src/a.ts")), "src/a.ts");
        assert_eq!(data.relative(Path::new("/elsewhere/b.ts")), "/elsewhere/b.ts");
    }
}

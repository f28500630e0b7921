//! Markdown export implementation.
//!
//! Exports sweep results in Markdown format for documentation and
//! code-review notes.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "# Sweep Report")?;
        writeln!(writer)?;
        writeln!(writer, "**Project:** {}", data.project_root.display())?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(
            writer,
            "| Files with unused imports | {} |",
            data.unused_imports.len()
        )?;
        writeln!(
            writer,
            "| Unused import specifiers | {} |",
            data.unused_specifier_count()
        )?;
        writeln!(
            writer,
            "| Dead-code candidates | {} |",
            data.dead_code.len()
        )?;
        writeln!(writer)?;

        if !data.unused_imports.is_empty() {
            writeln!(writer, "## Unused Imports")?;
            writeln!(writer)?;
            writeln!(writer, "| File | Source | Specifiers |")?;
            writeln!(writer, "|------|--------|------------|")?;
            for entry in &data.unused_imports {
                let file = data.relative(&entry.file);
                for removed in &entry.removed {
                    writeln!(
                        writer,
                        "| {} | `{}` | {} |",
                        file,
                        removed.source,
                        removed
                            .specifiers
                            .iter()
                            .map(|s| format!("`{}`", s))
                            .collect::<Vec<_>>()
                            .join(", ")
                    )?;
                }
            }
            writeln!(writer)?;
        }

        if !data.dead_code.is_empty() {
            writeln!(writer, "## Dead-Code Candidates")?;
            writeln!(writer)?;
            writeln!(writer, "| File | Name | Kind | Exported | Lines |")?;
            writeln!(writer, "|------|------|------|----------|-------|")?;
            for item in &data.dead_code {
                writeln!(
                    writer,
                    "| {} | `{}` | {} | {} | {}-{} |",
                    data.relative(&item.file),
                    item.name,
                    item.kind,
                    if item.exported { "yes" } else { "no" },
                    item.start_line,
                    item.end_line,
                )?;
            }
            writeln!(writer)?;
            writeln!(
                writer,
                "> Heuristic detection - review candidates before removing them."
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DeclarationKind;
    use crate::cleaner::RemovedImport;
    use crate::deadcode::DeadCodeItem;
    use crate::export::UnusedImportsEntry;
    use std::path::PathBuf;

    fn create_test_data() -> ExportData {
        ExportData {
            project_root: PathBuf::from("/repo"),
            unused_imports: vec![UnusedImportsEntry {
                file: PathBuf::from("/repo/src/app.ts"),
                removed: vec![RemovedImport {
                    source: "react".to_string(),
                    specifiers: vec!["useMemo".to_string()],
                }],
            }],
            dead_code: vec![DeadCodeItem {
                file: PathBuf::from("/repo/src/util.ts"),
                name: "orphan".to_string(),
                kind: DeclarationKind::Function,
                exported: false,
                start_line: 3,
                end_line: 5,
            }],
        }
    }

    #[test]
    fn test_markdown_contains_sections() {
        let data = create_test_data();
        let mut output = Vec::new();
        MarkdownExporter.export(&data, &mut output).unwrap();

        let md = String::from_utf8(output).unwrap();
        assert!(md.contains("# Sweep Report"));
        assert!(md.contains("## Summary"));
        assert!(md.contains("## Unused Imports"));
        assert!(md.contains("## Dead-Code Candidates"));
        assert!(md.contains("| src/app.ts | `react` | `useMemo` |"));
        assert!(md.contains("| src/util.ts | `orphan` | function | no | 3-5 |"));
    }

    #[test]
    fn test_markdown_skips_empty_sections() {
        let data = ExportData {
            project_root: PathBuf::from("/repo"),
            ..Default::default()
        };
        let mut output = Vec::new();
        MarkdownExporter.export(&data, &mut output).unwrap();

        let md = String::from_utf8(output).unwrap();
        assert!(md.contains("## Summary"));
        assert!(!md.contains("## Unused Imports"));
        assert!(!md.contains("## Dead-Code Candidates"));
    }

    #[test]
    fn test_markdown_summary_counts() {
        let data = create_test_data();
        let mut output = Vec::new();
        MarkdownExporter.export(&data, &mut output).unwrap();

        let md = String::from_utf8(output).unwrap();
        assert!(md.contains("| Files with unused imports | 1 |"));
        assert!(md.contains("| Unused import specifiers | 1 |"));
        assert!(md.contains("| Dead-code candidates | 1 |"));
    }
}

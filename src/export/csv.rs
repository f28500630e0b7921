//! CSV export implementation.
//!
//! Exports sweep results in CSV format for spreadsheet use. One row per
//! finding: unused import specifiers first, dead-code candidates after.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// CSV exporter implementation.
pub struct CsvExporter;

impl CsvExporter {
    /// Escape a field value for CSV format.
    ///
    /// Wraps the value in quotes if it contains commas, quotes, or newlines.
    fn escape_field(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "finding,file,name,kind,source,exported,start_line,end_line")?;

        for entry in &data.unused_imports {
            let file = data.relative(&entry.file);
            for removed in &entry.removed {
                for specifier in &removed.specifiers {
                    writeln!(
                        writer,
                        "unused_import,{},{},,{},,,",
                        Self::escape_field(&file),
                        Self::escape_field(specifier),
                        Self::escape_field(&removed.source),
                    )?;
                }
            }
        }

        for item in &data.dead_code {
            writeln!(
                writer,
                "dead_code,{},{},{},,{},{},{}",
                Self::escape_field(&data.relative(&item.file)),
                Self::escape_field(&item.name),
                item.kind.label(),
                item.exported,
                item.start_line,
                item.end_line,
            )?;
        }

        Ok(())
    }
}

//! Source code analysis for codesweep.
//!
//! The three building blocks every command shares:
//!
//! - [`imports`] - models `import` declarations and their specifiers,
//!   with byte spans for the rewriter.
//! - [`usage`] - collects the set of referenced symbol names and the
//!   markup-literal flag.
//! - [`declarations`] - gathers top-level declarations and the export
//!   surface into a per-file [`FileAnalysis`].
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use codesweep::analysis::{analyze_source, collect_usage, extract_imports};
//! use codesweep::parser::SourceParser;
//!
//! let mut parser = SourceParser::new()?;
//! let parsed = parser.parse_file(Path::new("src/index.ts"))?;
//!
//! let imports = extract_imports(&parsed);
//! let usage = collect_usage(&parsed);
//! let analysis = analyze_source(&parsed);
//! ```

pub mod declarations;
pub mod imports;
pub mod usage;

// Re-export main types for convenience
pub use declarations::{
    analyze_source, Declaration, DeclarationKind, ExportFrom, FileAnalysis,
};
pub use imports::{extract_imports, Import, ImportSpecifier};
pub use usage::{collect_usage, UsageInfo};

//! Parsing module for codesweep.
//!
//! Three concerns live here:
//!
//! - **Source parsing** ([`source`]) - JavaScript/TypeScript text to
//!   tree-sitter syntax trees.
//! - **Project manifests** ([`package_json`], [`types`]) - package.json
//!   parsing and workspace (monorepo) detection.
//! - **Alias configuration** ([`tsconfig`]) - `baseUrl`/`paths` alias
//!   table used by the import resolver.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use codesweep::parser::{SourceParser, tsconfig::AliasTable};
//!
//! let mut parser = SourceParser::new()?;
//! let parsed = parser.parse_file(Path::new("src/index.ts"))?;
//!
//! let aliases = AliasTable::load(Path::new("."));
//! ```

pub mod package_json;
pub mod source;
pub mod tsconfig;
pub mod types;

// Re-export commonly used types for convenience
pub use source::{ParseError, ParseResult, ParsedSource, SourceLanguage, SourceParser};
pub use tsconfig::AliasTable;
pub use types::{PackageJson, WorkspaceConfig, WorkspaceKind, WorkspacePackage};

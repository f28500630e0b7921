//! Source text parsing via tree-sitter.
//!
//! Every analysis in this crate starts from a [`ParsedSource`]: the
//! original text plus its syntax tree. Parsing is infallible for most
//! real-world input, but callers must handle [`ParseError`] — malformed
//! files are skipped with a warning, never fatal.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tree_sitter::{Language, Parser, Tree};

/// Errors that can occur while turning source text into a syntax tree.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse file: {path}")]
    Parse { path: String },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Tree-sitter language initialization failed")]
    LanguageInit,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Language variant for a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    Tsx,
    Jsx,
}

impl SourceLanguage {
    /// Determine language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
            "jsx" => Some(SourceLanguage::Jsx),
            "ts" | "mts" | "cts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            _ => None,
        }
    }

    /// Determine language from a file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        Self::from_extension(ext)
    }

    /// Get the tree-sitter grammar for this language. JSX syntax is part
    /// of the JavaScript grammar; TSX needs its own.
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            SourceLanguage::JavaScript | SourceLanguage::Jsx => {
                tree_sitter_javascript::LANGUAGE.into()
            }
            SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SourceLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// A parsed file: source text plus syntax tree.
#[derive(Debug)]
pub struct ParsedSource {
    pub source: String,
    pub tree: Tree,
    pub language: SourceLanguage,
}

/// Parser for JavaScript/TypeScript source files.
///
/// Holds one tree-sitter parser per grammar so repeated parses reuse
/// internal state.
pub struct SourceParser {
    js_parser: Parser,
    ts_parser: Parser,
    tsx_parser: Parser,
}

impl SourceParser {
    /// Create a new SourceParser.
    pub fn new() -> ParseResult<Self> {
        Ok(Self {
            js_parser: make_parser(&tree_sitter_javascript::LANGUAGE.into())?,
            ts_parser: make_parser(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())?,
            tsx_parser: make_parser(&tree_sitter_typescript::LANGUAGE_TSX.into())?,
        })
    }

    /// Read and parse a file, picking the grammar from its extension.
    pub fn parse_file(&mut self, path: &Path) -> ParseResult<ParsedSource> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let language = SourceLanguage::from_extension(ext)
            .ok_or_else(|| ParseError::UnsupportedFileType(ext.to_string()))?;

        let source = fs::read_to_string(path)?;
        self.parse_source(source, language, path)
    }

    /// Parse source text directly.
    pub fn parse_source(
        &mut self,
        source: String,
        language: SourceLanguage,
        path: &Path,
    ) -> ParseResult<ParsedSource> {
        let parser = match language {
            SourceLanguage::JavaScript | SourceLanguage::Jsx => &mut self.js_parser,
            SourceLanguage::TypeScript => &mut self.ts_parser,
            SourceLanguage::Tsx => &mut self.tsx_parser,
        };

        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| ParseError::Parse {
                path: path.display().to_string(),
            })?;

        Ok(ParsedSource {
            source,
            tree,
            language,
        })
    }
}

fn make_parser(language: &Language) -> ParseResult<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(language)
        .map_err(|_| ParseError::LanguageInit)?;
    Ok(parser)
}

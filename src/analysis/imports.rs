//! Import declaration extraction.
//!
//! Walks a syntax tree and models every `import` statement: its source
//! module, the bindings it introduces, and the byte span of the whole
//! statement so the rewriter can regenerate or delete it in place.

use std::ops::Range;

use tree_sitter::Node;

use crate::parser::ParsedSource;

/// One binding introduced by an import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSpecifier {
    /// Named import: `import { foo } from 'm'` or `import { foo as bar } from 'm'`.
    Named {
        imported: String,
        local: String,
        /// `import { type Foo } from 'm'`
        type_only: bool,
    },
    /// Default import: `import foo from 'm'`.
    Default { local: String },
    /// Namespace import: `import * as foo from 'm'`.
    Namespace { local: String },
}

impl ImportSpecifier {
    /// The name bound in the importing file.
    pub fn local_name(&self) -> &str {
        match self {
            ImportSpecifier::Named { local, .. } => local,
            ImportSpecifier::Default { local } => local,
            ImportSpecifier::Namespace { local } => local,
        }
    }

    /// The name as exported by the source module, where one exists.
    pub fn imported_name(&self) -> Option<&str> {
        match self {
            ImportSpecifier::Named { imported, .. } => Some(imported),
            ImportSpecifier::Default { .. } => None,
            ImportSpecifier::Namespace { .. } => None,
        }
    }
}

/// One `import` declaration.
#[derive(Debug, Clone)]
pub struct Import {
    /// The source module (e.g. "react", "./utils", "@scope/package").
    pub source: String,
    /// Bindings in declaration order. Empty for side-effect imports.
    pub specifiers: Vec<ImportSpecifier>,
    /// `import type { ... } from 'm'` - the whole declaration is
    /// type-only.
    pub type_only: bool,
    /// Byte range of the statement in the original source.
    pub span: Range<usize>,
    /// Line number in the source file (1-indexed).
    pub line: usize,
    /// Quote character used around the source string.
    pub quote: char,
    /// Whether the statement ends with a semicolon.
    pub has_semicolon: bool,
}

impl Import {
    /// Returns true if this import introduces no bindings
    /// (`import './styles.css'`).
    pub fn is_side_effect_only(&self) -> bool {
        self.specifiers.is_empty()
    }

    /// Returns true if the source is a relative or absolute path rather
    /// than a package name.
    pub fn is_path_import(&self) -> bool {
        self.source.starts_with('.') || self.source.starts_with('/')
    }

    /// Local names of every specifier, in order.
    pub fn local_names(&self) -> Vec<String> {
        self.specifiers
            .iter()
            .map(|s| s.local_name().to_string())
            .collect()
    }
}

/// Extracts every import declaration from a parsed file, in document
/// order.
///
/// Import statements are only legal at the top level, so this walks the
/// program node's children rather than the full tree.
pub fn extract_imports(parsed: &ParsedSource) -> Vec<Import> {
    let source = parsed.source.as_str();
    let root = parsed.tree.root_node();
    let mut imports = Vec::new();

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "import_statement" {
            if let Some(import) = parse_import_statement(&child, source) {
                imports.push(import);
            }
        }
    }
    imports
}

/// Parse a single import_statement node.
fn parse_import_statement(node: &Node, source: &str) -> Option<Import> {
    let mut source_module = None;
    let mut quote = '\'';
    let mut specifiers = Vec::new();
    let mut type_only = false;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            // `import type { ... }` - the keyword sits between `import`
            // and the clause.
            "type" => type_only = true,
            "string" => {
                let text = node_text(&child, source)?;
                quote = text.chars().next().unwrap_or('\'');
                source_module = Some(strip_quotes(text));
            }
            "import_clause" => {
                parse_import_clause(&child, source, &mut specifiers);
            }
            _ => {}
        }
    }

    let source_module = source_module?;
    let statement_text = node_text(node, source)?;

    Some(Import {
        source: source_module,
        specifiers,
        type_only,
        span: node.byte_range(),
        line: node.start_position().row + 1,
        quote,
        has_semicolon: statement_text.trim_end().ends_with(';'),
    })
}

/// Parse the import clause (everything between `import` and `from`).
fn parse_import_clause(node: &Node, source: &str, specifiers: &mut Vec<ImportSpecifier>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "identifier" => {
                if let Some(name) = node_text(&child, source) {
                    specifiers.push(ImportSpecifier::Default {
                        local: name.to_string(),
                    });
                }
            }
            "namespace_import" => {
                if let Some(name) = find_namespace_name(&child, source) {
                    specifiers.push(ImportSpecifier::Namespace { local: name });
                }
            }
            "named_imports" => {
                parse_named_imports(&child, source, specifiers);
            }
            _ => {}
        }
    }
}

/// Find the local name in a namespace import (`* as NAME`).
fn find_namespace_name(node: &Node, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "identifier" {
            return node_text(&child, source).map(|s| s.to_string());
        }
    }
    None
}

/// Parse named imports: `{ foo, bar as baz, type Qux }`.
fn parse_named_imports(node: &Node, source: &str, specifiers: &mut Vec<ImportSpecifier>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "import_specifier" {
            if let Some(spec) = parse_import_specifier(&child, source) {
                specifiers.push(spec);
            }
        }
    }
}

/// Parse a single import specifier: `foo`, `foo as bar`, `type Foo`.
fn parse_import_specifier(node: &Node, source: &str) -> Option<ImportSpecifier> {
    let name_node = node.child_by_field_name("name")?;
    let imported = node_text(&name_node, source)?.to_string();

    let local = match node.child_by_field_name("alias") {
        Some(alias_node) => node_text(&alias_node, source)?.to_string(),
        None => imported.clone(),
    };

    let mut type_only = false;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "type" {
            type_only = true;
        }
    }

    Some(ImportSpecifier::Named {
        imported,
        local,
        type_only,
    })
}

/// Extract the text content of a node.
fn node_text<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

/// Remove surrounding quotes from a string literal.
fn strip_quotes(text: &str) -> String {
    text.trim_start_matches(['"', '\'', '`'])
        .trim_end_matches(['"', '\'', '`'])
        .to_string()
}

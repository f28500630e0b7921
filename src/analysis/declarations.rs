//! Top-level declaration and export bookkeeping.
//!
//! Produces the per-file [`FileAnalysis`] record the dead-code engine
//! consumes: every top-level declaration, the used-symbol set, and the
//! file's export surface (named exports, default export, pass-through
//! re-exports).

use std::collections::HashSet;
use std::fmt;

use tree_sitter::Node;

use super::imports::{extract_imports, Import};
use super::usage::collect_usage;
use crate::parser::ParsedSource;

/// Kind of a top-level declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeclarationKind {
    Function,
    Class,
    Variable,
    TypeAlias,
    Interface,
}

impl DeclarationKind {
    /// Short label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            DeclarationKind::Function => "function",
            DeclarationKind::Class => "class",
            DeclarationKind::Variable => "variable",
            DeclarationKind::TypeAlias => "type",
            DeclarationKind::Interface => "interface",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One top-level declaration.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub exported: bool,
    /// 1-indexed source lines.
    pub start_line: usize,
    pub end_line: usize,
}

/// A pass-through re-export edge: `export { x } from './m'` or
/// `export * from './m'`.
#[derive(Debug, Clone)]
pub struct ExportFrom {
    pub source: String,
    /// Names as they exist in the target module; `None` means `export *`.
    pub names: Option<Vec<String>>,
}

/// Everything the cross-file engine needs to know about one file.
///
/// Rebuilt on every run and discarded after reporting.
#[derive(Debug, Default)]
pub struct FileAnalysis {
    pub declarations: Vec<Declaration>,
    pub used_symbols: HashSet<String>,
    pub exported_names: HashSet<String>,
    /// Underlying name of the default export, when it is a named binding.
    pub default_export: Option<String>,
    /// Public names this file re-exports from another module.
    pub re_exported_names: HashSet<String>,
    pub has_markup_literal: bool,
    pub imports: Vec<Import>,
    pub export_from: Vec<ExportFrom>,
}

impl FileAnalysis {
    /// The neutral record used for unreadable or unparseable files.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Analyzes one parsed file into a [`FileAnalysis`] record.
pub fn analyze_source(parsed: &ParsedSource) -> FileAnalysis {
    let usage = collect_usage(parsed);
    let mut analysis = FileAnalysis {
        used_symbols: usage.used_symbols,
        has_markup_literal: usage.has_markup_literal,
        imports: extract_imports(parsed),
        ..Default::default()
    };

    let source = parsed.source.as_str();
    let root = parsed.tree.root_node();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "export_statement" => collect_export(&child, source, &mut analysis),
            _ => collect_declaration(&child, source, false, &mut analysis),
        }
    }

    analysis
}

/// Registers a declaration, keeping the first occurrence of a name and
/// only ever promoting `exported` (it is monotone).
fn push_declaration(
    analysis: &mut FileAnalysis,
    name: String,
    kind: DeclarationKind,
    exported: bool,
    node: &Node,
) {
    if let Some(existing) = analysis
        .declarations
        .iter_mut()
        .find(|d| d.name == name)
    {
        if exported {
            existing.exported = true;
        }
        return;
    }
    analysis.declarations.push(Declaration {
        name,
        kind,
        exported,
        start_line: node.start_position().row + 1,
        end_line: node.end_position().row + 1,
    });
}

/// Handles one top-level statement that may declare something.
fn collect_declaration(node: &Node, source: &str, exported: bool, analysis: &mut FileAnalysis) {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            if let Some(name) = name_field(node, source) {
                if exported {
                    analysis.exported_names.insert(name.clone());
                }
                push_declaration(analysis, name, DeclarationKind::Function, exported, node);
            }
        }
        "class_declaration" | "abstract_class_declaration" => {
            if let Some(name) = name_field(node, source) {
                if exported {
                    analysis.exported_names.insert(name.clone());
                }
                push_declaration(analysis, name, DeclarationKind::Class, exported, node);
            }
        }
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = node.walk();
            for declarator in node.children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                let Some(name_node) = declarator.child_by_field_name("name") else {
                    continue;
                };
                // Destructuring patterns introduce several names; only
                // plain identifier bindings become declarations.
                if name_node.kind() != "identifier" {
                    continue;
                }
                if let Some(name) = node_text(&name_node, source) {
                    if exported {
                        analysis.exported_names.insert(name.to_string());
                    }
                    push_declaration(
                        analysis,
                        name.to_string(),
                        DeclarationKind::Variable,
                        exported,
                        &declarator,
                    );
                }
            }
        }
        "type_alias_declaration" => {
            if let Some(name) = name_field(node, source) {
                if exported {
                    analysis.exported_names.insert(name.clone());
                }
                push_declaration(analysis, name, DeclarationKind::TypeAlias, exported, node);
            }
        }
        "interface_declaration" => {
            if let Some(name) = name_field(node, source) {
                if exported {
                    analysis.exported_names.insert(name.clone());
                }
                push_declaration(analysis, name, DeclarationKind::Interface, exported, node);
            }
        }
        _ => {}
    }
}

/// Handles an export_statement: inline declarations, export clauses,
/// default exports, and pass-through re-exports.
fn collect_export(node: &Node, source: &str, analysis: &mut FileAnalysis) {
    let is_default = has_child_kind(node, "default");
    let from_source = node
        .child_by_field_name("source")
        .and_then(|s| node_text(&s, source))
        .map(strip_quotes);

    if let Some(decl) = node.child_by_field_name("declaration") {
        if is_default {
            // `export default function foo() {}` keeps its binding name.
            analysis.default_export = name_field(&decl, source);
        }
        collect_declaration(&decl, source, true, analysis);
        if let Some(name) = name_field(&decl, source) {
            analysis.exported_names.insert(name);
        }
        return;
    }

    if is_default {
        // `export default foo;` - record the name when it is a bare
        // identifier; anonymous defaults have no name to track.
        if let Some(value) = node.child_by_field_name("value") {
            if value.kind() == "identifier" {
                analysis.default_export = node_text(&value, source).map(|s| s.to_string());
            }
        }
        return;
    }

    // `export * from './m'` and `export * as ns from './m'`
    if let Some(src) = &from_source {
        if has_child_kind(node, "*") || has_child_kind(node, "namespace_export") {
            analysis.export_from.push(ExportFrom {
                source: src.clone(),
                names: None,
            });
            return;
        }
    }

    // `export { a, b as c }` with or without a source.
    let mut local_names = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "export_clause" {
            continue;
        }
        let mut clause_cursor = child.walk();
        for spec in child.children(&mut clause_cursor) {
            if spec.kind() != "export_specifier" {
                continue;
            }
            let Some(local) = spec
                .child_by_field_name("name")
                .and_then(|n| node_text(&n, source))
            else {
                continue;
            };
            let public = spec
                .child_by_field_name("alias")
                .and_then(|n| node_text(&n, source))
                .unwrap_or(local);

            analysis.exported_names.insert(local.to_string());
            push_declaration(
                analysis,
                local.to_string(),
                DeclarationKind::Variable,
                true,
                &spec,
            );
            if from_source.is_some() {
                analysis.re_exported_names.insert(public.to_string());
            }
            local_names.push(local.to_string());
        }
    }

    if let Some(src) = from_source {
        if !local_names.is_empty() {
            analysis.export_from.push(ExportFrom {
                source: src,
                names: Some(local_names),
            });
        }
    }
}

fn name_field(node: &Node, source: &str) -> Option<String> {
    node.child_by_field_name("name")
        .and_then(|n| node_text(&n, source))
        .map(|s| s.to_string())
}

fn has_child_kind(node: &Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == kind);
    found
}

fn node_text<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

fn strip_quotes(text: &str) -> String {
    text.trim_start_matches(['"', '\'', '`'])
        .trim_end_matches(['"', '\'', '`'])
        .to_string()
}

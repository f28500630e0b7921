//! Symbol usage collection.
//!
//! Walks a syntax tree and gathers every name that is *referenced* -
//! as opposed to merely bound. Matching is by name text, not lexical
//! scope: two unrelated bindings sharing a name are indistinguishable
//! here. That trade-off under-reports dead code rather than flagging
//! live code, which is the direction this tool must err in.

use std::collections::HashSet;

use tree_sitter::Node;

use crate::parser::ParsedSource;

/// Node kinds that read as a symbol reference.
const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "property_identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
    "statement_identifier",
];

/// Node kinds that make a file "contain markup" (JSX/TSX literals).
const MARKUP_KINDS: &[&str] = &["jsx_element", "jsx_self_closing_element", "jsx_fragment"];

/// Declaration node kinds whose `name` field is a binding, not a use.
const NAMED_DECLARATION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "class_declaration",
    "abstract_class_declaration",
    "type_alias_declaration",
    "interface_declaration",
    "enum_declaration",
];

/// Result of scanning one file for symbol references.
#[derive(Debug, Default)]
pub struct UsageInfo {
    /// Names referenced outside their own binding position.
    pub used_symbols: HashSet<String>,
    /// True if the file contains any markup-literal element syntax.
    pub has_markup_literal: bool,
}

impl UsageInfo {
    /// Returns true if `name` is referenced anywhere in the file.
    pub fn is_used(&self, name: &str) -> bool {
        self.used_symbols.contains(name)
    }
}

/// Collects the used-symbol set and markup flag for a parsed file.
///
/// Excluded from usage:
/// - anything inside an import declaration (import bindings are not
///   self-uses),
/// - the left-hand binding of a variable declarator,
/// - function/method parameter names,
/// - the declared name of a function/class/type/interface declaration.
///
/// Type-position references count as usage; so do property names and
/// markup element names (name-text matching keeps this conservative).
pub fn collect_usage(parsed: &ParsedSource) -> UsageInfo {
    let mut info = UsageInfo::default();
    let source = parsed.source.as_str();
    visit(parsed.tree.root_node(), source, &mut info);
    info
}

fn visit(node: Node, source: &str, info: &mut UsageInfo) {
    let kind = node.kind();

    // Import bindings never count as usage; skip the whole subtree.
    if kind == "import_statement" {
        return;
    }

    if MARKUP_KINDS.contains(&kind) {
        info.has_markup_literal = true;
    }

    if IDENTIFIER_KINDS.contains(&kind) && !is_binding_position(&node) {
        if let Some(text) = source.get(node.start_byte()..node.end_byte()) {
            info.used_symbols.insert(text.to_string());
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, source, info);
    }
}

/// Returns true if `node` is the binding side of a declaration or
/// parameter rather than a reference.
fn is_binding_position(node: &Node) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };

    match parent.kind() {
        // `const x = ...` - x is being declared, not used.
        "variable_declarator" => is_field(&parent, "name", node),
        // Plain JS parameters sit directly in formal_parameters.
        "formal_parameters" => true,
        // TypeScript wraps each parameter.
        "required_parameter" | "optional_parameter" => is_field(&parent, "pattern", node),
        // `x => x + 1` - the bare parameter skips formal_parameters.
        "arrow_function" => is_field(&parent, "parameter", node),
        // `function f(a = 1)` - a sits in an assignment_pattern.
        "assignment_pattern" => {
            is_field(&parent, "left", node)
                && parent
                    .parent()
                    .is_some_and(|gp| matches!(gp.kind(), "formal_parameters"))
        }
        kind if NAMED_DECLARATION_KINDS.contains(&kind) => is_field(&parent, "name", node),
        _ => false,
    }
}

fn is_field(parent: &Node, field: &str, node: &Node) -> bool {
    parent
        .child_by_field_name(field)
        .is_some_and(|f| f.id() == node.id())
}

//! Span-based source regeneration.
//!
//! The rewriter never reprints a whole file. Each decision produces an
//! [`Edit`] against the original text: a reduced import declaration is
//! re-rendered from its surviving specifiers and spliced over the
//! statement's byte range; a fully-removed declaration deletes its
//! range plus the trailing newline. Everything outside edited spans is
//! byte-identical, which is what makes cleaning idempotent.

use std::ops::Range;

use crate::analysis::{Import, ImportSpecifier};

/// One replacement against the original source text.
#[derive(Debug, Clone)]
pub struct Edit {
    pub span: Range<usize>,
    pub replacement: String,
}

impl Edit {
    /// An edit that deletes the import statement entirely, consuming
    /// the newline that followed it.
    pub fn delete(import: &Import, source: &str) -> Self {
        let mut span = import.span.clone();
        let rest = &source[span.end..];
        if rest.starts_with("\r\n") {
            span.end += 2;
        } else if rest.starts_with('\n') {
            span.end += 1;
        }
        Edit {
            span,
            replacement: String::new(),
        }
    }

    /// An edit that replaces the statement with a re-rendered
    /// declaration keeping only `survivors`.
    pub fn replace(import: &Import, survivors: &[ImportSpecifier]) -> Self {
        Edit {
            span: import.span.clone(),
            replacement: render_import(import, survivors),
        }
    }
}

/// Renders an import declaration with the given specifiers, preserving
/// the original quote style, `import type` form, aliases, and trailing
/// semicolon presence.
pub fn render_import(import: &Import, survivors: &[ImportSpecifier]) -> String {
    let mut segments: Vec<String> = Vec::new();
    let mut named: Vec<String> = Vec::new();

    for spec in survivors {
        match spec {
            ImportSpecifier::Default { local } => segments.push(local.clone()),
            ImportSpecifier::Namespace { local } => segments.push(format!("* as {}", local)),
            ImportSpecifier::Named {
                imported,
                local,
                type_only,
            } => {
                let mut rendered = String::new();
                if *type_only {
                    rendered.push_str("type ");
                }
                rendered.push_str(imported);
                if local != imported {
                    rendered.push_str(" as ");
                    rendered.push_str(local);
                }
                named.push(rendered);
            }
        }
    }

    if !named.is_empty() {
        segments.push(format!("{{ {} }}", named.join(", ")));
    }

    let keyword = if import.type_only {
        "import type"
    } else {
        "import"
    };
    let semicolon = if import.has_semicolon { ";" } else { "" };

    format!(
        "{} {} from {quote}{}{quote}{}",
        keyword,
        segments.join(", "),
        import.source,
        semicolon,
        quote = import.quote,
    )
}

/// Applies edits to the source text. Spans must not overlap; edits are
/// applied back-to-front so earlier spans stay valid.
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| b.span.start.cmp(&a.span.start));
    let mut result = source.to_string();
    for edit in edits {
        result.replace_range(edit.span, &edit.replacement);
    }
    result
}

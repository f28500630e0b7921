//! Framework convention rules.
//!
//! Two conventions need special handling and both are injected rather
//! than hard-coded, so alternative frameworks can be configured and the
//! engines stay independently testable:
//!
//! - **Implicit markup usage**: a default import from a UI-markup
//!   framework module is referenced by the lowering of markup literals
//!   even when the identifier never appears, so it must survive
//!   cleaning whenever the file contains markup.
//! - **Routing directories**: files under conventional routing
//!   directories have their exports invoked by the framework router;
//!   exported declarations there are exempt from dead-code reporting.

use std::path::Path;

/// Injected framework conventions.
#[derive(Debug, Clone)]
pub struct FrameworkRules {
    /// Modules whose default import is implicitly used by markup
    /// literals.
    pub markup_default_modules: Vec<String>,
    /// Directory names whose files get the routing exemption.
    pub routing_dirs: Vec<String>,
}

impl Default for FrameworkRules {
    fn default() -> Self {
        Self {
            markup_default_modules: vec!["react".to_string()],
            routing_dirs: vec!["pages".to_string(), "app".to_string()],
        }
    }
}

impl FrameworkRules {
    /// Rules with no framework conventions at all.
    pub fn none() -> Self {
        Self {
            markup_default_modules: Vec::new(),
            routing_dirs: Vec::new(),
        }
    }

    /// Returns true if a default import from `source` must be retained
    /// in a file containing markup literals.
    pub fn retains_default_import(&self, source: &str, has_markup_literal: bool) -> bool {
        has_markup_literal && self.markup_default_modules.iter().any(|m| m == source)
    }

    /// Returns true if `path` sits under a routing directory, meaning
    /// its exported declarations are invoked by convention.
    pub fn is_routing_path(&self, path: &Path) -> bool {
        path.components().any(|c| {
            c.as_os_str()
                .to_str()
                .is_some_and(|name| self.routing_dirs.iter().any(|dir| dir == name))
        })
    }
}

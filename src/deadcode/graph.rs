//! Module graph over discovered files.
//!
//! Nodes carry each file's [`FileAnalysis`]; edges carry the usage
//! marks an import or re-export link propagates into its target. Built
//! once per run, after all per-file analyses complete, and then driven
//! through the two propagation passes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::analysis::FileAnalysis;

/// What one resolved link marks as used in its target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportLink {
    /// A named import or named re-export: marks exactly this name.
    Named(String),
    /// A default import: marks the target's recorded default-export
    /// name, if it has one.
    Default,
    /// A namespace import or `export *`: marks every exported name of
    /// the target.
    AllExports,
}

/// One file in the graph.
#[derive(Debug)]
pub struct ModuleNode {
    pub path: PathBuf,
    pub analysis: FileAnalysis,
}

/// Directed graph of discovered files; edges point from the importing
/// file to the file it imports.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    graph: DiGraph<ModuleNode, ImportLink>,
    indices: HashMap<PathBuf, NodeIndex>,
}

impl ModuleGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file node. Insertion order is preserved by petgraph's
    /// node indices, which keeps iteration deterministic.
    pub fn add_module(&mut self, path: PathBuf, analysis: FileAnalysis) -> NodeIndex {
        if let Some(&idx) = self.indices.get(&path) {
            return idx;
        }
        let idx = self.graph.add_node(ModuleNode {
            path: path.clone(),
            analysis,
        });
        self.indices.insert(path, idx);
        idx
    }

    /// Adds a resolved link between two discovered files. Links to
    /// files outside the discovered set are dropped silently - there is
    /// no analysis to mark.
    pub fn add_link(&mut self, from: &Path, to: &Path, link: ImportLink) {
        let (Some(&from_idx), Some(&to_idx)) = (self.indices.get(from), self.indices.get(to))
        else {
            return;
        };
        self.graph.add_edge(from_idx, to_idx, link);
    }

    /// Number of file nodes.
    pub fn module_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of resolved import/re-export edges.
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up a file's analysis.
    pub fn analysis(&self, path: &Path) -> Option<&FileAnalysis> {
        self.indices.get(path).map(|&idx| &self.graph[idx].analysis)
    }

    /// Iterate nodes in insertion order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleNode> + '_ {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Propagation step: every edge contributes usage marks to its
    /// target file's analysis.
    ///
    /// Marks are collected against the immutable graph first and merged
    /// afterwards, so edge evaluation never observes partial updates.
    pub fn propagate_links(&mut self) {
        let mut marks: Vec<(NodeIndex, String)> = Vec::new();

        for edge in self.graph.edge_references() {
            let target = edge.target();
            let analysis = &self.graph[target].analysis;
            match edge.weight() {
                ImportLink::Named(name) => marks.push((target, name.clone())),
                ImportLink::Default => {
                    if let Some(name) = &analysis.default_export {
                        marks.push((target, name.clone()));
                    }
                }
                ImportLink::AllExports => {
                    for name in &analysis.exported_names {
                        marks.push((target, name.clone()));
                    }
                }
            }
        }

        for (idx, name) in marks {
            self.graph[idx].analysis.used_symbols.insert(name);
        }
    }

    /// Re-export resolution: a re-exported name not used locally is
    /// marked used if any other file references that name.
    ///
    /// One pass only - chains of three or more re-export hops may stay
    /// unreported, which under-reports usage rather than over-deleting.
    pub fn propagate_re_exports(&mut self) {
        let mut marks: Vec<(NodeIndex, String)> = Vec::new();

        for idx in self.graph.node_indices() {
            let analysis = &self.graph[idx].analysis;
            for name in &analysis.re_exported_names {
                if analysis.used_symbols.contains(name) {
                    continue;
                }
                let referenced_elsewhere = self.graph.node_indices().any(|other| {
                    other != idx && self.graph[other].analysis.used_symbols.contains(name)
                });
                if referenced_elsewhere {
                    marks.push((idx, name.clone()));
                }
            }
        }

        for (idx, name) in marks {
            self.graph[idx].analysis.used_symbols.insert(name);
        }
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Release graph assembly with petgraph backing
//!
//! Edges come from three places: consecutive main-line releases, each
//! base release to its hotfixes, and consecutive hotfixes of one base.

use crate::error::Result;
use crate::types::{EdgeKind, EnrichedVersionEntry, GraphEdge, GraphNode, JoinKey};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// The release graph: nodes in input order plus derived edges
#[derive(Debug, Clone)]
pub struct VersionGraph {
    /// The underlying directed graph, index-aligned with `nodes`
    graph: DiGraph<String, EdgeKind>,
    /// Map from node id to node index (first occurrence wins)
    node_indices: HashMap<String, NodeIndex>,
    /// Map from join-key value to main-line node position
    base_index: HashMap<String, usize>,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    join_key: JoinKey,
}

impl Default for VersionGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct GraphDocument<'a> {
    nodes: &'a [GraphNode],
    edges: &'a [GraphEdge],
}

impl VersionGraph {
    /// Create a new empty graph
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
            base_index: HashMap::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            join_key: JoinKey::default(),
        }
    }

    /// Build nodes and edges from enriched entries
    ///
    /// Hotfix bases are resolved against main-line nodes only, through
    /// their `join_key` field. A hotfix whose base does not resolve gets
    /// no base edge and is reported by [`VersionGraph::orphans`].
    #[must_use]
    pub fn assemble(enriched: Vec<EnrichedVersionEntry>, join_key: JoinKey) -> Self {
        let mut graph = Self {
            join_key,
            ..Self::new()
        };
        graph.nodes = enriched.into_iter().map(GraphNode::from).collect();

        for (position, node) in graph.nodes.iter().enumerate() {
            let idx = graph.graph.add_node(node.id.clone());
            graph.node_indices.entry(node.id.clone()).or_insert(idx);
            if !node.is_hotfix {
                graph
                    .base_index
                    .entry(join_key.select(&node.id, &node.version).to_string())
                    .or_insert(position);
            }
        }

        let pending = graph.derive_edges();
        let mut seen: HashSet<(String, String)> = HashSet::new();
        for (from, to, kind) in pending {
            // Duplicate tags would otherwise produce self-loops
            if from == to || !seen.insert((from.clone(), to.clone())) {
                continue;
            }
            if let (Some(&from_idx), Some(&to_idx)) =
                (graph.node_indices.get(&from), graph.node_indices.get(&to))
            {
                graph.graph.add_edge(from_idx, to_idx, kind);
            }
            graph.edges.push(GraphEdge::new(&from, &to, kind));
        }

        graph
    }

    fn derive_edges(&self) -> Vec<(String, String, EdgeKind)> {
        let mut pending = Vec::new();

        let main_line = self.main_line();
        for pair in main_line.windows(2) {
            pending.push((pair[0].id.clone(), pair[1].id.clone(), EdgeKind::MainLine));
        }

        for (position, node) in self.nodes.iter().enumerate() {
            if let Some(base) = self.resolve_base(position) {
                pending.push((self.nodes[base].id.clone(), node.id.clone(), EdgeKind::Hotfix));
            }
        }

        for node in main_line {
            let mut chain: Vec<(u64, &str)> = node
                .children
                .iter()
                .map(|child| (self.sequence_of(child), child.as_str()))
                .collect();
            chain.sort_by_key(|(sequence, _)| *sequence);
            for pair in chain.windows(2) {
                pending.push((pair[0].1.to_string(), pair[1].1.to_string(), EdgeKind::HotfixChain));
            }
        }

        pending
    }

    fn sequence_of(&self, id: &str) -> u64 {
        self.get_node(id)
            .and_then(|n| n.hotfix_sequence)
            .unwrap_or(0)
    }

    /// Position of the main-line node a hotfix at `position` branches from
    #[must_use]
    pub fn resolve_base(&self, position: usize) -> Option<usize> {
        let node = self.nodes.get(position)?;
        if !node.is_hotfix {
            return None;
        }
        let base = node.base_tag.as_deref()?;
        self.base_index.get(base).copied()
    }

    /// Join key used to resolve bases
    #[must_use]
    pub fn join_key(&self) -> JoinKey {
        self.join_key
    }

    /// All nodes, in input order
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// All edges, in emission order
    #[must_use]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Get node count
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get edge count
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if the graph is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by id
    #[must_use]
    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.node_indices
            .get(id)
            .and_then(|idx| self.nodes.get(idx.index()))
    }

    /// Main-line nodes in input order
    #[must_use]
    pub fn main_line(&self) -> Vec<&GraphNode> {
        self.nodes.iter().filter(|n| !n.is_hotfix).collect()
    }

    /// Hotfixes whose base resolves to the node with `id`, in input order
    #[must_use]
    pub fn hotfixes_of(&self, id: &str) -> Vec<&GraphNode> {
        let Some(target) = self.node_indices.get(id).map(|idx| idx.index()) else {
            return vec![];
        };
        self.nodes
            .iter()
            .enumerate()
            .filter(|(position, _)| self.resolve_base(*position) == Some(target))
            .map(|(_, node)| node)
            .collect()
    }

    /// Check whether the node at `position` is a hotfix with no resolvable base
    #[must_use]
    pub fn is_orphan(&self, position: usize) -> bool {
        self.nodes
            .get(position)
            .is_some_and(|n| n.is_hotfix && self.resolve_base(position).is_none())
    }

    /// Hotfixes with no resolvable base, in input order
    #[must_use]
    pub fn orphans(&self) -> Vec<&GraphNode> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(position, _)| self.is_orphan(*position))
            .map(|(_, node)| node)
            .collect()
    }

    /// Get edges from a specific node
    #[must_use]
    pub fn edges_from(&self, id: &str) -> Vec<&GraphEdge> {
        self.edges.iter().filter(|e| e.from == id).collect()
    }

    /// Get edges to a specific node
    #[must_use]
    pub fn edges_to(&self, id: &str) -> Vec<&GraphEdge> {
        self.edges.iter().filter(|e| e.to == id).collect()
    }

    /// Check that no edge path loops back on itself
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Export to DOT format for Graphviz
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph releases {\n");
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box, style=rounded];\n\n");

        for (position, node) in self.nodes.iter().enumerate() {
            let style = if !node.is_hotfix {
                ""
            } else if self.is_orphan(position) {
                ", style=\"rounded,dashed\", color=red"
            } else {
                ", style=\"rounded,dashed\""
            };
            dot.push_str(&format!(
                "  \"{}\" [label=\"{}\"{}];\n",
                dot_escape(&node.id),
                dot_escape(&node.version),
                style
            ));
        }

        dot.push('\n');

        for edge in &self.edges {
            let style = match edge.kind {
                EdgeKind::MainLine => "",
                EdgeKind::Hotfix => " [style=dashed]",
                EdgeKind::HotfixChain => " [style=dotted]",
            };
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\"{};\n",
                dot_escape(&edge.from),
                dot_escape(&edge.to),
                style
            ));
        }

        dot.push_str("}\n");
        dot
    }

    /// Export nodes and edges to JSON
    pub fn to_json(&self) -> Result<String> {
        let document = GraphDocument {
            nodes: &self.nodes,
            edges: &self.edges,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::HotfixParser;
    use crate::relations::enrich;
    use crate::types::VersionEntry;

    fn assemble(tags: &[&str]) -> VersionGraph {
        let entries: Vec<VersionEntry> = tags.iter().map(|t| VersionEntry::from_tag(t)).collect();
        VersionGraph::assemble(enrich(&entries, &HotfixParser::default(), JoinKey::Tag), JoinKey::Tag)
    }

    fn pairs(graph: &VersionGraph, kind: EdgeKind) -> Vec<(&str, &str)> {
        graph
            .edges()
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| (e.from.as_str(), e.to.as_str()))
            .collect()
    }

    #[test]
    fn test_release_with_two_hotfixes() {
        let graph = assemble(&["v1.0.0", "v1.0.0-hotfix.1", "v1.0.0-hotfix.2", "v2.0.0"]);

        assert_eq!(graph.node_count(), 4);
        assert_eq!(pairs(&graph, EdgeKind::MainLine), vec![("v1.0.0", "v2.0.0")]);
        assert_eq!(
            pairs(&graph, EdgeKind::Hotfix),
            vec![("v1.0.0", "v1.0.0-hotfix.1"), ("v1.0.0", "v1.0.0-hotfix.2")]
        );
        assert_eq!(
            pairs(&graph, EdgeKind::HotfixChain),
            vec![("v1.0.0-hotfix.1", "v1.0.0-hotfix.2")]
        );
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.edges().iter().filter(|e| e.is_hotfix).count() == 3);
    }

    #[test]
    fn test_chain_follows_sequence_not_input_order() {
        let graph = assemble(&["v1", "v1-fix.3", "v1-fix.1", "v1-fix.2"]);
        assert_eq!(
            pairs(&graph, EdgeKind::HotfixChain),
            vec![("v1-fix.1", "v1-fix.2"), ("v1-fix.2", "v1-fix.3")]
        );
    }

    #[test]
    fn test_main_line_skips_hotfixes() {
        let graph = assemble(&["v3", "v2-fix.1", "v2", "v1"]);
        assert_eq!(pairs(&graph, EdgeKind::MainLine), vec![("v3", "v2"), ("v2", "v1")]);
        assert_eq!(pairs(&graph, EdgeKind::Hotfix), vec![("v2", "v2-fix.1")]);
    }

    #[test]
    fn test_unresolved_base_is_orphan() {
        let graph = assemble(&["v2.0.0", "v1.0.0-hotfix.1"]);

        assert!(pairs(&graph, EdgeKind::Hotfix).is_empty());
        let orphans: Vec<_> = graph.orphans().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(orphans, vec!["v1.0.0-hotfix.1"]);
        assert!(graph.get_node("v1.0.0-hotfix.1").is_some());
    }

    #[test]
    fn test_hotfix_of_hotfix_is_orphan() {
        let graph = assemble(&["v1", "v1-fix.1", "v1-fix.1-fix.1"]);
        assert_eq!(pairs(&graph, EdgeKind::Hotfix), vec![("v1", "v1-fix.1")]);
        assert_eq!(graph.orphans().len(), 1);
        assert_eq!(graph.orphans()[0].id, "v1-fix.1-fix.1");
    }

    #[test]
    fn test_duplicate_tags_do_not_repeat_edges() {
        let graph = assemble(&["v1", "v1", "v2"]);
        assert_eq!(pairs(&graph, EdgeKind::MainLine), vec![("v1", "v2")]);
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_edges_from_and_to() {
        let graph = assemble(&["v1", "v1-fix.1", "v1-fix.2", "v2"]);
        assert_eq!(graph.edges_from("v1").len(), 3);
        assert_eq!(graph.edges_to("v1-fix.2").len(), 2);
        assert_eq!(graph.hotfixes_of("v1").len(), 2);
        assert!(graph.hotfixes_of("v2").is_empty());
        assert!(graph.hotfixes_of("missing").is_empty());
    }

    #[test]
    fn test_graph_is_acyclic() {
        let graph = assemble(&["v1", "v1-fix.1", "v1-fix.2", "v2", "v2-patch.1", "v3"]);
        assert!(graph.is_acyclic());
    }

    #[test]
    fn test_join_key_version() {
        let entries = vec![
            VersionEntry::new("1.0.0", "rel-1.0.0"),
            VersionEntry::new("1.0.0-fix.1", "rel-1.0.0-fix.1"),
        ];
        let parser = HotfixParser::default();

        let by_tag = VersionGraph::assemble(enrich(&entries, &parser, JoinKey::Tag), JoinKey::Tag);
        assert_eq!(by_tag.orphans().len(), 1);

        let by_version =
            VersionGraph::assemble(enrich(&entries, &parser, JoinKey::Version), JoinKey::Version);
        assert!(by_version.orphans().is_empty());
        assert_eq!(by_version.edges()[0].from, "rel-1.0.0");
    }

    #[test]
    fn test_empty_graph() {
        let graph = assemble(&[]);
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_acyclic());
    }

    #[test]
    fn test_to_dot() {
        let graph = assemble(&["v1.0.0", "v1.0.0-fix.1", "v2.0.0", "v0.9.0-fix.1"]);
        insta::assert_snapshot!(graph.to_dot(), @r#"
        digraph releases {
          rankdir=LR;
          node [shape=box, style=rounded];

          "v1.0.0" [label="v1.0.0"];
          "v1.0.0-fix.1" [label="v1.0.0-fix.1", style="rounded,dashed"];
          "v2.0.0" [label="v2.0.0"];
          "v0.9.0-fix.1" [label="v0.9.0-fix.1", style="rounded,dashed", color=red];

          "v1.0.0" -> "v2.0.0";
          "v1.0.0" -> "v1.0.0-fix.1" [style=dashed];
        }
        "#);
    }

    #[test]
    fn test_to_dot_escapes_quotes() {
        let graph = assemble(&["v\"1"]);
        assert!(graph.to_dot().contains("\"v\\\"1\""));
    }

    #[test]
    fn test_to_json() {
        let graph = assemble(&["v1", "v1-fix.1"]);
        let json: serde_json::Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();
        assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(json["edges"][0]["kind"], "hotfix");
        assert_eq!(json["edges"][0]["isHotfix"], true);
    }
}

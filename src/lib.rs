// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Relgraph library - release history graphs for version tags
//!
//! This crate detects hotfix relationships in version strings, assembles
//! a release/hotfix graph from a list of version entries and lays it out
//! in two dimensions for rendering.
//!
//! ```text
//! VersionEntry ──parse/enrich──▶ EnrichedVersionEntry
//!              ──assemble──────▶ VersionGraph (nodes + edges)
//!              ──layout────────▶ PositionedGraph (x, y, bounds)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod parser;
pub mod pipeline;
pub mod relations;
pub mod render;
pub mod source;

/// Core data types shared by the pipeline stages
pub mod types {
    use serde::{Deserialize, Serialize};
    use sha2::{Digest, Sha256};

    use crate::error::RelgraphError;

    // =========================================================================
    // Input
    // =========================================================================

    /// One release or hotfix record as reported by a version source
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct VersionEntry {
        /// Semantic or calendar version, optionally hotfix-suffixed
        pub version: String,
        /// Unique identifier, used as the graph node key
        pub tag: String,
        /// Commit the tag points at
        #[serde(default)]
        pub commit: String,
        /// Tag or commit date, ISO-ish
        #[serde(default)]
        pub date: String,
        /// Tag subject line
        #[serde(default)]
        pub message: String,
    }

    impl VersionEntry {
        /// Create an entry with empty metadata
        #[must_use]
        pub fn new(version: impl Into<String>, tag: impl Into<String>) -> Self {
            Self {
                version: version.into(),
                tag: tag.into(),
                commit: String::new(),
                date: String::new(),
                message: String::new(),
            }
        }

        /// Create an entry whose version is its tag
        #[must_use]
        pub fn from_tag(tag: &str) -> Self {
            Self::new(tag, tag)
        }
    }

    /// Which field of a main-line entry a hotfix's base version is matched against
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum JoinKey {
        /// Match against the entry tag (unique by contract)
        #[default]
        Tag,
        /// Match against the entry version string
        Version,
    }

    impl JoinKey {
        /// Pick the join field out of a tag/version pair
        #[must_use]
        pub fn select<'a>(self, tag: &'a str, version: &'a str) -> &'a str {
            match self {
                Self::Tag => tag,
                Self::Version => version,
            }
        }

        /// Short lowercase name
        #[must_use]
        pub fn code(&self) -> &'static str {
            match self {
                Self::Tag => "tag",
                Self::Version => "version",
            }
        }
    }

    // =========================================================================
    // Enriched entries
    // =========================================================================

    /// A version entry with its hotfix relationship resolved
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EnrichedVersionEntry {
        /// The original record
        #[serde(flatten)]
        pub entry: VersionEntry,
        /// Whether the version parsed as a hotfix
        pub is_hotfix: bool,
        /// Base version the hotfix was cut from
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub base_tag: Option<String>,
        /// Hotfix ordinal within its base
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub hotfix_sequence: Option<u64>,
        /// Hotfix tags of a main-line entry, ordered by sequence
        #[serde(default)]
        pub children: Vec<String>,
    }

    // =========================================================================
    // Graph
    // =========================================================================

    /// A node of the release graph, one per version entry
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GraphNode {
        /// Node key (the entry tag)
        pub id: String,
        /// Version string
        pub version: String,
        /// Commit id
        pub commit: String,
        /// Date
        pub date: String,
        /// Message
        pub message: String,
        /// Whether this node is a hotfix
        pub is_hotfix: bool,
        /// Base version for hotfixes
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub base_tag: Option<String>,
        /// Hotfix ordinal
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub hotfix_sequence: Option<u64>,
        /// Ordered hotfix tags (main-line nodes only)
        #[serde(default)]
        pub children: Vec<String>,
    }

    impl From<EnrichedVersionEntry> for GraphNode {
        fn from(enriched: EnrichedVersionEntry) -> Self {
            let EnrichedVersionEntry {
                entry,
                is_hotfix,
                base_tag,
                hotfix_sequence,
                children,
            } = enriched;
            Self {
                id: entry.tag,
                version: entry.version,
                commit: entry.commit,
                date: entry.date,
                message: entry.message,
                is_hotfix,
                base_tag,
                hotfix_sequence,
                children,
            }
        }
    }

    /// Provenance of an edge
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum EdgeKind {
        /// Consecutive main-line releases
        MainLine,
        /// Base release to one of its hotfixes
        Hotfix,
        /// Consecutive hotfixes of the same base
        HotfixChain,
    }

    impl EdgeKind {
        /// Whether edges of this kind belong to a hotfix branch
        #[must_use]
        pub fn is_hotfix(self) -> bool {
            !matches!(self, Self::MainLine)
        }

        /// Short code used in ids and exports
        #[must_use]
        pub fn code(&self) -> &'static str {
            match self {
                Self::MainLine => "main",
                Self::Hotfix => "hotfix",
                Self::HotfixChain => "chain",
            }
        }
    }

    /// Directed edge between two node ids
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GraphEdge {
        /// Content-hash ID: edge:<hash of (from, to, kind)>
        pub id: String,
        /// Source node id
        pub from: String,
        /// Target node id
        pub to: String,
        /// True for base and chain edges
        pub is_hotfix: bool,
        /// Provenance
        pub kind: EdgeKind,
    }

    impl GraphEdge {
        /// Create an edge with its deterministic id
        #[must_use]
        pub fn new(from: &str, to: &str, kind: EdgeKind) -> Self {
            Self {
                id: Self::generate_id(from, to, kind),
                from: from.to_string(),
                to: to.to_string(),
                is_hotfix: kind.is_hotfix(),
                kind,
            }
        }

        /// Generate a deterministic ID for an edge
        #[must_use]
        pub fn generate_id(from: &str, to: &str, kind: EdgeKind) -> String {
            let mut hasher = Sha256::new();
            hasher.update(from.as_bytes());
            hasher.update([0u8]);
            hasher.update(to.as_bytes());
            hasher.update([0u8]);
            hasher.update(kind.code().as_bytes());
            let hash = hex::encode(hasher.finalize());
            format!("edge:{}", &hash[..8])
        }
    }

    // =========================================================================
    // Layout output
    // =========================================================================

    /// Position in 2D space
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
    pub struct Position {
        /// X coordinate (primary axis)
        pub x: f64,
        /// Y coordinate (branch axis)
        pub y: f64,
    }

    impl Position {
        /// Create a position
        #[must_use]
        pub fn new(x: f64, y: f64) -> Self {
            Self { x, y }
        }
    }

    /// A graph node with its assigned coordinates
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct PositionedNode {
        /// Node identity and metadata
        #[serde(flatten)]
        pub node: GraphNode,
        /// X coordinate
        pub x: f64,
        /// Y coordinate
        pub y: f64,
    }

    impl PositionedNode {
        /// The node position
        #[must_use]
        pub fn position(&self) -> Position {
            Position::new(self.x, self.y)
        }
    }

    /// Laid-out graph handed to renderers
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct PositionedGraph {
        /// Nodes in input order
        pub nodes: Vec<PositionedNode>,
        /// Edges in emission order
        pub edges: Vec<GraphEdge>,
        /// Bounding box width
        pub width: f64,
        /// Bounding box height
        pub height: f64,
    }

    impl PositionedGraph {
        /// Check if the graph has no nodes
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.nodes.is_empty()
        }

        /// Find a node by id
        #[must_use]
        pub fn node(&self, id: &str) -> Option<&PositionedNode> {
            self.nodes.iter().find(|n| n.node.id == id)
        }

        /// Export to JSON
        pub fn to_json(&self) -> Result<String, RelgraphError> {
            Ok(serde_json::to_string_pretty(self)?)
        }
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::RelgraphError;
    pub use crate::graph::VersionGraph;
    pub use crate::layout::{Layout, LayoutOptions};
    pub use crate::parser::{HotfixParser, ParsedVersion, DEFAULT_HOTFIX_SUFFIXES};
    pub use crate::pipeline::GraphBuilder;
    pub use crate::types::*;
}

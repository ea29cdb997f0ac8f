// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! End-to-end graph construction: parse, enrich, assemble, lay out

use crate::config::Settings;
use crate::error::Result;
use crate::graph::VersionGraph;
use crate::layout::{self, LayoutOptions};
use crate::parser::HotfixParser;
use crate::relations;
use crate::types::{EnrichedVersionEntry, JoinKey, PositionedGraph, VersionEntry};
use tracing::debug;

/// Runs the graph pipeline with one parser, join key and layout
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    parser: HotfixParser,
    join_key: JoinKey,
    options: LayoutOptions,
}

impl GraphBuilder {
    /// Create a builder with default join key and layout
    #[must_use]
    pub fn new(parser: HotfixParser) -> Self {
        Self {
            parser,
            join_key: JoinKey::default(),
            options: LayoutOptions::default(),
        }
    }

    /// Build from loaded settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let parser = HotfixParser::new(&settings.hotfix_suffixes)?;
        Self::new(parser)
            .join_key(settings.join_key)
            .layout(settings.layout)
    }

    /// Set the join key used to resolve hotfix bases
    #[must_use]
    pub fn join_key(mut self, join_key: JoinKey) -> Self {
        self.join_key = join_key;
        self
    }

    /// Set layout options, rejecting spacings that would overlap nodes
    pub fn layout(mut self, options: LayoutOptions) -> Result<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    /// The layout options in use
    #[must_use]
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Parse and attach relationships
    #[must_use]
    pub fn enrich(&self, entries: &[VersionEntry]) -> Vec<EnrichedVersionEntry> {
        relations::enrich(entries, &self.parser, self.join_key)
    }

    /// Build the unpositioned graph
    #[must_use]
    pub fn assemble(&self, entries: &[VersionEntry]) -> VersionGraph {
        VersionGraph::assemble(self.enrich(entries), self.join_key)
    }

    /// Build and lay out the graph
    #[must_use]
    pub fn build(&self, entries: &[VersionEntry]) -> PositionedGraph {
        let graph = self.assemble(entries);
        let placed = layout::layout(&graph, &self.options);

        debug!(
            "Built release graph by {}: {} nodes, {} edges, {} orphans, {}x{}",
            graph.join_key().code(),
            graph.node_count(),
            graph.edge_count(),
            graph.orphans().len(),
            placed.width,
            placed.height
        );

        layout::position(&graph, &placed)
    }
}

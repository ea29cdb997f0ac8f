// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Two-dimensional placement of the release graph
//!
//! The main line runs along x in input order, so index 0 is the first
//! entry the caller supplied. Hotfixes hang below their base along y,
//! ordered by sequence. Orphaned hotfixes get their own column one step
//! past the end of the main line.

use crate::error::{RelgraphError, Result};
use crate::graph::VersionGraph;
use crate::types::{Position, PositionedGraph, PositionedNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Horizontal room reserved for a node label
pub const LABEL_WIDTH: f64 = 96.0;
/// Vertical room reserved for a node label
pub const LABEL_HEIGHT: f64 = 32.0;

/// Spacing and sizing for the layout engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Distance between consecutive main-line releases along x
    pub primary_axis_spacing: f64,
    /// Distance between sibling hotfixes along y
    pub branch_axis_spacing: f64,
    /// Node radius, used for padding
    pub node_radius: f64,
    /// Offset of the first node from the origin
    pub margin: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            primary_axis_spacing: 120.0,
            branch_axis_spacing: 60.0,
            node_radius: 8.0,
            margin: 40.0,
        }
    }
}

impl LayoutOptions {
    /// Reject options that would make nodes collide or coordinates meaningless
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("primary_axis_spacing", self.primary_axis_spacing),
            ("branch_axis_spacing", self.branch_axis_spacing),
            ("node_radius", self.node_radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(RelgraphError::InvalidSettings {
                    message: format!("layout.{name} must be a positive number, got {value}"),
                });
            }
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(RelgraphError::InvalidSettings {
                message: format!("layout.margin must be zero or positive, got {}", self.margin),
            });
        }
        Ok(())
    }
}

/// Node positions, index-aligned with [`VersionGraph::nodes`], plus bounds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    /// One position per node
    pub positions: Vec<Position>,
    /// Bounding box width including padding
    pub width: f64,
    /// Bounding box height including padding
    pub height: f64,
}

/// Assign coordinates to every node of `graph`
///
/// `options` should pass [`LayoutOptions::validate`]; with zero or negative
/// spacing nodes overlap. [`crate::pipeline::GraphBuilder`] enforces this.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn layout(graph: &VersionGraph, options: &LayoutOptions) -> Layout {
    let nodes = graph.nodes();
    if nodes.is_empty() {
        return Layout::default();
    }

    let margin = options.margin;
    let mut assigned: Vec<Option<Position>> = vec![None; nodes.len()];

    let mut main_count = 0usize;
    for (position, node) in nodes.iter().enumerate() {
        if !node.is_hotfix {
            let x = margin + main_count as f64 * options.primary_axis_spacing;
            assigned[position] = Some(Position::new(x, margin));
            main_count += 1;
        }
    }

    let mut groups: BTreeMap<usize, Vec<(u64, usize)>> = BTreeMap::new();
    for (position, node) in nodes.iter().enumerate() {
        if let Some(base) = graph.resolve_base(position) {
            groups
                .entry(base)
                .or_default()
                .push((node.hotfix_sequence.unwrap_or(0), position));
        }
    }

    for (base, mut members) in groups {
        let Some(anchor) = assigned[base] else {
            continue;
        };
        members.sort_by_key(|(sequence, _)| *sequence);
        for (offset, (_, position)) in members.into_iter().enumerate() {
            let y = anchor.y + (offset + 1) as f64 * options.branch_axis_spacing;
            assigned[position] = Some(Position::new(anchor.x, y));
        }
    }

    let orphan_x = margin + main_count as f64 * options.primary_axis_spacing;
    let mut orphan_count = 0usize;
    for slot in assigned.iter_mut().filter(|slot| slot.is_none()) {
        orphan_count += 1;
        let y = margin + orphan_count as f64 * options.branch_axis_spacing;
        *slot = Some(Position::new(orphan_x, y));
    }
    if orphan_count > 0 {
        tracing::debug!("Placed {} orphaned hotfix(es) at x={}", orphan_count, orphan_x);
    }

    let positions: Vec<Position> = assigned.into_iter().map(Option::unwrap_or_default).collect();
    let max_x = positions.iter().map(|p| p.x).fold(0.0, f64::max);
    let max_y = positions.iter().map(|p| p.y).fold(0.0, f64::max);

    Layout {
        positions,
        width: max_x + margin + options.node_radius + LABEL_WIDTH,
        height: max_y + margin + options.node_radius + LABEL_HEIGHT,
    }
}

/// Combine graph identity with a layout into the renderer-facing output
#[must_use]
pub fn position(graph: &VersionGraph, layout: &Layout) -> PositionedGraph {
    let nodes = graph
        .nodes()
        .iter()
        .zip(&layout.positions)
        .map(|(node, pos)| PositionedNode {
            node: node.clone(),
            x: pos.x,
            y: pos.y,
        })
        .collect();

    PositionedGraph {
        nodes,
        edges: graph.edges().to_vec(),
        width: layout.width,
        height: layout.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::HotfixParser;
    use crate::relations::enrich;
    use crate::types::{JoinKey, VersionEntry};

    fn graph(tags: &[&str]) -> VersionGraph {
        let entries: Vec<VersionEntry> = tags.iter().map(|t| VersionEntry::from_tag(t)).collect();
        VersionGraph::assemble(enrich(&entries, &HotfixParser::default(), JoinKey::Tag), JoinKey::Tag)
    }

    fn at(layout: &Layout, graph: &VersionGraph, id: &str) -> Position {
        let index = graph.nodes().iter().position(|n| n.id == id).unwrap();
        layout.positions[index]
    }

    #[test]
    fn test_main_line_spacing() {
        let g = graph(&["v1.0.0", "v1.0.0-hotfix.1", "v1.0.0-hotfix.2", "v2.0.0"]);
        let options = LayoutOptions::default();
        let l = layout(&g, &options);

        let v1 = at(&l, &g, "v1.0.0");
        let v2 = at(&l, &g, "v2.0.0");
        assert_eq!(v2.x - v1.x, options.primary_axis_spacing);
        assert_eq!(v1.y, v2.y);
    }

    #[test]
    fn test_hotfixes_hang_below_base() {
        let g = graph(&["v1.0.0", "v1.0.0-hotfix.2", "v1.0.0-hotfix.1", "v2.0.0"]);
        let options = LayoutOptions::default();
        let l = layout(&g, &options);

        let base = at(&l, &g, "v1.0.0");
        let first = at(&l, &g, "v1.0.0-hotfix.1");
        let second = at(&l, &g, "v1.0.0-hotfix.2");

        assert_eq!(first.x, base.x);
        assert_eq!(second.x, base.x);
        assert_eq!(first.y, base.y + options.branch_axis_spacing);
        assert_eq!(second.y, base.y + 2.0 * options.branch_axis_spacing);
    }

    #[test]
    fn test_orphans_get_distinct_positions() {
        let g = graph(&["v2.0.0", "v1.0.0-hotfix.1", "v0.9.0-fix.1", "v2.0.0-fix.1"]);
        let l = layout(&g, &LayoutOptions::default());

        for (i, a) in l.positions.iter().enumerate() {
            assert_ne!(*a, Position::new(0.0, 0.0));
            for b in &l.positions[i + 1..] {
                assert_ne!(a, b);
            }
        }

        let main = at(&l, &g, "v2.0.0");
        let orphan = at(&l, &g, "v1.0.0-hotfix.1");
        assert!(orphan.x > main.x);
    }

    #[test]
    fn test_zero_margin_orphan_avoids_origin() {
        let g = graph(&["v1-fix.1"]);
        let options = LayoutOptions {
            margin: 0.0,
            ..LayoutOptions::default()
        };
        let l = layout(&g, &options);
        assert_ne!(l.positions[0], Position::new(0.0, 0.0));
    }

    #[test]
    fn test_bounds_include_padding() {
        let g = graph(&["v1", "v1-fix.1", "v2"]);
        let options = LayoutOptions::default();
        let l = layout(&g, &options);

        let max_x = l.positions.iter().map(|p| p.x).fold(0.0, f64::max);
        let max_y = l.positions.iter().map(|p| p.y).fold(0.0, f64::max);
        assert!(l.width > max_x + options.node_radius);
        assert!(l.height > max_y + options.node_radius);
    }

    #[test]
    fn test_empty_layout() {
        let g = graph(&[]);
        let l = layout(&g, &LayoutOptions::default());
        assert!(l.positions.is_empty());
        assert_eq!((l.width, l.height), (0.0, 0.0));

        let positioned = position(&g, &l);
        assert!(positioned.nodes.is_empty());
        assert!(positioned.edges.is_empty());
    }

    #[test]
    fn test_validate() {
        assert!(LayoutOptions::default().validate().is_ok());

        let bad = LayoutOptions {
            branch_axis_spacing: 0.0,
            ..LayoutOptions::default()
        };
        assert!(bad.validate().is_err());

        let bad = LayoutOptions {
            primary_axis_spacing: f64::NAN,
            ..LayoutOptions::default()
        };
        assert!(bad.validate().is_err());

        let bad = LayoutOptions {
            margin: -1.0,
            ..LayoutOptions::default()
        };
        assert!(bad.validate().is_err());
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! SVG rendering of a positioned release graph

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use crate::types::{EdgeKind, Position, PositionedGraph, PositionedNode};

const LEGEND_HEIGHT: f64 = 28.0;
const LEGEND_MIN_WIDTH: f64 = 300.0;

/// Colors and sizes used by [`to_svg`]
#[derive(Debug, Clone)]
pub struct SvgStyle {
    /// Fill of main-line releases
    pub main_color: String,
    /// Fill of hotfixes attached to a base
    pub hotfix_color: String,
    /// Fill of hotfixes with no known base
    pub orphan_color: String,
    /// Stroke of edges
    pub edge_color: String,
    /// Circle radius
    pub node_radius: f64,
    /// Label font size
    pub font_size: f64,
    /// Draw the legend row under the graph
    pub legend: bool,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            main_color: "#4c8bf5".into(),
            hotfix_color: "#f5a623".into(),
            orphan_color: "#d0021b".into(),
            edge_color: "#8a8f98".into(),
            node_radius: 8.0,
            font_size: 11.0,
            legend: true,
        }
    }
}

#[derive(Clone, Copy)]
enum NodeClass {
    Main,
    Hotfix,
    Orphan,
}

impl NodeClass {
    fn name(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Hotfix => "hotfix",
            Self::Orphan => "orphan",
        }
    }

    fn color(self, style: &SvgStyle) -> &str {
        match self {
            Self::Main => &style.main_color,
            Self::Hotfix => &style.hotfix_color,
            Self::Orphan => &style.orphan_color,
        }
    }
}

/// Render the graph as a standalone SVG document
///
/// Every node carries a `<title>` tooltip with its tag, commit, date and
/// message. Output is deterministic for a given graph and style.
#[must_use]
pub fn to_svg(graph: &PositionedGraph, style: &SvgStyle) -> String {
    let show_legend = style.legend && !graph.is_empty();
    let width = if show_legend {
        graph.width.max(LEGEND_MIN_WIDTH)
    } else {
        graph.width
    };
    let height = if show_legend {
        graph.height + LEGEND_HEIGHT
    } else {
        graph.height
    };

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif" font-size="{}">"#,
        style.font_size
    );

    let mut positions: HashMap<&str, Position> = HashMap::new();
    for node in &graph.nodes {
        positions.entry(node.node.id.as_str()).or_insert_with(|| node.position());
    }

    svg.push_str("  <g class=\"edges\">\n");
    for edge in &graph.edges {
        let (Some(from), Some(to)) = (positions.get(edge.from.as_str()), positions.get(edge.to.as_str()))
        else {
            continue;
        };
        let dash = match edge.kind {
            EdgeKind::MainLine => "",
            EdgeKind::Hotfix => r#" stroke-dasharray="4 3""#,
            EdgeKind::HotfixChain => r#" stroke-dasharray="1 3""#,
        };
        let _ = writeln!(
            svg,
            r#"    <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1.5"{dash}/>"#,
            from.x, from.y, to.x, to.y, style.edge_color
        );
    }
    svg.push_str("  </g>\n");

    let attached: HashSet<&str> = graph
        .edges
        .iter()
        .filter(|e| e.kind == EdgeKind::Hotfix)
        .map(|e| e.to.as_str())
        .collect();

    svg.push_str("  <g class=\"nodes\">\n");
    for node in &graph.nodes {
        let class = classify(node, &attached);
        write_node(&mut svg, node, class, style);
    }
    svg.push_str("  </g>\n");

    if show_legend {
        write_legend(&mut svg, graph.height, style);
    }

    svg.push_str("</svg>\n");
    svg
}

fn classify(node: &PositionedNode, attached: &HashSet<&str>) -> NodeClass {
    if !node.node.is_hotfix {
        NodeClass::Main
    } else if attached.contains(node.node.id.as_str()) {
        NodeClass::Hotfix
    } else {
        NodeClass::Orphan
    }
}

fn write_node(svg: &mut String, node: &PositionedNode, class: NodeClass, style: &SvgStyle) {
    let n = &node.node;
    let mut tooltip = n.id.clone();
    for detail in [&n.commit, &n.date, &n.message] {
        if !detail.is_empty() {
            tooltip.push('\n');
            tooltip.push_str(detail);
        }
    }

    let _ = writeln!(
        svg,
        r#"    <g class="node {}" data-id="{}">"#,
        class.name(),
        xml_escape(&n.id)
    );
    let _ = writeln!(svg, "      <title>{}</title>", xml_escape(&tooltip));
    let _ = writeln!(
        svg,
        r#"      <circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
        node.x,
        node.y,
        style.node_radius,
        class.color(style)
    );
    let _ = writeln!(
        svg,
        r#"      <text x="{}" y="{}">{}</text>"#,
        node.x + style.node_radius + 4.0,
        node.y + style.font_size / 3.0,
        xml_escape(&n.version)
    );
    svg.push_str("    </g>\n");
}

fn write_legend(svg: &mut String, top: f64, style: &SvgStyle) {
    let y = top + LEGEND_HEIGHT / 2.0;
    svg.push_str("  <g class=\"legend\">\n");
    for (x, class, label) in [
        (16.0, NodeClass::Main, "Release"),
        (112.0, NodeClass::Hotfix, "Hotfix"),
        (208.0, NodeClass::Orphan, "Orphaned hotfix"),
    ] {
        let _ = writeln!(
            svg,
            r#"    <circle cx="{x}" cy="{y}" r="5" fill="{}"/>"#,
            class.color(style)
        );
        let _ = writeln!(
            svg,
            r#"    <text x="{}" y="{}">{label}</text>"#,
            x + 10.0,
            y + style.font_size / 3.0
        );
    }
    svg.push_str("  </g>\n");
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

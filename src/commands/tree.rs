// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Tree command - releases with their hotfixes, as indented text

use crate::commands::EntrySource;
use crate::config::Settings;
use crate::graph::VersionGraph;
use crate::pipeline::GraphBuilder;
use crate::types::GraphNode;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

fn short_commit(commit: &str) -> &str {
    commit.get(..7).unwrap_or(commit)
}

fn node_line(node: &GraphNode, color: bool) -> String {
    let mut line = if color {
        node.id.bold().to_string()
    } else {
        node.id.clone()
    };
    let details: Vec<&str> = [short_commit(&node.commit), node.date.as_str()]
        .into_iter()
        .filter(|d| !d.is_empty())
        .collect();
    if !details.is_empty() {
        let details = details.join("  ");
        line.push_str("  ");
        if color {
            line.push_str(&details.dimmed().to_string());
        } else {
            line.push_str(&details);
        }
    }
    line
}

/// Render main-line releases with their hotfixes nested underneath
#[must_use]
pub fn render_tree(graph: &VersionGraph, color: bool) -> String {
    let mut out = String::new();

    for release in graph.main_line() {
        out.push_str(&node_line(release, color));
        out.push('\n');

        let mut hotfixes = graph.hotfixes_of(&release.id);
        hotfixes.sort_by_key(|h| h.hotfix_sequence.unwrap_or(0));
        let last = hotfixes.len().saturating_sub(1);
        for (i, hotfix) in hotfixes.iter().enumerate() {
            let branch = if i == last { "└── " } else { "├── " };
            let line = node_line(hotfix, false);
            out.push_str(branch);
            if color {
                out.push_str(&line.yellow().to_string());
            } else {
                out.push_str(&line);
            }
            out.push('\n');
        }
    }

    let orphans = graph.orphans();
    if !orphans.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("Orphaned hotfixes:\n");
        for orphan in orphans {
            let base = orphan.base_tag.as_deref().unwrap_or("?");
            let line = format!("  {} (base {} not found)", orphan.id, base);
            if color {
                out.push_str(&line.red().to_string());
            } else {
                out.push_str(&line);
            }
            out.push('\n');
        }
    }

    out
}

/// Run the tree command
pub fn run(source: &EntrySource, settings: &Settings, json: bool, color: bool) -> Result<()> {
    let builder = GraphBuilder::from_settings(settings).context("Invalid settings")?;
    let entries = source.load()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&builder.enrich(&entries))?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No version entries found.");
        return Ok(());
    }

    print!("{}", render_tree(&builder.assemble(&entries), color));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VersionEntry;

    fn graph(tags: &[&str]) -> VersionGraph {
        let entries: Vec<VersionEntry> = tags.iter().map(|t| VersionEntry::from_tag(t)).collect();
        GraphBuilder::default().assemble(&entries)
    }

    #[test]
    fn test_tree_nests_hotfixes() {
        let text = render_tree(&graph(&["v1", "v1-fix.2", "v1-fix.1", "v2"]), false);
        assert_eq!(text, "v1\n├── v1-fix.1\n└── v1-fix.2\nv2\n");
    }

    #[test]
    fn test_tree_lists_orphans() {
        let text = render_tree(&graph(&["v2", "v1-hotfix.3"]), false);
        assert_eq!(
            text,
            "v2\n\nOrphaned hotfixes:\n  v1-hotfix.3 (base v1 not found)\n"
        );
    }

    #[test]
    fn test_node_line_details() {
        let mut entry = VersionEntry::from_tag("v1");
        entry.commit = "0123456789abcdef".into();
        entry.date = "2024-01-01".into();
        let g = GraphBuilder::default().assemble(&[entry]);
        assert_eq!(render_tree(&g, false), "v1  0123456  2024-01-01\n");
    }
}

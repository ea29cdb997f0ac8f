// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Graph command - builds the release graph and exports it

use crate::commands::EntrySource;
use crate::config::Settings;
use crate::error::RelgraphError;
use crate::pipeline::GraphBuilder;
use crate::render::{self, SvgStyle};
use crate::types::VersionEntry;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Standalone SVG drawing
    Svg,
    /// Graphviz DOT format
    Dot,
    /// Positioned graph as JSON
    Json,
}

impl FromStr for ExportFormat {
    type Err = RelgraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "dot" | "graphviz" => Ok(Self::Dot),
            "json" => Ok(Self::Json),
            _ => Err(RelgraphError::UnknownFormat(s.to_string())),
        }
    }
}

impl ExportFormat {
    /// Get file extension for format
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Dot => "dot",
            Self::Json => "json",
        }
    }
}

/// Arguments for the graph command
pub struct GraphArgs {
    /// Where the entries come from
    pub source: EntrySource,
    /// Output format name
    pub format: String,
    /// Output file (stdout if not specified)
    pub output: Option<PathBuf>,
}

/// Render entries in the requested format
pub fn export(builder: &GraphBuilder, entries: &[VersionEntry], format: ExportFormat) -> Result<String> {
    let content = match format {
        ExportFormat::Dot => builder.assemble(entries).to_dot(),
        ExportFormat::Json => builder.build(entries).to_json()?,
        ExportFormat::Svg => {
            let style = SvgStyle {
                node_radius: builder.options().node_radius,
                ..SvgStyle::default()
            };
            render::to_svg(&builder.build(entries), &style)
        }
    };
    Ok(content)
}

/// Run the graph command
pub fn run(args: GraphArgs, settings: &Settings) -> Result<()> {
    let format: ExportFormat = args.format.parse()?;
    info!("Building release graph as {}", format.extension());

    let builder = GraphBuilder::from_settings(settings).context("Invalid settings")?;
    let entries = args.source.load()?;

    if entries.is_empty() {
        warn!("No version entries found");
    }

    let content = export(&builder, &entries, format)?;

    match args.output {
        Some(path) => {
            fs::write(&path, &content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("SVG".parse::<ExportFormat>().unwrap(), ExportFormat::Svg);
        assert_eq!("graphviz".parse::<ExportFormat>().unwrap(), ExportFormat::Dot);
        assert!(matches!(
            "png".parse::<ExportFormat>(),
            Err(RelgraphError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_export_formats() {
        let entries: Vec<VersionEntry> =
            ["v1", "v1-fix.1", "v2"].iter().map(|t| VersionEntry::from_tag(t)).collect();
        let builder = GraphBuilder::default();

        let dot = export(&builder, &entries, ExportFormat::Dot).unwrap();
        assert!(dot.starts_with("digraph releases"));

        let json = export(&builder, &entries, ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
        assert!(value["width"].as_f64().unwrap() > 0.0);

        let svg = export(&builder, &entries, ExportFormat::Svg).unwrap();
        assert!(svg.starts_with("<svg"));
    }
}

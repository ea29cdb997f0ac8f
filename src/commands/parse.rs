// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Parse command - shows how version strings are classified

use crate::config::Settings;
use crate::parser::{HotfixParser, ParsedVersion};
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Serialize)]
struct ParseReport<'a> {
    version: &'a str,
    #[serde(flatten)]
    parsed: ParsedVersion,
}

/// Describe one parse result on a single line
#[must_use]
pub fn describe(version: &str, parsed: &ParsedVersion) -> String {
    match parsed {
        ParsedVersion::Release => format!("{version}: release"),
        ParsedVersion::Hotfix {
            base_version,
            suffix,
            sequence,
        } => format!("{version}: {suffix} #{sequence} of {base_version}"),
    }
}

/// Run the parse command
pub fn run(versions: &[String], settings: &Settings, json: bool) -> Result<()> {
    let parser = HotfixParser::new(&settings.hotfix_suffixes)
        .context("Failed to build hotfix parser")?;

    if json {
        let reports: Vec<ParseReport> = versions
            .iter()
            .map(|v| ParseReport {
                version: v,
                parsed: parser.parse(v),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for version in versions {
            println!("{}", describe(version, &parser.parse(version)));
        }
    }

    Ok(())
}

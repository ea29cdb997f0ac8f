// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Tags command - prints a repository's tags as version entries

use crate::source::GitTags;
use anyhow::{Context, Result};
use std::path::Path;

/// Run the tags command
pub fn run(repo: &Path) -> Result<()> {
    let entries = GitTags::new(repo)
        .read()
        .with_context(|| format!("Failed to read tags from {}", repo.display()))?;

    if entries.is_empty() {
        tracing::warn!("No tags found in {}", repo.display());
    }

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

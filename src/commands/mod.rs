// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod config;
pub mod graph;
pub mod parse;
pub mod tags;
pub mod tree;

use crate::source::{self, GitTags};
use crate::types::VersionEntry;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Where a command reads its version entries from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySource {
    /// A JSON document; `-` means stdin
    Json(PathBuf),
    /// Tags of a git repository
    Git(PathBuf),
}

impl EntrySource {
    /// Pick a source from the `--input` / `--git` flags, defaulting to the
    /// git repository in the working directory
    #[must_use]
    pub fn from_flags(input: Option<PathBuf>, git: Option<PathBuf>) -> Self {
        match (input, git) {
            (Some(path), _) => Self::Json(path),
            (None, Some(repo)) => Self::Git(repo),
            (None, None) => Self::Git(PathBuf::from(".")),
        }
    }

    /// Read the entries
    pub fn load(&self) -> Result<Vec<VersionEntry>> {
        match self {
            Self::Json(path) if path == Path::new("-") => {
                source::read_entries(std::io::stdin().lock()).context("Failed to read entries from stdin")
            }
            Self::Json(path) => source::load_entries(path)
                .with_context(|| format!("Failed to load entries from {}", path.display())),
            Self::Git(repo) => GitTags::new(repo)
                .read()
                .with_context(|| format!("Failed to read tags from {}", repo.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_wins_over_git() {
        let source = EntrySource::from_flags(Some("a.json".into()), Some("repo".into()));
        assert_eq!(source, EntrySource::Json("a.json".into()));
    }

    #[test]
    fn test_defaults_to_current_repo() {
        assert_eq!(EntrySource::from_flags(None, None), EntrySource::Git(".".into()));
    }
}

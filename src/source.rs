// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Version entry sources: JSON documents and git tags

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::error::{RelgraphError, Result};
use crate::types::VersionEntry;

/// Field separator in the `git for-each-ref` format (ASCII unit separator)
const FIELD_SEPARATOR: char = '\u{1f}';

const TAG_FORMAT: &str = "%(refname:short)%1f%(objectname)%1f%(*objectname)%1f%(creatordate:iso-strict)%1f%(contents:subject)";

/// Accepted shapes of a version entry document
#[derive(Deserialize)]
#[serde(untagged)]
enum EntryDocument {
    List(Vec<VersionEntry>),
    Wrapped { versions: Vec<VersionEntry> },
}

/// Decode entries from a JSON array or a `{"versions": [...]}` object
pub fn parse_entries(json: &str) -> Result<Vec<VersionEntry>> {
    let document: EntryDocument = serde_json::from_str(json).map_err(RelgraphError::InputDecode)?;
    Ok(match document {
        EntryDocument::List(entries) | EntryDocument::Wrapped { versions: entries } => entries,
    })
}

/// Read and decode entries from any reader
pub fn read_entries<R: Read>(mut reader: R) -> Result<Vec<VersionEntry>> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|source| RelgraphError::InputRead {
            path: PathBuf::from("<stdin>"),
            source,
        })?;
    parse_entries(&content)
}

/// Load entries from a JSON file
pub fn load_entries(path: &Path) -> Result<Vec<VersionEntry>> {
    let content = fs::read_to_string(path).map_err(|source| RelgraphError::InputRead {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_entries(&content)?;
    debug!("Loaded {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Reads release tags from a git repository
#[derive(Debug, Clone)]
pub struct GitTags {
    repo: PathBuf,
    git: PathBuf,
}

impl GitTags {
    /// Read tags from the repository at `repo` using `git` from PATH
    #[must_use]
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            git: PathBuf::from("git"),
        }
    }

    /// Use a specific git binary
    #[must_use]
    pub fn with_git(mut self, git: impl Into<PathBuf>) -> Self {
        self.git = git.into();
        self
    }

    /// List tags oldest first, one entry per tag
    ///
    /// The version of each entry is its tag name.
    pub fn read(&self) -> Result<Vec<VersionEntry>> {
        info!("Reading tags from {}", self.repo.display());

        let output = Command::new(&self.git)
            .arg("-C")
            .arg(&self.repo)
            .args(["for-each-ref", "--sort=creatordate"])
            .arg(format!("--format={TAG_FORMAT}"))
            .arg("refs/tags")
            .output()
            .map_err(|source| RelgraphError::GitSpawn {
                repo: self.repo.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RelgraphError::Git {
                repo: self.repo.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let entries: Vec<VersionEntry> = stdout.lines().filter_map(parse_tag_line).collect();
        debug!("Read {} tags", entries.len());
        Ok(entries)
    }
}

fn parse_tag_line(line: &str) -> Option<VersionEntry> {
    let mut fields = line.split(FIELD_SEPARATOR);
    let tag = fields.next().filter(|t| !t.is_empty())?;
    let object = fields.next().unwrap_or_default();
    let peeled = fields.next().unwrap_or_default();
    let date = fields.next().unwrap_or_default();
    let message = fields.collect::<Vec<_>>().join("\u{1f}");

    let commit = if peeled.is_empty() { object } else { peeled };

    Some(VersionEntry {
        version: tag.to_string(),
        tag: tag.to_string(),
        commit: commit.to_string(),
        date: normalize_date(date),
        message,
    })
}

/// Convert an ISO 8601 date to RFC 3339 UTC, keeping unparseable input as-is
fn normalize_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.with_timezone(&Utc).to_rfc3339(),
        Err(_) => raw.to_string(),
    }
}

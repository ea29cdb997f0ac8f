// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for the fallible edges of the crate
//!
//! The graph pipeline itself never fails. Errors come from reading input,
//! talking to git, loading settings and building the hotfix pattern.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while acquiring input or preparing the pipeline
#[derive(Debug, Error)]
pub enum RelgraphError {
    /// Input file could not be read
    #[error("Failed to read version entries from {path}")]
    InputRead {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Input was not a valid version entry document
    #[error("Failed to decode version entries: {0}")]
    InputDecode(#[source] serde_json::Error),

    /// Output could not be encoded
    #[error("Failed to encode graph: {0}")]
    Encode(#[from] serde_json::Error),

    /// The git binary could not be started
    #[error("Failed to run git in {repo}")]
    GitSpawn {
        /// Repository directory
        repo: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// git exited unsuccessfully
    #[error("git exited with {status} in {repo}: {stderr}")]
    Git {
        /// Repository directory
        repo: PathBuf,
        /// Exit status description
        status: String,
        /// Captured stderr, trimmed
        stderr: String,
    },

    /// Settings could not be loaded
    #[error("Failed to load settings: {0}")]
    Config(#[from] config::ConfigError),

    /// Settings were loaded but are unusable
    #[error("Invalid settings: {message}")]
    InvalidSettings {
        /// What is wrong
        message: String,
    },

    /// The hotfix suffix pattern could not be compiled
    #[error("Invalid hotfix suffix pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Unknown export format requested
    #[error("Unknown export format: {0}. Supported: svg, dot, json")]
    UnknownFormat(String),
}

/// Result alias for library operations
pub type Result<T> = std::result::Result<T, RelgraphError>;

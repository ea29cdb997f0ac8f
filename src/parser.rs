// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Hotfix recognition for version strings
//!
//! A version is a hotfix when it ends in `-<suffix>.<digits>` for one of
//! the configured suffixes, e.g. `v1.0.0-hotfix.2`. Everything before the
//! last such marker is the base version.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Suffixes recognized when the caller does not configure any
pub const DEFAULT_HOTFIX_SUFFIXES: [&str; 3] = ["hotfix", "patch", "fix"];

/// Outcome of parsing one version string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ParsedVersionRecord", from = "ParsedVersionRecord")]
pub enum ParsedVersion {
    /// Not a hotfix
    Release,
    /// A hotfix of `base_version`
    Hotfix {
        /// Everything before the hotfix marker
        base_version: String,
        /// Which suffix matched
        suffix: String,
        /// Hotfix ordinal
        sequence: u64,
    },
}

impl ParsedVersion {
    /// Whether the version parsed as a hotfix
    #[must_use]
    pub fn is_hotfix(&self) -> bool {
        matches!(self, Self::Hotfix { .. })
    }

    /// Base version, for hotfixes
    #[must_use]
    pub fn base_version(&self) -> Option<&str> {
        match self {
            Self::Hotfix { base_version, .. } => Some(base_version),
            Self::Release => None,
        }
    }

    /// Matched suffix, for hotfixes
    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        match self {
            Self::Hotfix { suffix, .. } => Some(suffix),
            Self::Release => None,
        }
    }

    /// Hotfix ordinal, for hotfixes
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        match self {
            Self::Hotfix { sequence, .. } => Some(*sequence),
            Self::Release => None,
        }
    }
}

/// Flat wire shape of [`ParsedVersion`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedVersionRecord {
    /// Whether the version parsed as a hotfix
    pub is_hotfix: bool,
    /// Base version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_version: Option<String>,
    /// Matched suffix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Hotfix ordinal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
}

impl From<ParsedVersion> for ParsedVersionRecord {
    fn from(parsed: ParsedVersion) -> Self {
        match parsed {
            ParsedVersion::Release => Self {
                is_hotfix: false,
                base_version: None,
                suffix: None,
                sequence: None,
            },
            ParsedVersion::Hotfix {
                base_version,
                suffix,
                sequence,
            } => Self {
                is_hotfix: true,
                base_version: Some(base_version),
                suffix: Some(suffix),
                sequence: Some(sequence),
            },
        }
    }
}

impl From<ParsedVersionRecord> for ParsedVersion {
    fn from(record: ParsedVersionRecord) -> Self {
        match (record.is_hotfix, record.base_version, record.suffix) {
            (true, Some(base_version), Some(suffix)) => Self::Hotfix {
                base_version,
                suffix,
                sequence: record.sequence.unwrap_or(0),
            },
            _ => Self::Release,
        }
    }
}

/// Matches version strings against a configured suffix set
#[derive(Debug, Clone)]
pub struct HotfixParser {
    suffixes: Vec<String>,
    pattern: Option<Regex>,
}

impl Default for HotfixParser {
    fn default() -> Self {
        Self::new(&DEFAULT_HOTFIX_SUFFIXES).unwrap_or_else(|_| Self {
            suffixes: Vec::new(),
            pattern: None,
        })
    }
}

impl HotfixParser {
    /// Build a parser for the given suffixes
    ///
    /// Empty and repeated suffixes are dropped. Suffixes are matched
    /// literally. With no usable suffix nothing is ever a hotfix.
    pub fn new<S: AsRef<str>>(suffixes: &[S]) -> Result<Self> {
        let mut kept: Vec<String> = Vec::new();
        for suffix in suffixes {
            let suffix = suffix.as_ref();
            if !suffix.is_empty() && !kept.iter().any(|k| k == suffix) {
                kept.push(suffix.to_string());
            }
        }

        let pattern = if kept.is_empty() {
            None
        } else {
            let alternation = kept
                .iter()
                .map(|s| regex::escape(s))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"^(.+)-({alternation})\.([0-9]+)$"))?)
        };

        Ok(Self {
            suffixes: kept,
            pattern,
        })
    }

    /// The suffixes this parser recognizes
    #[must_use]
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Parse a version string
    ///
    /// Never fails: anything that is not a hotfix is a release. A sequence
    /// too large for `u64` is not treated as a hotfix.
    #[must_use]
    pub fn parse(&self, version: &str) -> ParsedVersion {
        let Some(pattern) = &self.pattern else {
            return ParsedVersion::Release;
        };
        let Some(caps) = pattern.captures(version) else {
            return ParsedVersion::Release;
        };
        let Ok(sequence) = caps[3].parse::<u64>() else {
            return ParsedVersion::Release;
        };

        ParsedVersion::Hotfix {
            base_version: caps[1].to_string(),
            suffix: caps[2].to_string(),
            sequence,
        }
    }

}

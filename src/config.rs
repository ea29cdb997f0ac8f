// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `RELGRAPH_*` environment variables. Nested keys use `__`, e.g.
//! `RELGRAPH_LAYOUT__NODE_RADIUS=10`; `RELGRAPH_HOTFIX_SUFFIXES` takes a
//! comma-separated list.

use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{RelgraphError, Result};
use crate::layout::LayoutOptions;
use crate::parser::DEFAULT_HOTFIX_SUFFIXES;
use crate::types::JoinKey;

/// File name looked up in the working directory
pub const CONFIG_FILENAME: &str = "relgraph.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "RELGRAPH";

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Suffixes that mark a version as a hotfix
    pub hotfix_suffixes: Vec<String>,
    /// Field hotfix bases are matched against
    pub join_key: JoinKey,
    /// Log level when no -v/-q flag is given (trace, debug, info, warn, error)
    pub log_level: String,
    /// Layout spacing
    pub layout: LayoutOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hotfix_suffixes: DEFAULT_HOTFIX_SUFFIXES.iter().map(|s| (*s).to_string()).collect(),
            join_key: JoinKey::default(),
            log_level: "info".to_string(),
            layout: LayoutOptions::default(),
        }
    }
}

impl Settings {
    /// Check that the settings can drive the pipeline
    pub fn validate(&self) -> Result<()> {
        if self.hotfix_suffixes.iter().all(String::is_empty) {
            return Err(RelgraphError::InvalidSettings {
                message: "hotfix_suffixes must contain at least one non-empty suffix".into(),
            });
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(RelgraphError::InvalidSettings {
                message: format!(
                    "log_level must be one of trace, debug, info, warn, error; got {}",
                    self.log_level
                ),
            });
        }
        self.layout.validate()
    }

    /// Render as TOML
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Per-user configuration file location
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "hyperpolymath", "relgraph")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Find the settings file to read
///
/// An explicit path always wins. Otherwise `./relgraph.toml`, then the
/// per-user file, whichever exists first.
#[must_use]
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(CONFIG_FILENAME);
    if local.is_file() {
        return Some(local);
    }

    user_config_path().filter(|p| p.is_file())
}

/// Load settings from disk and environment
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let mut builder = Config::builder();

    if let Some(path) = resolve_path(explicit) {
        debug!("Loading settings from {}", path.display());
        builder = builder.add_source(
            File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(explicit.is_some()),
        );
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("hotfix_suffixes")
            .try_parsing(true),
    );

    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.hotfix_suffixes, vec!["hotfix", "patch", "fix"]);
        assert_eq!(settings.join_key, JoinKey::Tag);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            r#"
hotfix_suffixes = ["hf"]
join_key = "version"

[layout]
primary_axis_spacing = 200.0
"#,
        )
        .unwrap();

        let settings = load(Some(&path)).unwrap();
        assert_eq!(settings.hotfix_suffixes, vec!["hf"]);
        assert_eq!(settings.join_key, JoinKey::Version);
        assert_eq!(settings.layout.primary_axis_spacing, 200.0);
        assert_eq!(settings.layout.branch_axis_spacing, 60.0);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(load(Some(&path)).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[layout]\nbranch_axis_spacing = 0.0\n").unwrap();

        let err = load(Some(&path)).unwrap_err();
        assert!(matches!(err, RelgraphError::InvalidSettings { .. }));
    }

    #[test]
    fn test_empty_suffixes_rejected() {
        let settings = Settings {
            hotfix_suffixes: vec![String::new()],
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let settings = Settings {
            log_level: "loud".into(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - inspect and initialize settings

use crate::config::{self, Settings};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Run the config command
pub fn run(action: &str, explicit: Option<&Path>, force: bool) -> Result<()> {
    match action {
        "show" => {
            let settings = config::load(explicit).context("Failed to load settings")?;
            print!("{}", settings.to_toml().context("Failed to render settings")?);
        }
        "path" => match config::resolve_path(explicit) {
            Some(path) => println!("{}", path.display()),
            None => {
                let default = default_target(explicit)?;
                println!("{} (not present, defaults in use)", default.display());
            }
        },
        "init" => {
            let target = default_target(explicit)?;
            init(&target, force)?;
            println!("Wrote default settings to {}", target.display());
        }
        other => bail!("Unknown action: {}. Valid: show, path, init", other),
    }
    Ok(())
}

fn default_target(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    config::user_config_path()
        .ok_or_else(|| anyhow::anyhow!("No home directory found; pass --config <path>"))
}

/// Write default settings to `path`
pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists. Use --force to overwrite.", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let text = Settings::default()
        .to_toml()
        .context("Failed to render settings")?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("relgraph.toml");

        init(&path, false).unwrap();
        let loaded = config::load(Some(&path)).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("relgraph.toml");
        fs::write(&path, "join_key = \"version\"\n").unwrap();

        assert!(init(&path, false).is_err());
        init(&path, true).unwrap();
        assert_eq!(config::load(Some(&path)).unwrap(), Settings::default());
    }
}

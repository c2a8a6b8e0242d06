//! Filesystem side of the CLI: creating the config directory, writing the default
//! `cubeview.toml` and loading whichever file the user points at.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};
use viewconfig::ViewerConfig;

use crate::paths::AppPaths;

/// Writes the default configuration, refusing to clobber an existing file unless
/// `force` is set. Returns the path written.
pub fn write_default_config(paths: &AppPaths, force: bool) -> Result<PathBuf> {
    ensure_directory(paths.config_dir())?;
    let target = paths.config_file();
    if target.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            target.display()
        );
    }

    let contents = ViewerConfig::default()
        .to_toml_string()
        .context("failed to render default configuration")?;
    fs::write(&target, contents)
        .with_context(|| format!("failed to write {}", target.display()))?;
    info!(path = %target.display(), "wrote default configuration");
    Ok(target)
}

/// Loads the configuration file. An explicit path must exist; the default path
/// may be missing, in which case the built-in defaults apply.
pub fn load_config(path: &Path, explicit: bool) -> Result<ViewerConfig> {
    if !path.exists() {
        if explicit {
            bail!("configuration file {} does not exist", path.display());
        }
        debug!(path = %path.display(), "no configuration file; using defaults");
        return Ok(ViewerConfig::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = ViewerConfig::from_toml_str(&raw)
        .with_context(|| format!("failed to load {}", path.display()))?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

fn ensure_directory(path: &Path) -> Result<()> {
    if path.exists() {
        if path.is_dir() {
            debug!(path = %path.display(), "reusing existing directory");
            Ok(())
        } else {
            bail!("filesystem entry at {} is not a directory", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create config directory at {}", path.display()))?;
        debug!(path = %path.display(), "created config directory");
        Ok(())
    }
}

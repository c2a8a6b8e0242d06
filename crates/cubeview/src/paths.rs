//! Resolves where cubeview keeps its configuration, honouring the
//! `CUBEVIEW_CONFIG_DIR` override before falling back to the platform config dir.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories_next::ProjectDirs;

pub const ENV_CONFIG_DIR: &str = "CUBEVIEW_CONFIG_DIR";
pub const CONFIG_FILE_NAME: &str = "cubeview.toml";

const QUALIFIER: &str = "org";
const ORGANISATION: &str = "cubeview";
const APPLICATION: &str = "cubeview";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> Result<Self> {
        if let Some(config_dir) = env_override(ENV_CONFIG_DIR) {
            return Ok(Self { config_dir });
        }
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
            .ok_or_else(|| anyhow!("failed to determine user directories"))?;
        Ok(Self {
            config_dir: project_dirs.config_dir().to_path_buf(),
        })
    }

    #[cfg(test)]
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }
}

fn env_override(name: &str) -> Option<PathBuf> {
    match env::var_os(name) {
        Some(value) if !value.is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}

//! Subcommands and the configuration lookup they share.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use enerx_core::EnerxConfig;

/// Platform location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("enerx")
        .join("config.json")
}

/// The `--config` path if given, else the platform location.
pub fn config_file(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration.
///
/// An explicit path must exist. Without one the platform file is used when
/// present and the defaults otherwise.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<EnerxConfig> {
    if let Some(path) = explicit {
        return EnerxConfig::from_file(Path::new(path))
            .with_context(|| format!("failed to load config from {}", path));
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(EnerxConfig::from_file(&path)?)
    } else {
        Ok(EnerxConfig::default())
    }
}

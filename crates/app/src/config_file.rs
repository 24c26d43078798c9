//! Locating, loading and seeding the on-disk session config.

use directories::ProjectDirs;
use race_core::{ConfigError, SessionConfig};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::APP_NAME;

pub const CONFIG_FILE_NAME: &str = "session.toml";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Platform(PathBuf),
    Defaults,
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|proj_dirs| {
        let mut path = proj_dirs.config_dir().to_path_buf();
        path.push(CONFIG_FILE_NAME);
        path
    })
}

pub fn write_atomic(config: &SessionConfig, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("toml.tmp");
    let body = toml::to_string_pretty(config).map_err(io::Error::other)?;

    fs::write(&tmp_path, body)?;
    fs::rename(&tmp_path, path)?;

    Ok(())
}

/// An explicit path must exist. A missing platform file is created with defaults.
pub fn load_or_init(
    explicit: Option<&Path>,
    platform: Option<PathBuf>,
) -> Result<(SessionConfig, ConfigSource), ConfigError> {
    if let Some(path) = explicit {
        let config = SessionConfig::load(path)?;
        return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
    }

    let Some(path) = platform else {
        return Ok((SessionConfig::default(), ConfigSource::Defaults));
    };

    if path.exists() {
        let config = SessionConfig::load(&path)?;
        return Ok((config, ConfigSource::Platform(path)));
    }

    let config = SessionConfig::default();
    match write_atomic(&config, &path) {
        Ok(()) => info!(path = %path.display(), "wrote default session config"),
        Err(err) => warn!(path = %path.display(), %err, "could not write default session config"),
    }
    Ok((config, ConfigSource::Platform(path)))
}

//! # Legacy Config Directory
//!
//! Boards can be imported from a directory holding one `<name>.json` file
//! per board. This module does the file I/O; parsing and conversion live in
//! `homeboard_core::formats`.

use homeboard_core::formats::{LegacyConfig, parse_legacy};
use homeboard_core::validation::check_board_name;
use homeboard_core::CoreError;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum ConfigsError {
    /// Config names double as file names, so they follow board name rules.
    #[error("invalid config name {0:?}")]
    InvalidName(String),

    #[error("config not found: {0}")]
    NotFound(String),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ConfigsError + '_ {
    move |source| ConfigsError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// All `*.json` files in `dir`, sorted by file name. A missing directory
/// has no configs.
pub fn list_config_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigsError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error(dir))? {
        let path = entry.map_err(io_error(dir))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == CONFIG_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Config name of a file: its stem.
pub fn config_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

/// Names of every config in `dir`.
pub fn list_config_names(dir: &Path) -> Result<Vec<String>, ConfigsError> {
    Ok(list_config_files(dir)?
        .iter()
        .filter_map(|path| config_name(path))
        .collect())
}

/// Path of the config called `name`. Rejects names that could leave `dir`.
pub fn config_path(dir: &Path, name: &str) -> Result<PathBuf, ConfigsError> {
    check_board_name(name).map_err(|_| ConfigsError::InvalidName(name.to_string()))?;
    Ok(dir.join(format!("{name}.{CONFIG_EXTENSION}")))
}

pub fn config_exists(dir: &Path, name: &str) -> bool {
    config_path(dir, name).is_ok_and(|path| path.is_file())
}

/// Read and parse a config file.
pub fn read_config_file(path: &Path) -> Result<LegacyConfig, ConfigsError> {
    let bytes = std::fs::read(path).map_err(io_error(path))?;
    Ok(parse_legacy(&bytes)?)
}

/// Read and parse the config called `name` from `dir`.
pub fn read_config(dir: &Path, name: &str) -> Result<LegacyConfig, ConfigsError> {
    let path = config_path(dir, name)?;
    if !path.is_file() {
        return Err(ConfigsError::NotFound(name.to_string()));
    }
    read_config_file(&path)
}

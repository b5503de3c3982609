// Data path discovery for local Quake installs.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

pub const DATA_DIR_ENV: &str = "PAL_DATA_DIR";
pub const DEFAULT_GAME_DIR: &str = "id1";

#[derive(Debug, Error)]
pub enum DataPathError {
    #[error("no Quake data directory configured or found")]
    NotFound,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn locate_data_dir() -> Result<PathBuf, DataPathError> {
    let env_value = env::var(DATA_DIR_ENV).ok();
    let cwd = env::current_dir()?;
    locate_data_dir_in(env_value.as_deref(), &cwd)
}

/// `env_value` overrides `cwd/config/data_paths.toml`, which overrides the
/// well-known install locations.
pub fn locate_data_dir_in(env_value: Option<&str>, cwd: &Path) -> Result<PathBuf, DataPathError> {
    if let Some(value) = env_value {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            debug!("using data dir from {}: {}", DATA_DIR_ENV, trimmed);
            return Ok(PathBuf::from(trimmed));
        }
    }

    let config_path = cwd.join("config").join("data_paths.toml");
    if config_path.exists() {
        let contents = fs::read_to_string(&config_path)?;
        if let Some(dir) = parse_quake_dir(&contents) {
            debug!("using data dir from {}: {}", config_path.display(), dir);
            return Ok(PathBuf::from(dir));
        }
    }

    find_default_quake_dir().ok_or(DataPathError::NotFound)
}

pub fn find_game_dir(data_dir: &Path, name: &str) -> Option<PathBuf> {
    let direct = data_dir.join(name);
    if direct.is_dir() {
        return Some(direct);
    }

    let rerelease = data_dir.join("rerelease").join(name);
    if rerelease.is_dir() {
        return Some(rerelease);
    }

    None
}

fn parse_quake_dir(contents: &str) -> Option<String> {
    for line in contents.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        let Some((key, raw_value)) = line.split_once('=') else {
            continue;
        };
        if key.trim() != "quake_dir" {
            continue;
        }

        let trimmed = raw_value
            .trim()
            .trim_matches('"')
            .trim_matches('\'')
            .trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }

    None
}

fn find_default_quake_dir() -> Option<PathBuf> {
    default_quake_paths().into_iter().find(|path| path.is_dir())
}

fn default_quake_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if cfg!(windows) {
        for var in ["ProgramFiles(x86)", "ProgramFiles"] {
            if let Ok(root) = env::var(var) {
                paths.push(PathBuf::from(root).join("Steam\\steamapps\\common\\Quake"));
            }
        }
    } else if let Ok(home) = env::var("HOME") {
        paths.push(PathBuf::from(home).join(".steam/steam/steamapps/common/Quake"));
    }
    paths
}

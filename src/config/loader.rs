use std::fs;
use std::path::{Path, PathBuf};

use super::core::ConverterConfig;
use crate::core::{ConvertError, Result};

pub const CONFIG_FILE_NAME: &str = ".aot-converter.toml";

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<ConverterConfig, String> {
    let config = toml::from_str::<ConverterConfig>(contents)
        .map_err(|e| format!("Failed to parse {CONFIG_FILE_NAME}: {e}"))?;
    config.validate()?;
    Ok(config)
}

/// Load an explicitly requested config file. Any failure is an error.
pub fn load_config_from(path: &Path) -> Result<ConverterConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ConvertError::io("Failed to read config file", path, e))?;
    parse_and_validate_config(&contents)
        .map_err(|e| ConvertError::Config(format!("{}: {e}", path.display())))
}

/// Try loading config from a specific path, logging anything but "not found"
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<ConverterConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to read config file {}: {}", config_path.display(), e);
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Directory ancestors up to a depth limit, starting with `start` itself
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for a config file, falling back to defaults
pub fn discover_config(start: PathBuf) -> ConverterConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            ConverterConfig::default()
        })
}

/// Resolve the configuration for a run: an explicit path wins, otherwise search
/// upward from the current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<ConverterConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }
    match std::env::current_dir() {
        Ok(dir) => Ok(discover_config(dir)),
        Err(e) => {
            log::warn!("Failed to get current directory: {}. Using default config.", e);
            Ok(ConverterConfig::default())
        }
    }
}

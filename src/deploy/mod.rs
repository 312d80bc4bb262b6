//! Deployment defaults for the converted function
//!
//! The defaults file is always replaced. A pre-existing file is first copied to
//! a single backup path; an older backup at that path is overwritten, so only
//! the most recent pre-existing file survives.

pub mod defaults;

pub use defaults::{DeploymentDefaults, BACKUP_CONFIG_FILE_NAME, DEFAULT_CONFIG_FILE_NAME};

use crate::core::{ConvertError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result of [`install_defaults`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallOutcome {
    pub config_path: PathBuf,
    /// Set when an existing config was copied aside
    pub backup_path: Option<PathBuf>,
    pub required_settings: Vec<String>,
}

impl InstallOutcome {
    /// Message for the user when an existing config was replaced.
    pub fn warning(&self) -> Option<String> {
        self.backup_path.as_ref().map(|backup| {
            format!(
                "It looks like you already had a {DEFAULT_CONFIG_FILE_NAME} file. It has been copied to {}. \
                 Please merge it with the new NativeAOT-compatible file that replaced it. \
                 For NativeAOT, keep these settings as-is: {}",
                backup.display(),
                self.required_settings.join(", ")
            )
        })
    }
}

/// Write the NativeAOT deployment defaults into `target_dir`, backing up any
/// existing file first.
pub fn install_defaults(target_dir: &Path) -> Result<InstallOutcome> {
    install(target_dir, &DeploymentDefaults::default())
}

pub fn install(target_dir: &Path, defaults: &DeploymentDefaults) -> Result<InstallOutcome> {
    let config_path = target_dir.join(DEFAULT_CONFIG_FILE_NAME);
    let backup_path = if config_path.is_file() {
        let backup = target_dir.join(BACKUP_CONFIG_FILE_NAME);
        fs::copy(&config_path, &backup)
            .map_err(|e| ConvertError::io("Failed to back up deployment defaults", &backup, e))?;
        warn!("Backed up {} to {}", config_path.display(), backup.display());
        Some(backup)
    } else {
        None
    };

    fs::write(&config_path, defaults.to_json()?)
        .map_err(|e| ConvertError::io("Failed to write deployment defaults", &config_path, e))?;
    info!("Wrote {}", config_path.display());

    Ok(InstallOutcome {
        config_path,
        backup_path,
        required_settings: defaults.required_settings(),
    })
}

//! Persisted profiles and exclusion lists.
//!
//! The document lives at `~/.docsync/profiles.json` unless a different path
//! is supplied. A missing file reads as an empty configuration; a corrupt
//! one can be tolerated through [`load_config_or_default`].

mod types;

pub use types::{SyncConfig, SyncProfile};

use crate::scanner::ScanError;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Profile '{0}' not found. Run 'setup' first.")]
    ProfileNotFound(String),
}

/// Roots of a validated profile, resolved to absolute paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProfile {
    pub name: String,
    pub primary: PathBuf,
    pub secondary: PathBuf,
}

impl SyncProfile {
    pub fn new(primary_dir: impl Into<String>, secondary_dir: impl Into<String>) -> Self {
        Self {
            primary_dir: primary_dir.into(),
            secondary_dir: secondary_dir.into(),
        }
    }

    /// Check that both roots exist and are directories
    pub fn validate(&self, name: &str) -> Result<ResolvedProfile, ScanError> {
        Ok(ResolvedProfile {
            name: name.to_string(),
            primary: resolve_root(&self.primary_dir)?,
            secondary: resolve_root(&self.secondary_dir)?,
        })
    }
}

fn resolve_root(dir: &str) -> Result<PathBuf, ScanError> {
    let path = Path::new(dir);
    if !path.is_dir() {
        return Err(ScanError::RootNotFound(path.to_path_buf()));
    }
    Ok(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()))
}

/// Read the configuration file
pub async fn read_config(config_path: &Path) -> Result<Option<SyncConfig>, ConfigError> {
    debug!("Loading profiles from {}", config_path.display());

    if !config_path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(config_path).await?;
    let config: SyncConfig = serde_json::from_str(&content)?;
    Ok(Some(config))
}

/// Read the configuration, falling back to an empty one when the file is
/// missing or cannot be parsed
pub async fn load_config_or_default(config_path: &Path) -> SyncConfig {
    match read_config(config_path).await {
        Ok(Some(config)) => config,
        Ok(None) => SyncConfig::new(),
        Err(e) => {
            warn!(
                "Failed to parse config file {}: {}. Using empty configuration.",
                config_path.display(),
                e
            );
            SyncConfig::new()
        }
    }
}

/// Write the configuration file atomically (temp file + rename)
pub async fn write_config(config_path: &Path, config: &SyncConfig) -> Result<(), ConfigError> {
    debug!("Saving profiles to {}", config_path.display());

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let temp_path = config_path.with_extension("json.tmp");
    let content = serde_json::to_string_pretty(config)?;
    fs::write(&temp_path, &content).await?;
    fs::rename(&temp_path, config_path).await?;

    Ok(())
}

/// Insert or replace a profile
pub fn add_profile(config: &mut SyncConfig, name: &str, profile: SyncProfile) {
    config.profiles.insert(name.to_string(), profile);
}

/// Remove a profile by name
pub fn remove_profile(config: &mut SyncConfig, name: &str) -> Result<SyncProfile, ConfigError> {
    config
        .profiles
        .remove(name)
        .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
}

/// Add a directory name to the exclusion list. Returns false if it was
/// already excluded.
pub fn add_excluded_dir(config: &mut SyncConfig, dir_name: &str) -> bool {
    push_unique(&mut config.excluded_dirs, dir_name)
}

/// Add a file name to the exclusion list. Returns false if it was already
/// excluded.
pub fn add_excluded_file(config: &mut SyncConfig, file_name: &str) -> bool {
    push_unique(&mut config.excluded_files, file_name)
}

fn push_unique(list: &mut Vec<String>, value: &str) -> bool {
    if list.iter().any(|v| v == value) {
        return false;
    }
    list.push(value.to_string());
    true
}

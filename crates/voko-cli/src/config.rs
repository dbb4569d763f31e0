//! Configuration file loading for the CLI
//!
//! A small persisted configuration holds the dictionary source path and the
//! grammar directory, so the tools can run without arguments once set up.
//! The file is TOML, found via an explicit path, a local `voko/config.toml`,
//! or the platform-specific config directory.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use voko::VokoError;

/// Persisted CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    /// Directory containing the dictionary XML files.
    #[serde(default)]
    pub revo_path: Option<PathBuf>,

    /// Directory containing the grammar files.
    #[serde(default)]
    pub grammar_path: Option<PathBuf>,
}

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for VokoError {
    fn from(err: ConfigError) -> Self {
        VokoError::Io(io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (voko/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns an error when an explicit path does not exist or a found file
/// cannot be parsed.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<CliConfig, VokoError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("voko/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("org", "voko", "voko") {
        let system_config = proj_dirs.config_dir().join("config.toml");
        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }
        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(CliConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<CliConfig, VokoError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: CliConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config: CliConfig =
            toml::from_str("revo_path = \"/data/revo\"\ngrammar_path = \"/data\"").unwrap();
        assert_eq!(config.revo_path.as_deref(), Some(Path::new("/data/revo")));
        assert_eq!(config.grammar_path.as_deref(), Some(Path::new("/data")));
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert!(config.revo_path.is_none());
        assert!(config.grammar_path.is_none());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = load_config(Some("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, VokoError::Io(_)));
    }
}

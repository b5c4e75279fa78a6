//! YAML persistence for any serde configuration type
//!
//! Loading never fails: a missing or broken file yields defaults, and the
//! returned [`ConfigSource`] says which of those happened so the caller can
//! tell the user.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Problems reading or writing a config file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("cannot parse {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("cannot encode config as YAML: {0}")]
    Encode(String),

    #[error("cannot write {path:?}: {reason}")]
    Write { path: PathBuf, reason: String },
}

/// Where the values of a loaded config came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from the file
    File,
    /// No file yet, defaults in use
    Missing,
    /// The file exists but could not be used, defaults in use
    Fallback(ConfigError),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File => write!(f, "loaded from file"),
            ConfigSource::Missing => write!(f, "no config file, using defaults"),
            ConfigSource::Fallback(e) => write!(f, "{}, using defaults", e),
        }
    }
}

/// A config value together with its origin
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub config: T,
    pub source: ConfigSource,
}

impl<T> Loaded<T> {
    /// True when the values come from defaults rather than the file
    pub fn is_default(&self) -> bool {
        !matches!(self.source, ConfigSource::File)
    }
}

/// Read `path` as YAML, falling back to `T::default()`
///
/// Fields missing from the file take their defaults as long as `T` is
/// `#[serde(default)]`.
pub fn load_config<T>(path: &Path) -> Loaded<T>
where
    T: DeserializeOwned + Default,
{
    match read_yaml(path) {
        Ok(Some(config)) => Loaded {
            config,
            source: ConfigSource::File,
        },
        Ok(None) => Loaded {
            config: T::default(),
            source: ConfigSource::Missing,
        },
        Err(e) => Loaded {
            config: T::default(),
            source: ConfigSource::Fallback(e),
        },
    }
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    serde_yaml::from_str(&text)
        .map(Some)
        .map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Write `config` to `path` as YAML, creating missing parent directories
pub fn save_config<T: Serialize>(config: &T, path: &Path) -> Result<(), ConfigError> {
    let yaml = serde_yaml::to_string(config).map_err(|e| ConfigError::Encode(e.to_string()))?;

    let write_error = |e: std::io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(write_error)?;
    }
    std::fs::write(path, yaml).map_err(write_error)?;

    log::debug!("Saved config to {:?}", path);
    Ok(())
}

//! Path utilities for sortscope configuration files

use std::path::PathBuf;

/// Get the default configuration directory
///
/// Returns: `<platform config dir>/sortscope` (e.g. `~/.config/sortscope`)
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sortscope")
}

/// Get the default config file path for a given file name
pub fn default_config_path(filename: &str) -> PathBuf {
    default_config_dir().join(filename)
}

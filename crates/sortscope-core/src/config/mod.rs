//! Shared configuration utilities
//!
//! Generic YAML config loading/saving and the standard config location.
//!
//! # Usage
//!
//! ```ignore
//! use sortscope_core::config::{default_config_path, load_config, save_config, Loaded};
//!
//! let path = default_config_path("config.yaml");
//! let loaded: Loaded<MyAppConfig> = load_config(&path);
//! if loaded.is_default() {
//!     log::warn!("{}", loaded.source);
//! }
//! save_config(&loaded.config, &path)?;
//! ```

mod io;
mod paths;

pub use io::{load_config, save_config, ConfigError, ConfigSource, Loaded};
pub use paths::{default_config_dir, default_config_path};

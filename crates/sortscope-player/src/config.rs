//! Player configuration
//!
//! Stored as YAML at `~/.config/sortscope/config.yaml` (platform equivalent
//! elsewhere). Demonstration timing fields sit at the top level next to the
//! algorithm names; audio output settings live under `audio:`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sortscope_core::algorithms::{self, Algorithm};
use sortscope_core::audio::AudioConfig;
use sortscope_core::config::{ConfigError, Loaded};
use sortscope_core::show::ShowConfig;

const CONFIG_FILENAME: &str = "config.yaml";

/// Root configuration for the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    #[serde(flatten)]
    pub show: ShowConfig,
    /// Shuffle to run before sorting
    pub shuffle: String,
    /// Sort to demonstrate
    pub sort: String,
    pub audio: AudioConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            show: ShowConfig::default(),
            shuffle: algorithms::STANDARD_SHUFFLE.name.to_string(),
            sort: algorithms::SELECTION_SORT.name.to_string(),
            audio: AudioConfig::default(),
        }
    }
}

impl PlayerConfig {
    /// Configured shuffle, or the default one if the name is unknown
    pub fn shuffle_algorithm(&self) -> Algorithm {
        algorithms::find_shuffle(&self.shuffle).unwrap_or_else(|| {
            log::warn!(
                "Unknown shuffle {:?}, using {}",
                self.shuffle,
                algorithms::STANDARD_SHUFFLE.name
            );
            algorithms::STANDARD_SHUFFLE
        })
    }

    /// Configured sort, or the default one if the name is unknown
    pub fn sort_algorithm(&self) -> Algorithm {
        algorithms::find_sort(&self.sort).unwrap_or_else(|| {
            log::warn!(
                "Unknown sort {:?}, using {}",
                self.sort,
                algorithms::SELECTION_SORT.name
            );
            algorithms::SELECTION_SORT
        })
    }
}

pub fn default_config_path() -> PathBuf {
    sortscope_core::config::default_config_path(CONFIG_FILENAME)
}

pub fn load_config(path: &Path) -> Loaded<PlayerConfig> {
    sortscope_core::config::load_config(path)
}

pub fn save_config(config: &PlayerConfig, path: &Path) -> Result<(), ConfigError> {
    sortscope_core::config::save_config(config, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortscope_core::audio::{BufferSize, DeviceId};
    use sortscope_core::config::ConfigSource;

    #[test]
    fn test_default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.show.array_size, 128);
        assert_eq!(config.shuffle_algorithm().name, "Standard Shuffle");
        assert_eq!(config.sort_algorithm().name, "Selection Sort");
        assert_eq!(config.audio.sample_rate, 44100);
    }

    #[test]
    fn test_show_fields_are_top_level() {
        let yaml = "array_size: 64\nsort_delay_ms: 1.5\nsort: Bubble Sort\n";
        let config: PlayerConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.show.array_size, 64);
        assert_eq!(config.show.sort_delay_ms, 1.5);
        assert_eq!(config.show.phase_pause_ms, 750.0);
        assert_eq!(config.sort_algorithm().name, "Bubble Sort");
        assert_eq!(config.shuffle, "Standard Shuffle");
    }

    #[test]
    fn test_unknown_algorithm_falls_back() {
        let config = PlayerConfig {
            shuffle: "Bogo".to_string(),
            sort: "Quantum Sort".to_string(),
            ..PlayerConfig::default()
        };
        assert_eq!(config.shuffle_algorithm().name, "Standard Shuffle");
        assert_eq!(config.sort_algorithm().name, "Selection Sort");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);

        let mut config = PlayerConfig::default();
        config.show.seed = 7;
        config.sort = "Insertion Sort".to_string();
        config.audio = AudioConfig::default()
            .with_device(DeviceId::with_host("Speakers", "ALSA"))
            .with_buffer_frames(512);

        save_config(&config, &path).unwrap();
        let loaded = load_config(&path);

        assert_eq!(loaded.source, ConfigSource::File);
        assert_eq!(loaded.config, config);
        assert_eq!(loaded.config.audio.buffer_size, BufferSize::Fixed(512));
    }

    #[test]
    fn test_default_path() {
        assert!(default_config_path().ends_with("sortscope/config.yaml"));
    }
}

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::algorithms::HeapKind;
use crate::util::DataPaths;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub playback: PlaybackConfig,
    pub heap: HeapConfig,
    pub list: ListConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Delay between automatic advances, in milliseconds
    pub speed_ms: u64,
    /// Start playing as soon as a trace is loaded
    pub autoplay: bool,
}

impl PlaybackConfig {
    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapConfig {
    /// Ordering used when a request does not name one
    pub kind: HeapKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListConfig {
    /// Initial slot count for array-backed lists
    pub capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig {
                speed_ms: 800,
                autoplay: false,
            },
            heap: HeapConfig {
                kind: HeapKind::Max,
            },
            list: ListConfig { capacity: 8 },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlPlaybackConfig {
    pub speed_ms: Option<u64>,
    pub autoplay: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlHeapConfig {
    pub kind: Option<HeapKind>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlListConfig {
    pub capacity: Option<usize>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub playback: Option<TomlPlaybackConfig>,
    pub heap: Option<TomlHeapConfig>,
    pub list: Option<TomlListConfig>,
}

impl Config {
    /// Load `config.toml` from the data directory, merging with defaults
    pub fn load(paths: &DataPaths) -> Self {
        let config_file = paths.config_file();

        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        Self::load_from(&config_file)
    }

    /// Load a specific file. Missing, unreadable or invalid files yield the
    /// defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Config::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Invalid config, using defaults");
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config, using defaults");
                Config::default()
            }
        }
    }

    /// Parse a config document, filling every absent key from the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let toml_config: TomlConfig = toml::from_str(contents)?;
        let mut config = Config::default();

        if let Some(playback) = toml_config.playback {
            if let Some(speed_ms) = playback.speed_ms {
                config.playback.speed_ms = speed_ms;
            }
            if let Some(autoplay) = playback.autoplay {
                config.playback.autoplay = autoplay;
            }
        }

        if let Some(heap) = toml_config.heap {
            if let Some(kind) = heap.kind {
                config.heap.kind = kind;
            }
        }

        if let Some(list) = toml_config.list {
            if let Some(capacity) = list.capacity {
                config.list.capacity = capacity;
            }
        }

        Ok(config)
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }
}

//! Configuration loading and reader settings
//!
//! Two layers:
//! 1. [`ReaderConfig`]: the live playback configuration (rate, chunk size),
//!    always normalized into its valid range.
//! 2. [`TomlConfig`]: the optional bootstrap file that seeds it, located by
//!    priority order (explicit path, environment variable, per-user config
//!    directory, built-in defaults).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{Error, Result};

/// Slowest supported reading rate (words per minute)
pub const MIN_RATE: u32 = 50;
/// Fastest supported reading rate (words per minute)
pub const MAX_RATE: u32 = 1500;
/// Rate used when nothing else is configured
pub const DEFAULT_RATE: u32 = 300;

/// Smallest chunk (words shown at once)
pub const MIN_CHUNK_SIZE: usize = 1;
/// Largest chunk (words shown at once)
pub const MAX_CHUNK_SIZE: usize = 3;
/// Chunk size used when nothing else is configured
pub const DEFAULT_CHUNK_SIZE: usize = 1;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "RSVP_CONFIG";

/// Directory name under the platform config directory
const CONFIG_DIR_NAME: &str = "rsvp-reader";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Clamp a requested rate into `[MIN_RATE, MAX_RATE]`.
pub fn clamp_rate(rate: i64) -> u32 {
    rate.clamp(MIN_RATE as i64, MAX_RATE as i64) as u32
}

/// Clamp a requested chunk size into `[MIN_CHUNK_SIZE, MAX_CHUNK_SIZE]`.
pub fn clamp_chunk_size(size: i64) -> usize {
    size.clamp(MIN_CHUNK_SIZE as i64, MAX_CHUNK_SIZE as i64) as usize
}

/// Playback configuration
///
/// Fields are private so every value that reaches the engine has been
/// clamped. Construct with [`ReaderConfig::new`] or `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    rate: u32,
    chunk_size: usize,
}

impl ReaderConfig {
    /// Create a configuration, clamping both values
    pub fn new(rate: i64, chunk_size: i64) -> Self {
        Self {
            rate: clamp_rate(rate),
            chunk_size: clamp_chunk_size(chunk_size),
        }
    }

    /// Reading rate in words per minute
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Words shown per step
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Set the rate, clamping; returns the stored value
    pub fn set_rate(&mut self, rate: i64) -> u32 {
        self.rate = clamp_rate(rate);
        self.rate
    }

    /// Set the chunk size, clamping; returns the stored value
    pub fn set_chunk_size(&mut self, size: i64) -> usize {
        self.chunk_size = clamp_chunk_size(size);
        self.chunk_size
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct TomlConfig {
    /// Reader defaults
    #[serde(default)]
    pub reader: ReaderSection,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[reader]` table
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReaderSection {
    /// Words per minute (clamped when applied)
    #[serde(default = "default_wpm")]
    pub wpm: i64,

    /// Words per chunk (clamped when applied)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: i64,
}

impl Default for ReaderSection {
    fn default() -> Self {
        Self {
            wpm: default_wpm(),
            chunk_size: default_chunk_size(),
        }
    }
}

/// `[logging]` table
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_wpm() -> i64 {
    DEFAULT_RATE as i64
}

fn default_chunk_size() -> i64 {
    DEFAULT_CHUNK_SIZE as i64
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a config file that is known to exist
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration following the priority order:
    /// 1. `explicit` path (command line)
    /// 2. `RSVP_CONFIG` environment variable
    /// 3. `<config_dir>/rsvp-reader/config.toml`
    /// 4. Built-in defaults
    ///
    /// An explicitly named file that does not exist is an error. A missing
    /// default file is not: defaults are used with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            info!("Loading config from {}", path.display());
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if path.exists() {
                info!("Loading config from {} ({})", path.display(), CONFIG_ENV_VAR);
                return Self::from_file(&path);
            }
            warn!(
                "{} points to missing file {}, ignoring",
                CONFIG_ENV_VAR,
                path.display()
            );
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                info!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            Some(path) => {
                debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                warn!("Could not determine config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Reader configuration with values clamped into range
    pub fn reader_config(&self) -> ReaderConfig {
        let config = ReaderConfig::new(self.reader.wpm, self.reader.chunk_size);
        if config.rate() as i64 != self.reader.wpm {
            warn!(
                "Configured wpm {} out of range, using {}",
                self.reader.wpm,
                config.rate()
            );
        }
        if config.chunk_size() as i64 != self.reader.chunk_size {
            warn!(
                "Configured chunk_size {} out of range, using {}",
                self.reader.chunk_size,
                config.chunk_size()
            );
        }
        config
    }
}

/// Platform config file path (`~/.config/rsvp-reader/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_config_defaults() {
        let config = ReaderConfig::default();
        assert_eq!(config.rate(), 300);
        assert_eq!(config.chunk_size(), 1);
    }

    #[test]
    fn test_rate_clamped() {
        for rate in [-100, 0, 49, 1501, 10_000, i64::MAX, i64::MIN] {
            assert_eq!(clamp_rate(rate) as i64, rate.clamp(50, 1500));
        }
        assert_eq!(clamp_rate(50), 50);
        assert_eq!(clamp_rate(1500), 1500);
        assert_eq!(clamp_rate(420), 420);
    }

    #[test]
    fn test_chunk_size_clamped() {
        for size in [-3, 0, 4, 100] {
            assert_eq!(clamp_chunk_size(size) as i64, size.clamp(1, 3));
        }
        assert_eq!(clamp_chunk_size(2), 2);
    }

    #[test]
    fn test_setters_return_stored_value() {
        let mut config = ReaderConfig::default();
        assert_eq!(config.set_rate(2000), 1500);
        assert_eq!(config.set_chunk_size(0), 1);
        assert_eq!(config, ReaderConfig::new(1500, 1));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: TomlConfig = toml::from_str("[reader]\nwpm = 450\n").unwrap();
        assert_eq!(config.reader.wpm, 450);
        assert_eq!(config.reader.chunk_size, 1);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_out_of_range_file_values_are_clamped() {
        let config: TomlConfig =
            toml::from_str("[reader]\nwpm = 5\nchunk_size = 9\n").unwrap();
        assert_eq!(config.reader_config(), ReaderConfig::new(50, 3));
    }
}

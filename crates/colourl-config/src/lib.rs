//! colourl configuration
//!
//! Settings are read from `colourl.toml` in the current directory and can be
//! overridden per process with `COLOURL_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "colourl.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure for colourl
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ColourlConfig {
    /// Palette rendering defaults
    pub render: RenderConfig,
    /// Page and stylesheet size limits
    pub limits: LimitsConfig,
    /// Rendered image cache
    pub cache: CacheConfig,
}

/// Defaults applied when a request leaves a parameter out
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Painter name (band, band-vertical, circle, circle-reverse)
    pub style: String,
    /// Maximum number of colors drawn
    pub max: usize,
    pub width: u32,
    pub height: u32,
    /// Scorer name (sum, property)
    pub scorer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest accepted HTML document in bytes
    pub max_page_size: u64,
    /// Most files (HTML plus stylesheets) read for one page
    pub max_file_count: usize,
    /// Largest accepted stylesheet in bytes
    pub max_file_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of rendered images kept; 0 disables caching
    pub capacity: usize,
    /// Seconds before a cached image expires
    pub ttl_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            style: "band".to_string(),
            max: 5,
            width: 512,
            height: 512,
            scorer: "sum".to_string(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_page_size: 10 << 20,
            max_file_count: 15,
            max_file_size: 5 << 20,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 500,
            ttl_secs: 7 * 24 * 60 * 60,
        }
    }
}

impl ColourlConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from `colourl.toml` in the current directory
    /// or return default configuration if it can't be loaded
    pub fn load_or_default() -> Self {
        Self::load_from_file(CONFIG_FILE).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Unparseable numbers are ignored.
    pub fn merge_with_env(&mut self) {
        if let Ok(style) = std::env::var("COLOURL_STYLE") {
            self.render.style = style;
        }
        if let Ok(scorer) = std::env::var("COLOURL_SCORER") {
            self.render.scorer = scorer;
        }
        if let Some(max) = env_number("COLOURL_MAX") {
            self.render.max = max;
        }
        if let Some(width) = env_number("COLOURL_WIDTH") {
            self.render.width = width;
        }
        if let Some(height) = env_number("COLOURL_HEIGHT") {
            self.render.height = height;
        }
        if let Some(capacity) = env_number("COLOURL_CACHE_CAPACITY") {
            self.cache.capacity = capacity;
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from colourl.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.trim().parse().ok()
}

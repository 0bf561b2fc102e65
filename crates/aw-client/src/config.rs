//! Client configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Directory name under the platform cache directory
const CACHE_DIR_NAME: &str = "adwire";

/// Used when the platform has no cache directory
const FALLBACK_CACHE_DIR: &str = ".adwire-cache";

/// Response cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding one file per flushed response
    pub dir: PathBuf,
    /// Whether the cache starts open
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            enabled: true,
        }
    }
}

impl CacheConfig {
    /// Enabled cache rooted at `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            enabled: true,
        }
    }
}

/// Platform cache directory for responses, e.g. `~/.cache/adwire` on Linux
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join(CACHE_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_DIR))
}

/// Service client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub cache: CacheConfig,
    /// Cache responses even when they fail to decode
    pub store_on_decode_error: bool,
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Preview configuration
//!
//! Stored as RON:
//! ```ron
//! (
//!     version: 1,
//!     playback: (frame_rate: 30.0, speed: 1.0, max_frames_per_update: 8),
//!     log_filter: "cuetrack_core=debug",
//! )
//! ```

use cuetrack_core::PlaybackSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current preview config format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Default tracing directive
pub const DEFAULT_LOG_FILTER: &str = "cuetrack_core=info,cuetrack_preview=info";

/// Error raised while loading a preview config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not valid RON for a config
    #[error("Invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The file was written by a newer preview
    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}

/// Preview configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Config format version
    pub version: u32,
    /// Playback tuning for the driver
    pub playback: PlaybackSettings,
    /// Tracing directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            playback: PlaybackSettings::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl PreviewConfig {
    /// Load a config from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&content)
    }

    /// Parse a config from RON text
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: PreviewConfig = ron::from_str(content)?;

        // Version check
        if config.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }

        Ok(config)
    }
}

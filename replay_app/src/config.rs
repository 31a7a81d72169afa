//! Demo configuration

use serde::Deserialize;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Tunables for the replay demo.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Number of frames to replay.
    pub frames: u32,
    /// Number of mesh draws recorded per frame.
    pub draws_per_frame: u32,
    /// Whether to wrap passes in named debug events.
    pub debug_events: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            frames: 3,
            draws_per_frame: 16,
            debug_events: true,
        }
    }
}

impl ReplayConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: &str) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(ConfigError::Io(error)) if error.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no {path}, using default configuration");
                Self::default()
            }
            Err(error) => {
                log::warn!("failed to load {path} ({error}), using default configuration");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ReplayConfig = toml::from_str("frames = 10").unwrap();
        assert_eq!(config.frames, 10);
        assert_eq!(config.draws_per_frame, ReplayConfig::default().draws_per_frame);
    }
}

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Fixed pauses on the gate's completion path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    #[serde(with = "millis")]
    pub post_settlement: Duration,
    /// Matches the loader's CSS fade so it is removed after the fade ends.
    #[serde(with = "millis")]
    pub post_hide: Duration,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            post_settlement: Duration::from_millis(500),
            post_hide: Duration::from_millis(600),
        }
    }
}

impl TransitionConfig {
    pub fn with_post_settlement(mut self, ms: u64) -> Self {
        self.post_settlement = Duration::from_millis(ms);
        self
    }

    pub fn with_post_hide(mut self, ms: u64) -> Self {
        self.post_hide = Duration::from_millis(ms);
        self
    }

    pub fn fast() -> Self {
        Self {
            post_settlement: Duration::from_millis(200),
            post_hide: Duration::from_millis(300),
        }
    }

    pub fn patient() -> Self {
        Self {
            post_settlement: Duration::from_millis(1000),
            post_hide: Duration::from_millis(1200),
        }
    }

    /// No pauses at all, for headless runs where nobody watches the fade.
    pub fn instant() -> Self {
        Self {
            post_settlement: Duration::ZERO,
            post_hide: Duration::ZERO,
        }
    }

    pub fn total(&self) -> Duration {
        self.post_settlement + self.post_hide
    }

    /// Reads `{"post_settlement": 500, "post_hide": 600}`; missing keys keep defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid transition config: {0}")]
    Parse(#[from] serde_json::Error),
}

mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

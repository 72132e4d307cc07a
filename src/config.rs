use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{GuessError, GuessResult};
use crate::explore::ExploreLimits;
use crate::oracle::RetryConfig;

pub const DEFAULT_ORACLE_URL: &str = "http://127.0.0.1:8000/";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Contents of `~/.guess/config.toml`. Every section is optional.
#[derive(Debug, Default, Deserialize)]
pub struct GuessConfig {
    pub oracle: Option<OracleConfig>,
    pub explore: Option<ExploreConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OracleConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExploreConfig {
    pub max_depth: Option<usize>,
    pub max_nodes: Option<usize>,
}

impl GuessConfig {
    /// Load the user config. A missing file is not an error.
    pub fn load() -> GuessResult<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> GuessResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            GuessError::ConfigRead {
                path: path.to_path_buf(),
                source,
            }
        })?;
        toml::from_str(&content).map_err(|source| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, source);
            GuessError::ConfigParse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    pub fn oracle_url(&self) -> &str {
        self.oracle
            .as_ref()
            .and_then(|o| o.url.as_deref())
            .unwrap_or(DEFAULT_ORACLE_URL)
    }

    pub fn timeout(&self) -> Duration {
        let secs = self
            .oracle
            .as_ref()
            .and_then(|o| o.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn retry(&self) -> RetryConfig {
        let mut retry = RetryConfig::default();
        if let Some(max) = self.oracle.as_ref().and_then(|o| o.max_retries) {
            retry.max_retries = max;
        }
        retry
    }

    pub fn explore_limits(&self) -> ExploreLimits {
        let mut limits = ExploreLimits::default();
        if let Some(explore) = &self.explore {
            if let Some(depth) = explore.max_depth {
                limits.max_depth = depth;
            }
            if let Some(nodes) = explore.max_nodes {
                limits.max_nodes = nodes;
            }
        }
        limits
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".guess").join("config.toml"))
}

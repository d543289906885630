use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::brain::DEFAULT_SERVER_URL;
use crate::output::DEFAULT_RESULTS_PATH;
use crate::BrainSearchError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Brain API connection
    pub server: ServerConfig,

    /// Search and polling behaviour
    pub search: SearchConfig,

    /// Results page settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// API server URL
    pub url: String,

    /// API user id
    pub user_id: Option<String>,

    /// API user token
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum hit quality shown on the results page (0.0 to 1.0)
    pub quality_threshold: f64,

    /// Seconds between asset status checks
    pub poll_interval_secs: f64,

    /// Give up waiting for uploads after this many seconds
    pub poll_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where the results page is written
    pub results_path: PathBuf,

    /// Open the results page when done
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            user_id: None,
            token: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            quality_threshold: 0.5,
            poll_interval_secs: 2.0,
            poll_timeout_secs: None,
        }
    }
}

impl SearchConfig {
    /// Delay between status checks, rejecting negative, NaN and out-of-range values
    pub fn poll_interval(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.poll_interval_secs).map_err(|_| {
            BrainSearchError::Config(format!(
                "poll interval must be a non-negative number of seconds, got {}",
                self.poll_interval_secs
            ))
            .into()
        })
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: PathBuf::from(DEFAULT_RESULTS_PATH),
            open_browser: true,
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a specific config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Get configuration file path
    fn config_path() -> Option<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir().map(|dir| dir.join("brainsearch").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.server.url)
            .map_err(|_| BrainSearchError::Config(format!("invalid server url {}", self.server.url)))?;

        if !(0.0..=1.0).contains(&self.search.quality_threshold) {
            return Err(BrainSearchError::Config(format!(
                "quality threshold must be between 0 and 1, got {}",
                self.search.quality_threshold
            ))
            .into());
        }

        self.search.poll_interval()?;

        Ok(())
    }
}

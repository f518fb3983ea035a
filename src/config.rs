//! Configuration management and validation.
//!
//! Provides the route definitions to check, the feed settings and the
//! history file location. Configuration is layered: built-in defaults, then
//! an optional JSON config file, then environment variables, then CLI
//! overrides (applied by the command layer), and finally validated.

use crate::app::models::{RouteDefinition, TimeScope};
use crate::constants::{
    API_KEY_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_API_BASE_URL, DEFAULT_DATA_FILE,
    DEFAULT_MARKUP_BASE_URL, DEFAULT_MARKUP_WINDOW, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Complete configuration for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Route definitions checked on every run, in order
    pub routes: Vec<RouteDefinition>,

    /// History data file
    pub data_file: PathBuf,

    /// Feed retrieval settings
    pub feed: FeedConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// Which feed implementation retrieves services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    /// Journey-search JSON API (requires an API key)
    Api,
    /// Detailed search results page
    Markup,
}

/// Feed retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub source: FeedSource,

    pub api_base_url: String,

    /// Basic authorization token for the API feed
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    pub markup_base_url: String,

    /// Time window requested from the results page (e.g. "0800-2000")
    pub markup_window: String,

    pub request_timeout_secs: u64,
}

/// History file output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indent the history file (four spaces) rather than writing it compact
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            routes: default_routes(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            feed: FeedConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: FeedSource::Api,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            markup_base_url: DEFAULT_MARKUP_BASE_URL.to_string(),
            markup_window: DEFAULT_MARKUP_WINDOW.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Built-in route definitions: Elizabeth line arrivals at both ends
pub fn default_routes() -> Vec<RouteDefinition> {
    vec![
        RouteDefinition::new("PAD", "London Paddington")
            .with_operator("XR")
            .with_origin("Abbey Wood")
            .with_time_scope(TimeScope::default()),
        RouteDefinition::new("ABW", "Abbey Wood")
            .with_operator("XR")
            .with_destination("Abbey Wood")
            .with_time_scope(TimeScope::default()),
    ]
}

impl Config {
    /// Default config file location under the platform config directory
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                Error::configuration("Could not determine config directory".to_string())
            })
    }

    /// Load a config file; fields it omits keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file '{}'", path.display()),
                e,
            )
        })?;

        serde_json::from_str(&content).map_err(|e| {
            Error::configuration(format!(
                "Invalid config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Defaults, then the config file if given, then environment variables
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env(|name| std::env::var(name).ok());
        debug!("Configured {} routes", config.routes.len());

        Ok(config)
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.feed.api_key.is_none() {
            self.feed.api_key = lookup(API_KEY_ENV).filter(|key| !key.trim().is_empty());
        }
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if self.routes.is_empty() {
            return Err(Error::configuration(
                "At least one route must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for route in &self.routes {
            route.validate()?;
            if !seen.insert(route.station_code.as_str()) {
                return Err(Error::configuration(format!(
                    "Station code '{}' is configured more than once",
                    route.station_code
                )));
            }
        }

        // Results page services carry no operator code
        if self.feed.source == FeedSource::Markup {
            if let Some(route) = self
                .routes
                .iter()
                .find(|route| route.operator_code.is_some())
            {
                return Err(Error::configuration(format!(
                    "Route {} filters on operator code, which the markup feed does not provide",
                    route.station_code
                )));
            }
        }

        if self.feed.source == FeedSource::Api && self.feed.api_key.is_none() {
            return Err(Error::configuration(format!(
                "The API feed requires an API key (set {} or feed.api_key)",
                API_KEY_ENV
            )));
        }

        if self.feed.request_timeout_secs == 0 {
            return Err(Error::configuration(
                "Request timeout must be greater than 0 seconds".to_string(),
            ));
        }

        if self.data_file.as_os_str().is_empty() {
            return Err(Error::configuration(
                "Data file path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

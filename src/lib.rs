//! Rail Punctuality Library
//!
//! A Rust library for tracking the daily punctuality of a small set of
//! scheduled rail services and keeping a cumulative history of the results.
//!
//! This library provides tools for:
//! - Retrieving a day's arrivals from a journey-search API or a results page
//! - Matching services against configured route definitions
//! - Parsing clock-code arrival times, including half-minute notation
//! - Classifying each service as run/on-time and computing its delay
//! - Aggregating daily run and on-time ratios per station
//! - Merging results into a JSON history keyed by station and date

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod daily_aggregator;
        pub mod history_store;
        pub mod route_checker;
        pub mod route_matcher;
        pub mod service_classifier;
        pub mod time_codec;
    }
    pub mod adapters {
        pub mod feed;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    ClassifiedService, DailyAnalysis, DateEntry, RawService, RouteDefinition, StationHistory,
    TimeScope,
};
pub use config::Config;

/// Result type alias for the rail punctuality tracker
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for punctuality checking operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failed
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Date argument is not a valid YYYY-MM-DD calendar date
    #[error("Malformed date argument '{value}': expected YYYY-MM-DD")]
    MalformedDate { value: String },

    /// Service feed could not be retrieved or decoded for a station
    #[error("Feed unavailable for station {station}: {message}")]
    FeedUnavailable { station: String, message: String },

    /// Persisted history is structurally invalid
    #[error("History store error: {message}")]
    HistoryStore { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a JSON error with context
    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a malformed date error
    pub fn malformed_date(value: impl Into<String>) -> Self {
        Self::MalformedDate {
            value: value.into(),
        }
    }

    /// Create a feed unavailable error for a station
    pub fn feed_unavailable(station: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FeedUnavailable {
            station: station.into(),
            message: message.into(),
        }
    }

    /// Create a history store error
    pub fn history_store(message: impl Into<String>) -> Self {
        Self::HistoryStore {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json {
            message: "JSON processing failed".to_string(),
            source: error,
        }
    }
}

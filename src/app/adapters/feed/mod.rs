//! Service feed retrieval
//!
//! A feed turns a route definition and a date into the raw services reported
//! at that station. Two sources are supported and chosen at configuration
//! time:
//!
//! - [`ApiFeed`] - the journey-search JSON API (arrivals search, authorized)
//! - [`MarkupFeed`] - the public detailed search results page
//!
//! Both apply [`normalise::normalise_time_text`] to time fields, so the rest of
//! the pipeline only ever sees decimal time text. A failed request, a non-2xx
//! response, or an undecodable body is reported as `Error::FeedUnavailable`
//! for that station.

pub mod api;
pub mod markup;
pub mod normalise;

pub use api::ApiFeed;
pub use markup::MarkupFeed;

use crate::app::models::{RawService, RouteDefinition};
use crate::config::{FeedConfig, FeedSource};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::future::Future;
use std::time::Duration;

/// Capability to retrieve the raw services for one station on one date
pub trait ServiceFeed {
    fn fetch_services(
        &self,
        route: &RouteDefinition,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<RawService>>> + Send;
}

/// Feed implementation selected from configuration
#[derive(Debug, Clone)]
pub enum FeedClient {
    Api(ApiFeed),
    Markup(MarkupFeed),
}

impl FeedClient {
    /// Build the configured feed client
    ///
    /// # Errors
    /// * Returns `Error::Configuration` if the API feed has no key or the HTTP
    ///   client cannot be built
    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        let http = build_http_client(config.request_timeout_secs)?;

        match config.source {
            FeedSource::Api => {
                let api_key = config.api_key.clone().ok_or_else(|| {
                    Error::configuration("The API feed requires an API key".to_string())
                })?;
                Ok(Self::Api(ApiFeed::new(
                    http,
                    config.api_base_url.clone(),
                    api_key,
                )))
            }
            FeedSource::Markup => Ok(Self::Markup(MarkupFeed::new(
                http,
                config.markup_base_url.clone(),
                config.markup_window.clone(),
            ))),
        }
    }

    /// Name of the selected source for logging
    pub fn source_name(&self) -> &'static str {
        match self {
            Self::Api(_) => "api",
            Self::Markup(_) => "markup",
        }
    }
}

impl ServiceFeed for FeedClient {
    async fn fetch_services(
        &self,
        route: &RouteDefinition,
        date: NaiveDate,
    ) -> Result<Vec<RawService>> {
        match self {
            Self::Api(feed) => feed.fetch_services(route, date).await,
            Self::Markup(feed) => feed.fetch_services(route, date).await,
        }
    }
}

fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .map_err(|e| Error::configuration(format!("Failed to build HTTP client: {}", e)))
}

/// GET a URL and return the body text, mapping every failure to `FeedUnavailable`
pub(crate) async fn fetch_body(
    request: reqwest::RequestBuilder,
    station_code: &str,
) -> Result<String> {
    let response = request
        .send()
        .await
        .map_err(|e| Error::feed_unavailable(station_code, format!("Request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::feed_unavailable(
            station_code,
            format!("Unexpected HTTP status {}", status),
        ));
    }

    response.text().await.map_err(|e| {
        Error::feed_unavailable(station_code, format!("Failed to read response body: {}", e))
    })
}

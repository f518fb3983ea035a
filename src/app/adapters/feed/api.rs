//! Journey-search API feed
//!
//! Requests `{base}/{station}/{yyyy}/{mm}/{dd}/arrivals` with a basic
//! authorization token and reads each service's operator, origin,
//! destination, booked arrival and realtime arrival. A realtime arrival counts
//! as confirmed only when the API flags it as an actual.

use super::normalise::{normalise_optional_time_text, normalise_time_text};
use super::{ServiceFeed, fetch_body};
use crate::app::models::{RawService, RouteDefinition};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

/// Client for the journey-search arrivals API
#[derive(Debug, Clone)]
pub struct ApiFeed {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiFeed {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Arrivals search URL for a station and date
    pub fn search_url(&self, station_code: &str, date: NaiveDate) -> String {
        format!(
            "{}/{}/{}/arrivals",
            self.base_url.trim_end_matches('/'),
            station_code,
            date.format("%Y/%m/%d")
        )
    }
}

impl ServiceFeed for ApiFeed {
    async fn fetch_services(
        &self,
        route: &RouteDefinition,
        date: NaiveDate,
    ) -> Result<Vec<RawService>> {
        let url = self.search_url(&route.station_code, date);
        info!("Requesting URL: {}", url);

        let request = self.http.get(&url).header(
            reqwest::header::AUTHORIZATION,
            format!("Basic {}", self.api_key),
        );
        let body = fetch_body(request, &route.station_code).await?;

        let services = parse_search_response(&body, &route.station_code)?;
        debug!(
            "Found {} total services at {}",
            services.len(),
            route.station_code
        );
        Ok(services)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    services: Option<Vec<ApiService>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiService {
    #[serde(default)]
    atoc_code: String,
    location_detail: LocationDetail,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationDetail {
    #[serde(default)]
    origin: Vec<LocationPair>,
    #[serde(default)]
    destination: Vec<LocationPair>,
    #[serde(default)]
    gbtt_booked_arrival: Option<String>,
    #[serde(default)]
    realtime_arrival: Option<String>,
    #[serde(default)]
    realtime_arrival_actual: bool,
}

#[derive(Debug, Deserialize)]
struct LocationPair {
    #[serde(default)]
    description: String,
}

impl From<ApiService> for RawService {
    fn from(service: ApiService) -> Self {
        let detail = service.location_detail;
        let first_description = |pairs: &[LocationPair]| {
            pairs
                .first()
                .map(|pair| pair.description.clone())
                .unwrap_or_default()
        };

        RawService {
            operator_code: service.atoc_code,
            origin: first_description(&detail.origin),
            destination: first_description(&detail.destination),
            planned_arrival: normalise_time_text(
                detail.gbtt_booked_arrival.as_deref().unwrap_or_default(),
            ),
            actual_arrival: normalise_optional_time_text(detail.realtime_arrival.as_deref()),
            actual_is_confirmed: detail.realtime_arrival_actual,
        }
    }
}

/// Decode an arrivals search response body
///
/// A `null` or missing service list means no services ran.
///
/// # Errors
/// * Returns `Error::FeedUnavailable` if the body is not a search response
pub fn parse_search_response(body: &str, station_code: &str) -> Result<Vec<RawService>> {
    let response: SearchResponse = serde_json::from_str(body).map_err(|e| {
        Error::feed_unavailable(station_code, format!("Unparseable API response: {}", e))
    })?;

    Ok(response
        .services
        .unwrap_or_default()
        .into_iter()
        .map(RawService::from)
        .collect())
}

//! Detailed search results page feed
//!
//! Fetches the public results page for a station and date and extracts one
//! raw service per listed service element. The page lists no operator, so
//! services from this feed carry an empty operator code and configuration
//! validation rejects routes that filter on one. An actual arrival element is
//! only rendered once the arrival is recorded, so its presence marks the
//! arrival as confirmed.

use super::normalise::{normalise_optional_time_text, normalise_time_text};
use super::{ServiceFeed, fetch_body};
use crate::app::models::{RawService, RouteDefinition};
use crate::constants::{MARKUP_QUERY, selectors};
use crate::{Error, Result};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

/// Client for the detailed search results page
#[derive(Debug, Clone)]
pub struct MarkupFeed {
    http: reqwest::Client,
    base_url: String,
    window: String,
}

impl MarkupFeed {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        window: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            window: window.into(),
        }
    }

    /// Results page URL for a station and date
    pub fn page_url(&self, station_code: &str, date: NaiveDate) -> String {
        format!(
            "{}:{}/{}/{}?{}",
            self.base_url.trim_end_matches('/'),
            station_code,
            date.format("%Y-%m-%d"),
            self.window,
            MARKUP_QUERY
        )
    }
}

impl ServiceFeed for MarkupFeed {
    async fn fetch_services(
        &self,
        route: &RouteDefinition,
        date: NaiveDate,
    ) -> Result<Vec<RawService>> {
        let url = self.page_url(&route.station_code, date);
        info!("Requesting URL: {}", url);

        let body = fetch_body(self.http.get(&url), &route.station_code).await?;

        let services = extract_services(&body, &route.station_code)?;
        debug!(
            "Found {} total services at {}",
            services.len(),
            route.station_code
        );
        Ok(services)
    }
}

/// Selectors for the fields of one listed service
struct ServiceSelectors {
    service_list: Selector,
    service: Selector,
    origin: Selector,
    destination: Selector,
    planned: Selector,
    actual: Selector,
}

impl ServiceSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            service_list: parse_selector(selectors::SERVICE_LIST)?,
            service: parse_selector(selectors::SERVICE)?,
            origin: parse_selector(selectors::ORIGIN)?,
            destination: parse_selector(selectors::DESTINATION)?,
            planned: parse_selector(selectors::PLANNED_ARRIVAL)?,
            actual: parse_selector(selectors::ACTUAL_ARRIVAL)?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| Error::configuration(format!("Invalid selector '{}': {}", selector, e)))
}

/// Text of the first element matching `selector` within `element`
fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|found| found.text().collect::<String>().trim().to_string())
}

/// Extract the listed services from a results page
///
/// # Errors
/// * Returns `Error::FeedUnavailable` if the page has no service list at all
pub fn extract_services(html: &str, station_code: &str) -> Result<Vec<RawService>> {
    let selectors = ServiceSelectors::new()?;
    let document = Html::parse_document(html);

    if document.select(&selectors.service_list).next().is_none() {
        return Err(Error::feed_unavailable(
            station_code,
            "Results page has no service list".to_string(),
        ));
    }

    let services = document
        .select(&selectors.service)
        .map(|element| {
            let actual = first_text(&element, &selectors.actual);
            RawService {
                operator_code: String::new(),
                origin: first_text(&element, &selectors.origin).unwrap_or_default(),
                destination: first_text(&element, &selectors.destination).unwrap_or_default(),
                planned_arrival: normalise_time_text(
                    &first_text(&element, &selectors.planned).unwrap_or_default(),
                ),
                actual_is_confirmed: actual.is_some(),
                actual_arrival: normalise_optional_time_text(actual.as_deref()),
            }
        })
        .collect();

    Ok(services)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PAGE: &str = r#"
        <html><body>
        <div class="servicelist">
            <a class="service" href="/service/gb-nr:W12345/2021-06-01/detailed">
                <div class="location o">Abbey Wood (Crossrail)</div>
                <div class="location d">Terminates here</div>
                <div class="time plan a wtt">0815½</div>
                <div class="time real a act">0817</div>
            </a>
            <a class="service" href="/service/gb-nr:W12346/2021-06-01/detailed">
                <div class="location o">Abbey Wood (Crossrail)</div>
                <div class="location d">Terminates here</div>
                <div class="time plan a wtt">0830</div>
                <div class="time real a exp">0832</div>
            </a>
            <a class="service" href="/service/gb-nr:C99999/2021-06-01/detailed">
                <div class="location o">Reading</div>
                <div class="location d">London Paddington</div>
                <div class="time plan a wtt">0900</div>
            </a>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_extract_services() {
        let services = extract_services(SAMPLE_PAGE, "PDX").unwrap();
        assert_eq!(services.len(), 3);

        let first = &services[0];
        assert_eq!(first.operator_code, "");
        assert_eq!(first.origin, "Abbey Wood (Crossrail)");
        assert_eq!(first.destination, "Terminates here");
        assert_eq!(first.planned_arrival, "0815.5");
        assert_eq!(first.confirmed_actual(), Some("0817"));
    }

    #[test]
    fn test_expected_time_is_not_an_actual() {
        let services = extract_services(SAMPLE_PAGE, "PDX").unwrap();

        let expected_only = &services[1];
        assert_eq!(expected_only.actual_arrival, None);
        assert!(!expected_only.actual_is_confirmed);

        let no_realtime = &services[2];
        assert_eq!(no_realtime.confirmed_actual(), None);
    }

    #[test]
    fn test_empty_service_list() {
        let page = r#"<html><body><div class="servicelist"></div></body></html>"#;
        let services = extract_services(page, "PDX").unwrap();
        assert!(services.is_empty());
    }

    #[test]
    fn test_page_without_service_list_is_feed_unavailable() {
        let page = "<html><body><h1>Too many requests</h1></body></html>";
        let result = extract_services(page, "PDX");
        assert!(matches!(result, Err(Error::FeedUnavailable { .. })));
    }

    #[test]
    fn test_page_url() {
        let feed = MarkupFeed::new(
            reqwest::Client::new(),
            "https://www.realtimetrains.co.uk/search/detailed/gb-nr",
            "0800-2000",
        );
        let date = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        assert_eq!(
            feed.page_url("PDX", date),
            "https://www.realtimetrains.co.uk/search/detailed/gb-nr:PDX/2021-06-01/0800-2000?stp=WVS&show=all&order=actual"
        );
    }
}

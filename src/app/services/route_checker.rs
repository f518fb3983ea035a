//! Daily punctuality check across configured routes
//!
//! For each route definition, in order: fetch the day's raw services from the
//! feed, keep those the route matches, classify each one, summarise the day
//! and merge the result into the history under the route's station code.
//!
//! Routes are independent. A feed failure for one route is recorded in the
//! run statistics and the remaining routes are still checked; only errors
//! that are not route-recoverable stop the run.

use super::history_store::HistoryStore;
use super::route_matcher::filter_services;
use super::service_classifier::classify_service;
use crate::app::adapters::feed::ServiceFeed;
use crate::app::models::{DailyAnalysis, DateEntry, RawService, RouteDefinition};
use crate::{Error, Result};
use chrono::NaiveDate;
use indicatif::ProgressBar;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Outcome of checking all configured routes
#[derive(Debug, Clone, Default)]
pub struct CheckStats {
    /// Number of routes configured for the run
    pub routes_configured: usize,
    /// Station codes whose results were merged
    pub routes_succeeded: Vec<String>,
    /// Station codes whose check failed, with the reason
    pub routes_failed: Vec<(String, String)>,
    /// Matched services recorded across all routes
    pub services_recorded: usize,
    /// Time spent checking routes
    pub processing_time: Duration,
}

impl CheckStats {
    /// Whether every configured route was recorded
    pub fn all_succeeded(&self) -> bool {
        self.routes_failed.is_empty() && self.routes_succeeded.len() == self.routes_configured
    }

    /// Summary line for logging
    pub fn summary(&self) -> String {
        format!(
            "Checked {} routes: {} recorded, {} failed, {} services",
            self.routes_configured,
            self.routes_succeeded.len(),
            self.routes_failed.len(),
            self.services_recorded
        )
    }
}

/// Whether an error aborts only the current route rather than the whole run
pub fn is_route_recoverable(error: &Error) -> bool {
    matches!(error, Error::FeedUnavailable { .. })
}

/// Build the date entry for one route from the feed's raw services
///
/// Matched services keep feed order. The actual arrival is only used when the
/// feed marked it as recorded; forecasts are stored as absent.
pub fn evaluate_route(
    route: &RouteDefinition,
    raw_services: &[RawService],
    date: NaiveDate,
) -> DateEntry {
    let services: Vec<_> = filter_services(raw_services, route)
        .map(|service| {
            classify_service(&service.planned_arrival, service.confirmed_actual())
        })
        .inspect(|service| debug!("{}: {:?}", route.station_code, service))
        .collect();

    DateEntry {
        date,
        analysis: DailyAnalysis::from_services(&services),
        services,
    }
}

/// Checks a set of route definitions against a feed
pub struct RouteChecker<'a, F> {
    routes: &'a [RouteDefinition],
    feed: &'a F,
}

impl<'a, F: ServiceFeed> RouteChecker<'a, F> {
    pub fn new(routes: &'a [RouteDefinition], feed: &'a F) -> Self {
        Self { routes, feed }
    }

    /// Fetch and evaluate one route
    ///
    /// # Errors
    /// * Returns `Error::FeedUnavailable` if the feed cannot supply the route's services
    pub async fn check_route(&self, route: &RouteDefinition, date: NaiveDate) -> Result<DateEntry> {
        info!("Checking station code: {}", route.station_code);

        let raw_services = self.feed.fetch_services(route, date).await?;
        let entry = evaluate_route(route, &raw_services, date);

        info!(
            "{} on {}: {} of {} services matched | {}",
            route.station_code,
            date,
            entry.services.len(),
            raw_services.len(),
            entry.analysis.summary()
        );

        Ok(entry)
    }

    /// Check every route for `date`, merging successful results into `store`
    ///
    /// # Errors
    /// * Returns the first error that is not route-recoverable
    pub async fn check_all(
        &self,
        date: NaiveDate,
        store: &mut HistoryStore,
        progress: Option<&ProgressBar>,
    ) -> Result<CheckStats> {
        let start_time = Instant::now();
        let mut stats = CheckStats {
            routes_configured: self.routes.len(),
            ..Default::default()
        };

        for route in self.routes {
            if let Some(pb) = progress {
                pb.set_message(route.station_code.clone());
            }

            match self.check_route(route, date).await {
                Ok(entry) => {
                    stats.services_recorded += entry.services.len();
                    store.merge(&route.station_code, route, entry);
                    stats.routes_succeeded.push(route.station_code.clone());
                }
                Err(e) if is_route_recoverable(&e) => {
                    error!("Failed to check station {}: {}", route.station_code, e);
                    stats
                        .routes_failed
                        .push((route.station_code.clone(), e.to_string()));
                }
                Err(e) => return Err(e),
            }

            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        stats.processing_time = start_time.elapsed();
        info!("{}", stats.summary());

        Ok(stats)
    }
}

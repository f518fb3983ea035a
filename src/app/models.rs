//! Data models for punctuality tracking
//!
//! This module contains the route definitions supplied at startup, the raw
//! service records produced by a feed, and the derived records that make up
//! the persisted history.

use crate::constants::{
    CLOCK_HOUR_WIDTH, DEFAULT_SCOPE_END_HOUR, DEFAULT_SCOPE_START_HOUR, MAX_SCOPE_HOUR,
};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Route Definition
// =============================================================================

/// Inclusive range of planned-arrival hours a route cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeScope {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl TimeScope {
    /// Create a new time scope with validation
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self> {
        let scope = Self {
            start_hour,
            end_hour,
        };
        scope.validate()?;
        Ok(scope)
    }

    /// Check that both hours are clock hours and the range is not inverted
    pub fn validate(&self) -> Result<()> {
        if self.start_hour > MAX_SCOPE_HOUR || self.end_hour > MAX_SCOPE_HOUR {
            return Err(Error::configuration(format!(
                "Time scope hours must be between 0 and {}: {}-{}",
                MAX_SCOPE_HOUR, self.start_hour, self.end_hour
            )));
        }
        if self.start_hour > self.end_hour {
            return Err(Error::configuration(format!(
                "Time scope start hour {} is after end hour {}",
                self.start_hour, self.end_hour
            )));
        }
        Ok(())
    }

    /// Whether an hour falls within the scope (both ends inclusive)
    pub fn contains_hour(&self, hour: u32) -> bool {
        (self.start_hour..=self.end_hour).contains(&hour)
    }

    /// Whether the textual hour of a clock code falls within the scope
    ///
    /// Text whose first two characters are not an integer hour is outside
    /// every scope.
    pub fn contains_clock_text(&self, text: &str) -> bool {
        text.get(..CLOCK_HOUR_WIDTH)
            .and_then(|hours| hours.parse::<u32>().ok())
            .is_some_and(|hour| self.contains_hour(hour))
    }
}

impl Default for TimeScope {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_SCOPE_START_HOUR,
            end_hour: DEFAULT_SCOPE_END_HOUR,
        }
    }
}

/// A monitored station plus the optional filters that select its services
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteDefinition {
    /// Station code used for the feed request and as the history key (e.g. "PAD")
    pub station_code: String,

    /// Human-readable station name (e.g. "London Paddington")
    pub station_name: String,

    /// Operator code a service must carry (e.g. "XR")
    #[serde(default)]
    pub operator_code: Option<String>,

    /// Origin description a service must start from
    #[serde(default)]
    pub origin: Option<String>,

    /// Destination description a service must run to
    #[serde(default)]
    pub destination: Option<String>,

    /// Planned-arrival hours a service must fall within
    #[serde(default)]
    pub time_scope: Option<TimeScope>,
}

impl RouteDefinition {
    /// Create a route with no filters
    pub fn new(station_code: impl Into<String>, station_name: impl Into<String>) -> Self {
        Self {
            station_code: station_code.into(),
            station_name: station_name.into(),
            operator_code: None,
            origin: None,
            destination: None,
            time_scope: None,
        }
    }

    pub fn with_operator(mut self, operator_code: impl Into<String>) -> Self {
        self.operator_code = Some(operator_code.into());
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_time_scope(mut self, time_scope: TimeScope) -> Self {
        self.time_scope = Some(time_scope);
        self
    }

    /// Validate the route definition
    pub fn validate(&self) -> Result<()> {
        if self.station_code.trim().is_empty() {
            return Err(Error::configuration(
                "Route station code cannot be empty".to_string(),
            ));
        }
        if let Some(scope) = &self.time_scope {
            scope.validate().map_err(|e| {
                Error::configuration(format!("Route {}: {}", self.station_code, e))
            })?;
        }
        Ok(())
    }

    /// Identity fields recorded in the history the first time a station is seen
    pub fn meta(&self) -> StationMeta {
        StationMeta {
            station_code: self.station_code.clone(),
            station_name: self.station_name.clone(),
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            toc: self.operator_code.clone(),
        }
    }
}

// =============================================================================
// Raw Service Record
// =============================================================================

/// One service as reported by a feed, with time text already normalised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawService {
    /// Operator code (empty when the feed does not report one)
    pub operator_code: String,

    /// Origin description
    pub origin: String,

    /// Destination description
    pub destination: String,

    /// Planned arrival clock code (e.g. "0815", "0815.5")
    pub planned_arrival: String,

    /// Realtime arrival clock code, if the feed reports one
    pub actual_arrival: Option<String>,

    /// Whether the realtime arrival is a recorded actual rather than a forecast
    pub actual_is_confirmed: bool,
}

impl RawService {
    /// The realtime arrival only when it has been recorded as actual
    pub fn confirmed_actual(&self) -> Option<&str> {
        if self.actual_is_confirmed {
            self.actual_arrival.as_deref()
        } else {
            None
        }
    }
}

// =============================================================================
// Derived Records
// =============================================================================

/// A matched service after classification
///
/// `ran` is true iff `actual` parses as a time. `delay` is in minutes (a
/// half-minute fraction is kept), clamped at zero, and is `None` when the
/// service did not run or its planned time could not be parsed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClassifiedService {
    pub planned: String,
    pub actual: Option<String>,
    pub ran: bool,
    pub ontime: bool,
    /// Minutes late, or `None` when the service did not run. A service that
    /// ran against an unparseable planned time also has no delay, so `ran`
    /// can be true while `delay` is `None`.
    pub delay: Option<f64>,
}

/// Summary statistics for one station on one date
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DailyAnalysis {
    pub total_services: usize,
    pub total_ran: usize,
    pub total_ontime: usize,
    /// `total_ran / total_services`, `None` when there were no services
    pub percent_ran: Option<f64>,
    /// `total_ontime / total_services`, `None` when there were no services
    pub percent_ontime: Option<f64>,
}

/// The stored result for one station on one date
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DateEntry {
    pub date: NaiveDate,
    pub analysis: DailyAnalysis,
    pub services: Vec<ClassifiedService>,
}

/// Identity of a monitored station, derived from its route definition
///
/// Older history files wrote `station` rather than `station_code` and had no
/// name or operator; both shapes load.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StationMeta {
    #[serde(alias = "station")]
    pub station_code: String,
    #[serde(default)]
    pub station_name: String,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub toc: Option<String>,
}

/// All recorded dates for one station
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StationHistory {
    pub meta: StationMeta,
    #[serde(default)]
    pub dates: BTreeMap<NaiveDate, DateEntry>,
}

impl StationHistory {
    /// Create an empty history for a station
    pub fn new(meta: StationMeta) -> Self {
        Self {
            meta,
            dates: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_scope_validation() {
        assert!(TimeScope::new(8, 19).is_ok());
        assert!(TimeScope::new(0, 23).is_ok());
        assert!(TimeScope::new(12, 12).is_ok());
        assert!(TimeScope::new(19, 8).is_err());
        assert!(TimeScope::new(8, 24).is_err());
    }

    #[test]
    fn test_time_scope_contains_clock_text() {
        let scope = TimeScope::new(8, 19).unwrap();

        assert!(scope.contains_clock_text("0800"));
        assert!(scope.contains_clock_text("0815.5"));
        assert!(scope.contains_clock_text("1959"));
        assert!(!scope.contains_clock_text("0730"));
        assert!(!scope.contains_clock_text("2000"));
        assert!(!scope.contains_clock_text(""));
        assert!(!scope.contains_clock_text("xx15"));
    }

    #[test]
    fn test_route_definition_meta() {
        let route = RouteDefinition::new("PAD", "London Paddington")
            .with_operator("XR")
            .with_origin("Abbey Wood");

        let meta = route.meta();
        assert_eq!(meta.station_code, "PAD");
        assert_eq!(meta.station_name, "London Paddington");
        assert_eq!(meta.origin.as_deref(), Some("Abbey Wood"));
        assert_eq!(meta.destination, None);
        assert_eq!(meta.toc.as_deref(), Some("XR"));
    }

    #[test]
    fn test_route_definition_validation() {
        assert!(RouteDefinition::new("PAD", "London Paddington").validate().is_ok());
        assert!(RouteDefinition::new("  ", "Nowhere").validate().is_err());

        let inverted = RouteDefinition::new("PAD", "London Paddington")
            .with_time_scope(TimeScope {
                start_hour: 20,
                end_hour: 8,
            });
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_confirmed_actual() {
        let mut service = RawService {
            operator_code: "XR".to_string(),
            origin: "Abbey Wood".to_string(),
            destination: "Paddington".to_string(),
            planned_arrival: "0815".to_string(),
            actual_arrival: Some("0817".to_string()),
            actual_is_confirmed: true,
        };
        assert_eq!(service.confirmed_actual(), Some("0817"));

        service.actual_is_confirmed = false;
        assert_eq!(service.confirmed_actual(), None);
    }

    #[test]
    fn test_ran_without_delay_serialization() {
        let service = ClassifiedService {
            planned: "".to_string(),
            actual: Some("0817".to_string()),
            ran: true,
            ontime: false,
            delay: None,
        };

        let json = serde_json::to_value(&service).unwrap();
        assert_eq!(json["ran"], true);
        assert!(json["delay"].is_null());

        let restored: ClassifiedService = serde_json::from_value(json).unwrap();
        assert_eq!(restored, service);
    }

    #[test]
    fn test_legacy_meta_deserialization() {
        let json = r#"{
            "station": "PDX",
            "origin": "Abbey Wood (Crossrail)",
            "destination": "Terminates here"
        }"#;
        let meta: StationMeta = serde_json::from_str(json).unwrap();

        assert_eq!(meta.station_code, "PDX");
        assert_eq!(meta.station_name, "");
        assert_eq!(meta.destination.as_deref(), Some("Terminates here"));
        assert_eq!(meta.toc, None);
    }

    #[test]
    fn test_classified_service_serializes_nulls() {
        let service = ClassifiedService {
            planned: "0815".to_string(),
            actual: None,
            ran: false,
            ontime: false,
            delay: None,
        };
        let json = serde_json::to_value(&service).unwrap();

        assert!(json["actual"].is_null());
        assert!(json["delay"].is_null());
        assert_eq!(json["ran"], false);
    }
}

//! Shared test utilities and fixtures for history store tests

use crate::app::models::{ClassifiedService, DailyAnalysis, DateEntry, RouteDefinition, TimeScope};
use chrono::NaiveDate;

pub mod persistence_tests;

/// Parse a fixture date
pub fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

/// Route for the Paddington arrivals check
pub fn create_paddington_route() -> RouteDefinition {
    RouteDefinition::new("PAD", "London Paddington")
        .with_operator("XR")
        .with_origin("Abbey Wood")
        .with_time_scope(TimeScope::new(8, 19).unwrap())
}

/// Route for the Abbey Wood arrivals check
pub fn create_abbey_wood_route() -> RouteDefinition {
    RouteDefinition::new("ABW", "Abbey Wood")
        .with_operator("XR")
        .with_destination("Abbey Wood")
        .with_time_scope(TimeScope::new(8, 19).unwrap())
}

/// Build a classified service from planned/actual text and a delay
pub fn create_test_service(
    planned: &str,
    actual: Option<&str>,
    delay: Option<f64>,
) -> ClassifiedService {
    ClassifiedService {
        planned: planned.to_string(),
        actual: actual.map(str::to_string),
        ran: actual.is_some(),
        ontime: delay.is_some_and(|delay| delay < 5.0),
        delay,
    }
}

/// Build a date entry whose analysis agrees with its services
pub fn create_test_entry(date_text: &str, services: Vec<ClassifiedService>) -> DateEntry {
    DateEntry {
        date: date(date_text),
        analysis: DailyAnalysis::from_services(&services),
        services,
    }
}

/// A typical day: one on time, one late, one that did not run
pub fn create_typical_entry(date_text: &str) -> DateEntry {
    create_test_entry(
        date_text,
        vec![
            create_test_service("0815", Some("0816"), Some(1.0)),
            create_test_service("0845", Some("0853.5"), Some(8.5)),
            create_test_service("0915", None, None),
        ],
    )
}

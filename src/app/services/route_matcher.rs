//! Route matching for raw feed services
//!
//! Comparisons are exact string equality on the fields a feed extracted.
//! Case and whitespace normalisation, if a feed needs it, belongs to the feed
//! adapter.

use crate::app::models::{RawService, RouteDefinition};

/// Whether a raw service belongs to a route definition
///
/// Each filter the route sets must match; unset filters accept anything. The
/// time scope is checked against the textual hour of the planned arrival, so
/// it also applies to planned times that would not parse as a clock code.
pub fn route_matches(service: &RawService, route: &RouteDefinition) -> bool {
    if let Some(operator_code) = &route.operator_code {
        if service.operator_code != *operator_code {
            return false;
        }
    }

    if let Some(origin) = &route.origin {
        if service.origin != *origin {
            return false;
        }
    }

    if let Some(destination) = &route.destination {
        if service.destination != *destination {
            return false;
        }
    }

    if let Some(scope) = &route.time_scope {
        if !scope.contains_clock_text(&service.planned_arrival) {
            return false;
        }
    }

    true
}

/// Keep the services that belong to a route, preserving feed order
pub fn filter_services<'a>(
    services: &'a [RawService],
    route: &'a RouteDefinition,
) -> impl Iterator<Item = &'a RawService> + 'a {
    services
        .iter()
        .filter(move |service| route_matches(service, route))
}

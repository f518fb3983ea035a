//! Run and on-time classification for matched services

use super::time_codec::parse_service_time;
use crate::app::models::ClassifiedService;
use crate::constants::ON_TIME_THRESHOLD_MINUTES;

/// Classify a service from its planned and actual arrival text
///
/// A service ran when its actual text parses as a time. Early arrivals clamp
/// to zero delay; a service is on time when it ran less than
/// [`ON_TIME_THRESHOLD_MINUTES`] late. When the planned text does not parse
/// the service still counts as run, but no delay can be computed and it is
/// not counted as on time.
pub fn classify_service(planned: &str, actual: Option<&str>) -> ClassifiedService {
    let actual_time = parse_service_time(actual);
    let ran = actual_time.is_some();

    let delay = actual_time
        .zip(parse_service_time(Some(planned)))
        .map(|(actual_time, planned_time)| service_delay(actual_time, planned_time));

    let ontime = ran && delay.is_some_and(|delay| delay < ON_TIME_THRESHOLD_MINUTES);

    ClassifiedService {
        planned: planned.to_string(),
        actual: actual.map(str::to_string),
        ran,
        ontime,
        delay,
    }
}

/// Minutes late, clamped so that early arrivals count as zero
pub fn service_delay(actual_minutes: f64, planned_minutes: f64) -> f64 {
    (actual_minutes - planned_minutes).max(0.0)
}

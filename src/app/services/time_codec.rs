//! Clock-code arrival time parsing
//!
//! Feeds report arrival times as four-character `HHMM` codes, optionally with
//! a decimal half-minute suffix (`0830.5`) once fraction glyphs have been
//! normalised by the feed adapter. This module turns that text into a minute
//! offset from the start of the service day.
//!
//! Only the first hour after midnight is remapped (`00` → `24`). Services
//! recorded from 01:00 the following day onwards still parse as early-morning
//! times.

use crate::constants::{
    CLOCK_HOUR_WIDTH, MIDNIGHT_HOUR_TEXT, MIDNIGHT_REMAP_HOUR, MIN_VALID_MINUTES, MINUTES_PER_HOUR,
};

/// Parse clock-code text into minutes since the start of the service day
///
/// Returns `None` for absent or empty text, text that is not an hour followed
/// by a minute number, and any result below one minute.
///
/// # Examples
///
/// ```rust
/// use rail_punctuality::app::services::time_codec::parse_service_time;
///
/// assert_eq!(parse_service_time(Some("0830")), Some(510.0));
/// assert_eq!(parse_service_time(Some("0005")), Some(1445.0));
/// assert_eq!(parse_service_time(None), None);
/// ```
pub fn parse_service_time(text: Option<&str>) -> Option<f64> {
    let text = text?;
    if text.is_empty() {
        return None;
    }

    let hour_text = text.get(..CLOCK_HOUR_WIDTH)?;
    let minute_text = text.get(CLOCK_HOUR_WIDTH..)?;

    let hours = if hour_text == MIDNIGHT_HOUR_TEXT {
        MIDNIGHT_REMAP_HOUR
    } else {
        hour_text.parse::<u32>().ok()?
    };

    let minutes = parse_minute_part(minute_text)?;
    let total = f64::from(hours) * MINUTES_PER_HOUR + minutes;

    if total < MIN_VALID_MINUTES {
        return None;
    }

    Some(total)
}

/// Parse the minute part of a clock code, allowing a decimal fraction
fn parse_minute_part(text: &str) -> Option<f64> {
    if text.is_empty() || !text.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>()
        .ok()
        .filter(|minutes| minutes.is_finite() && *minutes >= 0.0)
}

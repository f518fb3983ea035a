//! Application constants for the rail punctuality tracker
//!
//! This module contains the classification thresholds, feed endpoints,
//! markup selectors and default values used throughout the application.

// =============================================================================
// Classification Constants
// =============================================================================

/// A service is on time when it arrives strictly less than this many minutes late
pub const ON_TIME_THRESHOLD_MINUTES: f64 = 5.0;

/// Minutes in one hour
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Hour text for the first hour after midnight
pub const MIDNIGHT_HOUR_TEXT: &str = "00";

/// Hour that the first hour after midnight is remapped to, so that 00:xx
/// sorts after 23:xx on the same service day. Only 00:xx is remapped.
pub const MIDNIGHT_REMAP_HOUR: u32 = 24;

/// Parsed times below this many minutes are treated as absent
pub const MIN_VALID_MINUTES: f64 = 1.0;

/// Number of leading characters holding the hour in a clock code
pub const CLOCK_HOUR_WIDTH: usize = 2;

/// Highest hour accepted in a route time scope
pub const MAX_SCOPE_HOUR: u32 = 23;

// =============================================================================
// Time Text Normalisation
// =============================================================================

/// Fraction glyphs seen at the end of feed time text, with their decimal
/// replacements. Mis-decoded forms come first so they are replaced whole.
pub const FRACTION_GLYPHS: &[(&str, &str)] = &[
    ("Â½", ".5"),
    ("Â¼", ".25"),
    ("Â¾", ".75"),
    ("½", ".5"),
    ("¼", ".25"),
    ("¾", ".75"),
];

// =============================================================================
// Feed Endpoints
// =============================================================================

/// Journey-search API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.rtt.io/api/v1/json/search";

/// Environment variable holding the API authorization token
pub const API_KEY_ENV: &str = "API_KEY";

/// Results page base URL for the markup feed
pub const DEFAULT_MARKUP_BASE_URL: &str = "https://www.realtimetrains.co.uk/search/detailed/gb-nr";

/// Time window requested from the results page
pub const DEFAULT_MARKUP_WINDOW: &str = "0800-2000";

/// Query string appended to results page requests
pub const MARKUP_QUERY: &str = "stp=WVS&show=all&order=actual";

/// Default HTTP request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Markup selectors for the results page
pub mod selectors {
    /// Container of the listed services
    pub const SERVICE_LIST: &str = "div.servicelist";

    /// One element per listed service
    pub const SERVICE: &str = "div.servicelist > a.service";

    /// Service origin description
    pub const ORIGIN: &str = "div.location.o";

    /// Service destination description
    pub const DESTINATION: &str = "div.location.d";

    /// Planned (working timetable) arrival
    pub const PLANNED_ARRIVAL: &str = "div.time.plan.a.wtt";

    /// Recorded actual arrival
    pub const ACTUAL_ARRIVAL: &str = "div.time.real.a.act";
}

// =============================================================================
// Files and Defaults
// =============================================================================

/// Default history data file
pub const DEFAULT_DATA_FILE: &str = "data.json";

/// Application directory name under the platform config directory
pub const CONFIG_DIR_NAME: &str = "rail-punctuality";

/// Config file name within the application config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Indentation used for pretty-printed history files
pub const PRETTY_INDENT: &[u8] = b"    ";

/// Default time scope applied to built-in routes (inclusive hours)
pub const DEFAULT_SCOPE_START_HOUR: u32 = 8;
pub const DEFAULT_SCOPE_END_HOUR: u32 = 19;

/// Strict shape of a date argument
pub const DATE_ARGUMENT_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

/// Date format used for arguments, history keys and feed URLs
pub const DATE_FORMAT: &str = "%Y-%m-%d";

//! Daily summary statistics for classified services

use crate::app::models::{ClassifiedService, DailyAnalysis};

impl DailyAnalysis {
    /// Reduce a day's classified services into run and on-time counts and ratios
    pub fn from_services(services: &[ClassifiedService]) -> Self {
        let total_services = services.len();
        let total_ran = services.iter().filter(|service| service.ran).count();
        let total_ontime = services.iter().filter(|service| service.ontime).count();

        Self {
            total_services,
            total_ran,
            total_ontime,
            percent_ran: ratio(total_ran, total_services),
            percent_ontime: ratio(total_ontime, total_services),
        }
    }

    /// Summary line for logging
    pub fn summary(&self) -> String {
        format!(
            "{} services | ran: {} ({}) | on time: {} ({})",
            self.total_services,
            self.total_ran,
            format_ratio(self.percent_ran),
            self.total_ontime,
            format_ratio(self.percent_ontime)
        )
    }
}

fn ratio(count: usize, total: usize) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(count as f64 / total as f64)
    }
}

/// Format a ratio as a percentage, or "-" when there is none
pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(ratio) => format!("{:.1}%", ratio * 100.0),
        None => "-".to_string(),
    }
}

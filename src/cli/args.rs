//! Command-line argument definitions for the rail punctuality tracker
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::FeedSource;
use crate::constants::{DATE_ARGUMENT_PATTERN, DATE_FORMAT};
use crate::{Error, Result};
use chrono::{Days, Local, NaiveDate};
use clap::Parser;
use regex::Regex;
use std::path::PathBuf;

/// CLI arguments for the daily punctuality check
///
/// Retrieves one day's arrivals for each configured station, classifies
/// them as run and on time, and merges the day's statistics into the
/// history file.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "rail-punctuality",
    version,
    about = "Record daily run and on-time rates for monitored rail services",
    long_about = "Retrieves a day's arrivals for each configured station, matches them against \
                  the route definitions, classifies each service as run and on time (less than \
                  five minutes late), and merges the day's statistics into a cumulative JSON \
                  history keyed by station and date. Rerunning a date replaces its entry."
)]
pub struct Args {
    /// Date to check (YYYY-MM-DD)
    ///
    /// Defaults to yesterday, relative to the local date at start-up.
    #[arg(value_name = "DATE")]
    pub date: Option<String>,

    /// Path to configuration file
    ///
    /// JSON configuration file with route definitions and feed settings. If
    /// not specified, looks for ~/.config/rail-punctuality/config.json
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// History data file to update
    #[arg(
        short = 'o',
        long = "data-file",
        value_name = "PATH",
        help = "History data file to update"
    )]
    pub data_file: Option<PathBuf>,

    /// Feed to retrieve services from
    #[arg(
        short = 's',
        long = "source",
        value_enum,
        help = "Feed to retrieve services from"
    )]
    pub source: Option<FeedSource>,

    /// Run the checks without writing the history file
    #[arg(
        long = "dry-run",
        help = "Run the checks without writing the history file"
    )]
    pub dry_run: bool,

    /// Write the history file without indentation
    #[arg(long = "compact", help = "Write the history file without indentation")]
    pub compact: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    /// Validate the arguments for consistency
    ///
    /// The date is checked first, so a malformed date is reported even when
    /// other arguments are also wrong.
    pub fn validate(&self) -> Result<()> {
        if let Some(date) = &self.date {
            parse_date_argument(date)?;
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Date to check: the argument if given, otherwise yesterday
    pub fn resolve_date(&self) -> Result<NaiveDate> {
        match &self.date {
            Some(date) => parse_date_argument(date),
            None => yesterday(Local::now().date_naive()),
        }
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Parse a strict `YYYY-MM-DD` calendar date
///
/// # Errors
/// * Returns `Error::MalformedDate` if the text has another shape or is not a real date
pub fn parse_date_argument(text: &str) -> Result<NaiveDate> {
    let pattern = Regex::new(DATE_ARGUMENT_PATTERN)
        .map_err(|e| Error::configuration(format!("Invalid date pattern: {}", e)))?;

    if !pattern.is_match(text) {
        return Err(Error::malformed_date(text));
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| Error::malformed_date(text))
}

/// The day before `today`
pub fn yesterday(today: NaiveDate) -> Result<NaiveDate> {
    today
        .checked_sub_days(Days::new(1))
        .ok_or_else(|| Error::malformed_date(today.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_date_argument() {
        assert_eq!(
            parse_date_argument("2024-03-11").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );
        assert_eq!(
            parse_date_argument("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_malformed_date_arguments() {
        for text in [
            "2024-3-11",
            "11-03-2024",
            "2024/03/11",
            "2024-03-11T00:00",
            " 2024-03-11",
            "2023-02-29",
            "2024-13-01",
            "yesterday",
            "",
        ] {
            assert!(
                matches!(parse_date_argument(text), Err(Error::MalformedDate { .. })),
                "{} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_yesterday() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            yesterday(today).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );

        let new_year = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(
            yesterday(new_year).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_resolve_date() {
        let args = Args {
            date: Some("2024-03-11".to_string()),
            ..Default::default()
        };
        assert_eq!(
            args.resolve_date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );

        let args = Args::default();
        let expected = Local::now().date_naive().pred_opt().unwrap();
        assert_eq!(args.resolve_date().unwrap(), expected);
    }

    #[test]
    fn test_args_validation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(&config_path, "{}").unwrap();

        let args = Args {
            config_file: Some(config_path),
            date: Some("2024-03-11".to_string()),
            ..Default::default()
        };
        assert!(args.validate().is_ok());

        let mut invalid_args = args.clone();
        invalid_args.config_file = Some(temp_dir.path().join("missing.json"));
        assert!(invalid_args.validate().is_err());

        let mut invalid_args = args.clone();
        invalid_args.date = Some("2024-3-11".to_string());
        assert!(matches!(
            invalid_args.validate(),
            Err(Error::MalformedDate { .. })
        ));

        // A malformed date wins over a missing config file
        invalid_args.config_file = Some(temp_dir.path().join("missing.json"));
        assert!(matches!(
            invalid_args.validate(),
            Err(Error::MalformedDate { .. })
        ));
    }

    #[test]
    fn test_cli_parsing() {
        let args = Args::try_parse_from([
            "rail-punctuality",
            "2024-03-11",
            "--source",
            "markup",
            "--dry-run",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.date.as_deref(), Some("2024-03-11"));
        assert_eq!(args.source, Some(FeedSource::Markup));
        assert!(args.dry_run);
        assert_eq!(args.verbose, 2);

        assert!(Args::try_parse_from(["rail-punctuality", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = Args::default();

        // Default level
        assert_eq!(args.get_log_level(), "warn");

        // Verbose levels
        args.verbose = 1;
        assert_eq!(args.get_log_level(), "info");

        args.verbose = 2;
        assert_eq!(args.get_log_level(), "debug");

        args.verbose = 3;
        assert_eq!(args.get_log_level(), "trace");

        // Quiet mode
        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
        assert!(!args.show_progress());
    }
}

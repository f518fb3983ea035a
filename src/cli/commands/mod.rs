//! Command implementations for the rail punctuality CLI
//!
//! This module contains the command execution logic, logging setup and
//! final report generation for the CLI interface.

pub mod check;
pub mod shared;

pub use crate::app::services::route_checker::CheckStats;

use crate::Result;
use crate::cli::args::Args;

/// Main command runner
///
/// Runs the daily check for the date given on the command line (or
/// yesterday) across all configured routes.
pub async fn run(args: Args) -> Result<CheckStats> {
    check::run_check(args).await
}

//! Check command implementation
//!
//! This module contains the daily check workflow: configuration loading,
//! date resolution, running every route through the pipeline, saving the
//! history and reporting the outcome.

use super::shared::{create_progress_bar, load_configuration, setup_logging};
use crate::Result;
use crate::app::adapters::feed::FeedClient;
use crate::app::services::history_store::HistoryStore;
use crate::app::services::route_checker::{CheckStats, RouteChecker};
use crate::cli::args::Args;
use chrono::NaiveDate;
use colored::Colorize;
use indicatif::HumanDuration;
use std::path::Path;
use tracing::{debug, info, warn};

/// Check command runner
///
/// This function orchestrates the daily run:
/// 1. Set up logging and resolve the date (a malformed date stops here)
/// 2. Load and validate configuration, build the configured feed
/// 3. Load the history, check every route, merge results
/// 4. Save the history (unless dry run) and print a summary
pub async fn run_check(args: Args) -> Result<CheckStats> {
    setup_logging(&args)?;

    info!("Starting punctuality check");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let date = args.resolve_date()?;
    info!("Using date: {}", date);

    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config.routes);

    let feed = FeedClient::from_config(&config.feed)?;
    info!("Retrieving services from the {} feed", feed.source_name());

    let mut store =
        HistoryStore::load(&config.data_file)?.with_pretty(config.output.pretty);

    let progress = args
        .show_progress()
        .then(|| create_progress_bar(config.routes.len() as u64, "Checking routes"));

    let checker = RouteChecker::new(&config.routes, &feed);
    let stats = checker.check_all(date, &mut store, progress.as_ref()).await?;

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let saved_to = if args.dry_run {
        info!("Dry run - history file not written");
        None
    } else {
        Some(store.save()?)
    };

    if !stats.all_succeeded() {
        warn!(
            "{} of {} routes could not be checked",
            stats.routes_failed.len(),
            stats.routes_configured
        );
    }

    if !args.quiet {
        print_report(date, &stats, saved_to.as_deref());
    }

    Ok(stats)
}

/// Print a human-readable summary of the run
fn print_report(date: NaiveDate, stats: &CheckStats, saved_to: Option<&Path>) {
    println!();
    println!(
        "{} {}",
        "Punctuality check complete for".bold(),
        date.to_string().bold()
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   • Routes checked: {}", stats.routes_configured);
    for station in &stats.routes_succeeded {
        println!("   • {} recorded", station.green());
    }
    for (station, reason) in &stats.routes_failed {
        println!("   • {} {}", station.red(), reason);
    }
    println!("   • Services recorded: {}", stats.services_recorded);
    println!(
        "   • Processing time: {}",
        HumanDuration(stats.processing_time)
    );

    match saved_to {
        Some(path) => println!("   • History saved to {}", path.display()),
        None => println!("   • {}", "Dry run: history not saved".yellow()),
    }
    println!();
}

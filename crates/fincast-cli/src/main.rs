//! Fincast CLI - Personal finance analytics
//!
//! Usage:
//!   fincast report --file tx.csv          Dashboard for a transaction file
//!   fincast project -c 5000 -m 12         SIP future value
//!   fincast twins -s 20000 -e 30000       Spending scenarios
//!   fincast rescale -b 30000 -r 6000 -n 45000
//!   fincast health -f 60000 -a 20000      Emergency fund coverage

mod cli;
mod commands;
mod loader;


use anyhow::{Context, Result};
use clap::Parser;
use fincast_core::{AnalyticsConfig, AnalyticsEngine};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let (config, source) =
        AnalyticsConfig::load(cli.config.as_deref()).context("Failed to load analytics config")?;
    debug!(%source, "Analytics config loaded");
    let engine = AnalyticsEngine::new(config);

    match cli.command {
        Commands::Report {
            file,
            profile,
            goals,
            as_of,
            json,
        } => commands::cmd_report(
            &engine,
            &file,
            profile.as_deref(),
            goals.as_deref(),
            as_of.as_deref(),
            json,
        ),
        Commands::Project {
            contribution,
            months,
            rate,
            json,
        } => commands::cmd_project(&engine, contribution, months, rate, json),
        Commands::Twins {
            surplus,
            expense,
            delta,
            json,
        } => commands::cmd_twins(&engine, surplus, expense, delta, json),
        Commands::Rescale {
            baseline,
            recommendation,
            new_baseline,
            default_ratio,
            json,
        } => commands::cmd_rescale(
            &engine,
            baseline,
            &recommendation,
            new_baseline,
            default_ratio,
            json,
        ),
        Commands::Health {
            fund,
            avg_expense,
            months,
            json,
        } => commands::cmd_health(&engine, fund, avg_expense, months, json),
        Commands::Config => commands::cmd_config(&engine, &source),
    }
}

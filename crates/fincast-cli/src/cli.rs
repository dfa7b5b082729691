//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fincast - Personal finance analytics and projections
#[derive(Parser)]
#[command(name = "fincast")]
#[command(about = "Spending analytics, health bands and savings projections", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Analytics config file (defaults to the user config, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full dashboard report for a transaction file
    Report {
        /// Transactions as CSV (id,date,type,amount,category,merchant) or JSON
        #[arg(short, long)]
        file: PathBuf,

        /// Financial profile JSON
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Goals JSON (array)
        #[arg(long)]
        goals: Option<PathBuf>,

        /// Reference date (YYYY-MM-DD, default: today)
        #[arg(long)]
        as_of: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Project the future value of a monthly contribution
    Project {
        /// Amount invested every month
        #[arg(short, long)]
        contribution: f64,

        /// Number of monthly contributions
        #[arg(short, long)]
        months: u32,

        /// Expected annual return in percent (default from config)
        #[arg(short, long)]
        rate: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare optimistic, current and pessimistic spending scenarios
    Twins {
        /// Current monthly surplus
        #[arg(short, long, allow_hyphen_values = true)]
        surplus: f64,

        /// Current monthly expense
        #[arg(short, long)]
        expense: f64,

        /// Expense change in percent (default from config)
        #[arg(short, long)]
        delta: Option<f64>,

        /// Print the scenarios as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rescale a recommendation to a new income baseline
    Rescale {
        /// Baseline the recommendation was computed against
        #[arg(short, long)]
        baseline: f64,

        /// The recommendation, as a number or advisor text ("Invest 6,000 monthly")
        #[arg(short, long)]
        recommendation: String,

        /// New baseline to scale to
        #[arg(short, long, allow_hyphen_values = true)]
        new_baseline: f64,

        /// Ratio used when the baseline is zero (default from config)
        #[arg(long)]
        default_ratio: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Emergency fund coverage
    Health {
        /// Current emergency fund balance
        #[arg(short, long)]
        fund: f64,

        /// Average monthly expense
        #[arg(short, long)]
        avg_expense: f64,

        /// Months of expenses to cover (default from config)
        #[arg(short, long)]
        months: Option<f64>,

        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the active analytics configuration
    Config,
}

//! Fincast Core Library
//!
//! Financial analytics and projection for personal-finance data:
//! - Day and month aggregation with dense zero-filled series
//! - Category and merchant breakdowns
//! - Year-over-year comparison
//! - Spending spikes and heat-map intensity
//! - Savings, emergency fund and budget health bands
//! - Compounding contribution and linear scenario projections
//! - Proportional rescaling of external recommendations
//!
//! The library is pure: callers load transactions, goals and the profile, and
//! receive plain result structures back. Only configuration is read from disk.

pub mod analytics;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;

pub use analytics::*;
pub use config::{
    default_config_path, parse_config, AnalyticsConfig, ConfigSource, MAX_TREND_MONTHS,
};
pub use engine::{AnalyticsEngine, DashboardReport};
pub use error::{Error, Result};
pub use models::{
    parse_timestamp, FinancialProfile, Goal, GoalPriority, GoalStatus, RiskLevel, Snapshot,
    Transaction, TransactionRecord, TransactionType,
};

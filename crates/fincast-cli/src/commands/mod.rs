//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `config` - Show the active analytics configuration
//! - `health` - Emergency fund coverage
//! - `project` - Compounding contribution projection
//! - `report` - Full dashboard for a transaction file
//! - `rescale` - Proportional recommendation rescaling
//! - `twins` - Linear spending scenarios

pub mod config;
pub mod health;
pub mod project;
pub mod report;
pub mod rescale;
pub mod twins;

// Re-export command functions for main.rs
pub use config::*;
pub use health::*;
pub use project::*;
pub use report::*;
pub use rescale::*;
pub use twins::*;

use anyhow::Result;
use fincast_core::round_currency;
use serde::Serialize;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Whole-unit amount for display
pub fn money(value: f64) -> String {
    // + 0.0 turns -0 into 0
    format!("{:.0}", round_currency(value) + 0.0)
}

/// Pretty-print any serializable result
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

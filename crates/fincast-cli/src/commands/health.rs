//! Emergency fund health command

use anyhow::Result;
use fincast_core::{emergency_fund_status, AnalyticsEngine};

use super::{money, print_json};

pub fn cmd_health(
    engine: &AnalyticsEngine,
    fund: f64,
    avg_expense: f64,
    months: Option<f64>,
    json: bool,
) -> Result<()> {
    let months = months.unwrap_or(engine.config().emergency_months);
    if !months.is_finite() || months <= 0.0 {
        anyhow::bail!("--months must be positive (got {})", months);
    }
    let status = emergency_fund_status(fund, avg_expense, months);

    if json {
        return print_json(&status);
    }

    println!();
    println!("💰 Emergency Fund");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Balance:        {:>12}", money(fund));
    println!(
        "   Target:         {:>12} ({} months of {})",
        money(status.recommended_amount),
        months,
        money(avg_expense)
    );
    println!("   Months covered: {:>12.1}", status.months_covered);
    println!("   Still needed:   {:>12.1} months", status.months_needed);
    println!("   Progress:       {:>11.0}%", status.progress_percent);
    println!("   Status:         {:>12}", status.band.as_str());

    Ok(())
}

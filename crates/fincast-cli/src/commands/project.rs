//! Contribution projection command

use anyhow::{Context, Result};
use fincast_core::{project_contributions, AnalyticsEngine, ProjectionInput};

use super::{money, print_json};

pub fn cmd_project(
    engine: &AnalyticsEngine,
    contribution: f64,
    months: u32,
    rate: Option<f64>,
    json: bool,
) -> Result<()> {
    let rate = rate.unwrap_or(engine.config().annual_rate_percent);
    let input = ProjectionInput::new(contribution, months, rate).context("Invalid projection")?;
    let result = project_contributions(&input);

    if json {
        return print_json(&result);
    }

    let shown = result.rounded();
    println!();
    println!("📈 Contribution Projection");
    println!(
        "   {} per month for {} months at {}% a year",
        money(contribution),
        months,
        rate
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Invested:      {:>12}", money(shown.total_contributed));
    println!("   Future value:  {:>12}", money(shown.future_value));
    println!("   Gain:          {:>12}", money(shown.gain()));

    Ok(())
}

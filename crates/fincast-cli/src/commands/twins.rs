//! Spending twins command

use anyhow::{Context, Result};
use fincast_core::{spending_twins, AnalyticsEngine, ScenarioBaseline};

use super::{money, print_json};

pub fn cmd_twins(
    engine: &AnalyticsEngine,
    surplus: f64,
    expense: f64,
    delta_percent: Option<f64>,
    json: bool,
) -> Result<()> {
    let config = engine.config();
    let delta_percent = delta_percent.unwrap_or(config.twin_delta_percent);
    let baseline = ScenarioBaseline { surplus, expense };
    let twins = spending_twins(baseline, delta_percent / 100.0, &config.horizons)
        .context("Invalid scenario")?;

    if json {
        return print_json(&twins);
    }

    println!();
    println!("👯 Spending Twins");
    println!(
        "   Income {} with expenses {} ± {}%",
        money(baseline.income()),
        money(expense),
        delta_percent
    );
    println!("   ─────────────────────────────────────────────────────────────");

    for scenario in &twins {
        println!(
            "   {:12} expense {:>10}  surplus {:>10}",
            scenario.label,
            money(scenario.expense),
            money(scenario.surplus)
        );
        for estimate in &scenario.estimates {
            println!(
                "      after {:>3} months: {:>12}",
                estimate.months,
                money(estimate.net_worth)
            );
        }
    }

    Ok(())
}

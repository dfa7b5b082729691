//! Recommendation rescaling command

use anyhow::{Context, Result};
use fincast_core::{AnalyticsEngine, ProportionalRescaler, TextRecommendation};

use super::{money, print_json};

pub fn cmd_rescale(
    engine: &AnalyticsEngine,
    baseline: f64,
    recommendation: &str,
    new_baseline: f64,
    default_ratio: Option<f64>,
    json: bool,
) -> Result<()> {
    let rescaler =
        ProportionalRescaler::new(default_ratio.unwrap_or(engine.config().default_ratio));
    // Plain numbers parse the same way as advisor text
    let source = TextRecommendation(recommendation.to_string());
    let rescaled = rescaler
        .rescale_from(&source, baseline, new_baseline)
        .context("Failed to rescale recommendation")?;

    if json {
        return print_json(&rescaled);
    }

    println!();
    println!("⚖️  Rescaled Recommendation");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Original baseline:  {:>12}", money(baseline));
    println!("   New baseline:       {:>12}", money(new_baseline));
    println!(
        "   Ratio:              {:>12.4}{}",
        rescaled.ratio,
        if rescaled.used_default_ratio {
            " (default)"
        } else {
            ""
        }
    );
    println!(
        "   Recommendation:     {:>12}",
        money(rescaled.rescaled_recommendation)
    );

    Ok(())
}

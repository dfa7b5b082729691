//! Config display command

use anyhow::Result;
use fincast_core::{default_config_path, AnalyticsEngine, ConfigSource};

pub fn cmd_config(engine: &AnalyticsEngine, source: &ConfigSource) -> Result<()> {
    let config = engine.config();

    println!();
    println!("⚙️  Analytics Config");
    println!("   Source: {}", source);
    if let Some(path) = default_config_path() {
        println!("   Override path: {}", path.display());
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Spike:          > {}x the trailing {}-month average",
        config.spike_multiple, config.spike_window
    );
    println!("   Emergency fund: {} months", config.emergency_months);
    println!("   Annual rate:    {}%", config.annual_rate_percent);
    println!("   Twin delta:     ±{}%", config.twin_delta_percent);
    let horizons: Vec<String> = config.horizons.iter().map(|h| h.to_string()).collect();
    println!("   Horizons:       {} months", horizons.join(", "));
    println!("   Default ratio:  {}", config.default_ratio);
    println!("   Trend months:   {}", config.trend_months);
    println!("   Top categories: {}", config.top_categories);
    println!(
        "   Repeat merchant threshold: {} charges",
        config.repeated_merchant_min_count
    );
    println!("   Goal highlights: {}", config.goal_highlight_count);

    Ok(())
}

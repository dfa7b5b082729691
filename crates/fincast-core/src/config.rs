//! Analytics configuration
//!
//! Resolution order:
//! 1. An explicit path passed by the caller
//! 2. `<data_local_dir>/fincast/config/analytics.toml` when it exists
//! 3. The defaults embedded at build time from `config/analytics.toml`
//!
//! Every key is optional; omitted keys keep their default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analytics::anomaly::SpikeParams;
use crate::analytics::rescale::DEFAULT_RECOMMENDATION_RATIO;
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analytics.toml");

/// Longest dashboard trend window (a century of months)
pub const MAX_TREND_MONTHS: u32 = 1200;

/// Tunable analytics parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsConfig {
    pub spike_multiple: f64,
    pub spike_window: usize,
    pub emergency_months: f64,
    pub annual_rate_percent: f64,
    pub twin_delta_percent: f64,
    pub horizons: Vec<u32>,
    pub default_ratio: f64,
    pub trend_months: u32,
    pub top_categories: usize,
    pub repeated_merchant_min_count: usize,
    pub goal_highlight_count: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        let spike = SpikeParams::default();
        Self {
            spike_multiple: spike.multiple,
            spike_window: spike.window,
            emergency_months: 6.0,
            annual_rate_percent: 12.0,
            twin_delta_percent: 10.0,
            horizons: vec![12, 36, 60],
            default_ratio: DEFAULT_RECOMMENDATION_RATIO,
            trend_months: 12,
            top_categories: 10,
            repeated_merchant_min_count: 3,
            goal_highlight_count: 3,
        }
    }
}

impl AnalyticsConfig {
    pub fn spike_params(&self) -> SpikeParams {
        SpikeParams {
            multiple: self.spike_multiple,
            window: self.spike_window,
        }
    }

    /// Twin expense delta as a fraction
    pub fn twin_delta(&self) -> f64 {
        self.twin_delta_percent / 100.0
    }

    /// Load using the standard resolution order
    pub fn load(override_path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let path = match override_path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => default_config_path().filter(|p| p.exists()),
        };

        match path {
            Some(path) => {
                debug!("Loading analytics config from {}", path.display());
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Ok((parse_config(&content)?, ConfigSource::File(path)))
            }
            None => {
                debug!("Using embedded analytics config");
                Ok((parse_config(DEFAULT_CONFIG)?, ConfigSource::Embedded))
            }
        }
    }
}

/// Where a loaded config came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Embedded,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Embedded => write!(f, "built-in defaults"),
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("fincast").join("config").join("analytics.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    anomaly: Option<RawAnomaly>,
    health: Option<RawHealth>,
    projection: Option<RawProjection>,
    recommendation: Option<RawRecommendation>,
    dashboard: Option<RawDashboard>,
}

#[derive(Debug, Deserialize)]
struct RawAnomaly {
    spike_multiple: Option<f64>,
    spike_window: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawHealth {
    emergency_months: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawProjection {
    annual_rate_percent: Option<f64>,
    twin_delta_percent: Option<f64>,
    horizons: Option<Vec<u32>>,
}

#[derive(Debug, Deserialize)]
struct RawRecommendation {
    default_ratio: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawDashboard {
    trend_months: Option<u32>,
    top_categories: Option<usize>,
    repeated_merchant_min_count: Option<usize>,
    goal_highlight_count: Option<usize>,
}

/// Parse config from TOML content
pub fn parse_config(content: &str) -> Result<AnalyticsConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalyticsConfig::default();

    if let Some(anomaly) = raw.anomaly {
        if let Some(multiple) = anomaly.spike_multiple {
            config.spike_multiple = multiple;
        }
        if let Some(window) = anomaly.spike_window {
            config.spike_window = window;
        }
    }

    if let Some(months) = raw.health.and_then(|h| h.emergency_months) {
        config.emergency_months = months;
    }

    if let Some(projection) = raw.projection {
        if let Some(rate) = projection.annual_rate_percent {
            config.annual_rate_percent = rate;
        }
        if let Some(delta) = projection.twin_delta_percent {
            config.twin_delta_percent = delta;
        }
        if let Some(horizons) = projection.horizons {
            config.horizons = horizons;
        }
    }

    if let Some(ratio) = raw.recommendation.and_then(|r| r.default_ratio) {
        config.default_ratio = ratio;
    }

    if let Some(dashboard) = raw.dashboard {
        if let Some(months) = dashboard.trend_months {
            config.trend_months = months;
        }
        if let Some(n) = dashboard.top_categories {
            config.top_categories = n;
        }
        if let Some(n) = dashboard.repeated_merchant_min_count {
            config.repeated_merchant_min_count = n;
        }
        if let Some(n) = dashboard.goal_highlight_count {
            config.goal_highlight_count = n;
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &AnalyticsConfig) -> Result<()> {
    let invalid = |msg: String| -> Result<()> { Err(Error::Config(msg)) };

    if !config.spike_multiple.is_finite() || config.spike_multiple <= 0.0 {
        return invalid(format!(
            "anomaly.spike_multiple must be positive (got {})",
            config.spike_multiple
        ));
    }
    if config.spike_window == 0 {
        return invalid("anomaly.spike_window must be at least 1".into());
    }
    if !config.emergency_months.is_finite() || config.emergency_months <= 0.0 {
        return invalid(format!(
            "health.emergency_months must be positive (got {})",
            config.emergency_months
        ));
    }
    if !config.annual_rate_percent.is_finite() || config.annual_rate_percent < 0.0 {
        return invalid(format!(
            "projection.annual_rate_percent must not be negative (got {})",
            config.annual_rate_percent
        ));
    }
    if !config.twin_delta_percent.is_finite()
        || config.twin_delta_percent < 0.0
        || config.twin_delta_percent >= 100.0
    {
        return invalid(format!(
            "projection.twin_delta_percent must be in [0, 100) (got {})",
            config.twin_delta_percent
        ));
    }
    if !config.default_ratio.is_finite() || config.default_ratio < 0.0 {
        return invalid(format!(
            "recommendation.default_ratio must not be negative (got {})",
            config.default_ratio
        ));
    }
    if config.trend_months == 0 || config.trend_months > MAX_TREND_MONTHS {
        return invalid(format!(
            "dashboard.trend_months must be between 1 and {} (got {})",
            MAX_TREND_MONTHS, config.trend_months
        ));
    }
    Ok(())
}

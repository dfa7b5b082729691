//! Financial health bands
//!
//! Maps continuous ratios onto ordered qualitative bands. Every threshold is
//! an inclusive lower bound: a value sitting exactly on a boundary belongs to
//! the higher band.

use serde::{Deserialize, Serialize};

/// Savings rate at or above which the rate is excellent (percent)
pub const SAVINGS_EXCELLENT_PERCENT: f64 = 30.0;
/// Savings rate at or above which the rate is good (percent)
pub const SAVINGS_GOOD_PERCENT: f64 = 15.0;
/// Fraction of the recommended months that counts as "building"
pub const EMERGENCY_BUILDING_FRACTION: f64 = 0.5;
/// Budget usage at or above which a warning is raised (percent)
pub const BUDGET_WARNING_PERCENT: f64 = 70.0;

/// Savings rate classification, ordered worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsBand {
    NeedsImprovement,
    Good,
    Excellent,
}

impl SavingsBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeedsImprovement => "needs_improvement",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }
}

impl std::fmt::Display for SavingsBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Emergency fund coverage classification, ordered worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyBand {
    AtRisk,
    Building,
    Healthy,
}

impl EmergencyBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AtRisk => "at_risk",
            Self::Building => "building",
            Self::Healthy => "healthy",
        }
    }
}

impl std::fmt::Display for EmergencyBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Budget usage classification, ordered least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetBand {
    OnTrack,
    Warning,
    Exceeded,
}

impl BudgetBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "on_track",
            Self::Warning => "warning",
            Self::Exceeded => "exceeded",
        }
    }
}

impl std::fmt::Display for BudgetBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Surplus as a percentage of income, 0 when there is no income
pub fn savings_rate_percent(income: f64, expense: f64) -> f64 {
    if income > 0.0 {
        (income - expense) * 100.0 / income
    } else {
        0.0
    }
}

pub fn classify_savings_rate(rate_percent: f64) -> SavingsBand {
    if rate_percent >= SAVINGS_EXCELLENT_PERCENT {
        SavingsBand::Excellent
    } else if rate_percent >= SAVINGS_GOOD_PERCENT {
        SavingsBand::Good
    } else {
        SavingsBand::NeedsImprovement
    }
}

pub fn classify_emergency_coverage(months_covered: f64, recommended_months: f64) -> EmergencyBand {
    if months_covered >= recommended_months {
        EmergencyBand::Healthy
    } else if months_covered >= recommended_months * EMERGENCY_BUILDING_FRACTION {
        EmergencyBand::Building
    } else {
        EmergencyBand::AtRisk
    }
}

/// Emergency fund coverage with the figures shown next to the band
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmergencyFundStatus {
    pub months_covered: f64,
    pub months_needed: f64,
    /// 0-100
    pub progress_percent: f64,
    pub recommended_amount: f64,
    pub band: EmergencyBand,
}

pub fn emergency_fund_status(
    current_fund: f64,
    avg_monthly_expense: f64,
    recommended_months: f64,
) -> EmergencyFundStatus {
    let recommended_amount = avg_monthly_expense * recommended_months;
    let months_covered = if avg_monthly_expense > 0.0 {
        current_fund / avg_monthly_expense
    } else {
        0.0
    };
    let progress_percent = if recommended_amount > 0.0 {
        (current_fund * 100.0 / recommended_amount).min(100.0)
    } else {
        0.0
    };

    EmergencyFundStatus {
        months_covered,
        months_needed: (recommended_months - months_covered).max(0.0),
        progress_percent,
        recommended_amount,
        band: classify_emergency_coverage(months_covered, recommended_months),
    }
}

/// Spend against a budget limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub spent: f64,
    pub limit: f64,
    /// 0-100, capped
    pub percent_used: f64,
    pub band: BudgetBand,
}

pub fn budget_status(spent: f64, limit: f64) -> BudgetStatus {
    let percent_used = if limit > 0.0 {
        (spent * 100.0 / limit).min(100.0)
    } else if spent > 0.0 {
        100.0
    } else {
        0.0
    };

    let band = if percent_used >= 100.0 {
        BudgetBand::Exceeded
    } else if percent_used >= BUDGET_WARNING_PERCENT {
        BudgetBand::Warning
    } else {
        BudgetBand::OnTrack
    };

    BudgetStatus {
        spent,
        limit,
        percent_used,
        band,
    }
}

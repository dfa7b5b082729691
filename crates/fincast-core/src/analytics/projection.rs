//! Forward-looking projections
//!
//! Two deliberately different algorithms live here:
//! - [`project_contributions`] compounds a recurring monthly contribution
//!   (annuity future value, SIP style)
//! - [`project_scenario`] multiplies a monthly surplus linearly over each
//!   horizon, with no compounding
//!
//! Results keep full precision. Round with [`round_currency`] or
//! [`ProjectionResult::rounded`] only when presenting.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::{ensure_amount, ensure_finite, Error, Result};
use crate::models::Goal;

/// Validated input for a compounding contribution projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionInput {
    monthly_contribution: f64,
    months: u32,
    annual_rate_percent: f64,
}

impl ProjectionInput {
    pub fn new(monthly_contribution: f64, months: u32, annual_rate_percent: f64) -> Result<Self> {
        let monthly_contribution = ensure_amount("monthly contribution", monthly_contribution)?;
        let annual_rate_percent = ensure_amount("annual rate", annual_rate_percent)?;
        if months == 0 {
            return Err(Error::InvalidNumericInput(
                "months must be greater than zero".into(),
            ));
        }
        Ok(Self {
            monthly_contribution,
            months,
            annual_rate_percent,
        })
    }

    pub fn monthly_contribution(&self) -> f64 {
        self.monthly_contribution
    }

    pub fn months(&self) -> u32 {
        self.months
    }

    pub fn annual_rate_percent(&self) -> f64 {
        self.annual_rate_percent
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / 12.0
    }
}

/// Outcome of a compounding projection; `gain` is derived
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionResult {
    pub future_value: f64,
    pub total_contributed: f64,
}

impl ProjectionResult {
    pub fn gain(&self) -> f64 {
        self.future_value - self.total_contributed
    }

    /// Copy with every monetary field rounded to a whole currency unit
    pub fn rounded(&self) -> Self {
        Self {
            future_value: round_currency(self.future_value),
            total_contributed: round_currency(self.total_contributed),
        }
    }
}

impl Serialize for ProjectionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ProjectionResult", 3)?;
        s.serialize_field("future_value", &self.future_value)?;
        s.serialize_field("total_contributed", &self.total_contributed)?;
        s.serialize_field("gain", &self.gain())?;
        s.end()
    }
}

/// Future value of `monthly_contribution` paid every month for `months`
///
/// `fv = c * ((1 + r)^n - 1) / r` with `r = annual / 100 / 12`, falling back
/// to `c * n` when the rate is zero.
pub fn project_contributions(input: &ProjectionInput) -> ProjectionResult {
    let contribution = input.monthly_contribution;
    let months = f64::from(input.months);
    let total_contributed = contribution * months;

    let r = input.monthly_rate();
    let future_value = if r == 0.0 {
        total_contributed
    } else {
        contribution * ((1.0 + r).powf(months) - 1.0) / r
    };

    ProjectionResult {
        future_value,
        total_contributed,
    }
}

/// Round to the nearest whole currency unit, halves away from zero
pub fn round_currency(value: f64) -> f64 {
    value.round()
}

/// Current monthly position a scenario is derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioBaseline {
    pub surplus: f64,
    pub expense: f64,
}

impl ScenarioBaseline {
    pub fn income(&self) -> f64 {
        self.surplus + self.expense
    }
}

/// Linear net-worth estimate at one horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizonEstimate {
    pub months: u32,
    pub net_worth: f64,
}

/// Baseline with expenses scaled by `delta`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub label: String,
    /// Fractional expense change, e.g. -0.1 for ten percent less
    pub delta: f64,
    pub expense: f64,
    pub surplus: f64,
    pub estimates: Vec<HorizonEstimate>,
}

pub const OPTIMISTIC_LABEL: &str = "optimistic";
pub const CURRENT_LABEL: &str = "current";
pub const PESSIMISTIC_LABEL: &str = "pessimistic";

/// Linear projection of the baseline with expenses changed by `delta`
pub fn project_scenario(
    baseline: ScenarioBaseline,
    delta: f64,
    horizons: &[u32],
    label: impl Into<String>,
) -> Result<Scenario> {
    let expense = ensure_amount("baseline expense", baseline.expense)?;
    ensure_finite("baseline surplus", baseline.surplus)?;
    let delta = ensure_finite("expense delta", delta)?;
    if delta <= -1.0 {
        return Err(Error::InvalidNumericInput(format!(
            "expense delta must be greater than -1 (got {})",
            delta
        )));
    }

    let scenario_expense = expense * (1.0 + delta);
    let scenario_surplus = baseline.income() - scenario_expense;

    Ok(Scenario {
        label: label.into(),
        delta,
        expense: scenario_expense,
        surplus: scenario_surplus,
        estimates: horizons
            .iter()
            .map(|&months| HorizonEstimate {
                months,
                net_worth: scenario_surplus * f64::from(months),
            })
            .collect(),
    })
}

/// Optimistic (-delta), current and pessimistic (+delta) scenarios
pub fn spending_twins(
    baseline: ScenarioBaseline,
    delta: f64,
    horizons: &[u32],
) -> Result<Vec<Scenario>> {
    let delta = ensure_finite("expense delta", delta)?.abs();
    Ok(vec![
        project_scenario(baseline, -delta, horizons, OPTIMISTIC_LABEL)?,
        project_scenario(baseline, 0.0, horizons, CURRENT_LABEL)?,
        project_scenario(baseline, delta, horizons, PESSIMISTIC_LABEL)?,
    ])
}

/// Share of the goal target covered by planned contributions, capped at 100
pub fn goal_progress_percent(goal: &Goal) -> f64 {
    let planned = goal.monthly_contribution * f64::from(goal.expected_months);
    if goal.target_amount <= 0.0 || planned <= 0.0 || !planned.is_finite() {
        return 0.0;
    }
    (planned * 100.0 / goal.target_amount).min(100.0)
}

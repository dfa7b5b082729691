//! Spending anomalies and heat-map intensity
//!
//! Two independent signals:
//! - Spikes: a category's monthly spend exceeding a multiple of its own
//!   trailing average
//! - Intensity bands: a month's total spend relative to the average month

use std::collections::{BTreeMap, HashMap};

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_amount, Result};
use crate::models::Transaction;

use super::buckets::{first_of_month, Granularity, MonthlyAggregate};
use super::categories::{normalize_label, LabelBook};
use super::periods::percent_change;

/// Minimum number of earlier periods a category needs before it can spike
pub const MIN_BASELINE_PERIODS: usize = 2;

/// Heat-map intensity thresholds (half-open, lower bound inclusive)
pub const INTENSITY_NORMAL: f64 = 0.8;
pub const INTENSITY_HIGH: f64 = 1.2;
pub const INTENSITY_VERY_HIGH: f64 = 1.5;

/// Expense total for one category in one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMonthTotal {
    /// First day of the month
    pub period: NaiveDate,
    pub category: String,
    pub amount: f64,
}

impl CategoryMonthTotal {
    pub fn key(&self) -> String {
        Granularity::Month.key(self.period)
    }
}

/// Spike detection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeParams {
    /// Flag when amount > multiple x trailing average
    pub multiple: f64,
    /// Maximum number of preceding periods in the trailing average
    pub window: usize,
}

impl Default for SpikeParams {
    fn default() -> Self {
        Self {
            multiple: 1.5,
            window: 3,
        }
    }
}

/// A category month that exceeded its baseline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spike {
    /// `YYYY-MM`
    pub period: String,
    pub category: String,
    pub amount: f64,
    /// Trailing average the amount was compared against
    pub baseline: f64,
    /// amount / baseline
    pub ratio: f64,
}

/// Heat-map band, ordered coolest to hottest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityBand {
    Low,
    Normal,
    High,
    VeryHigh,
}

impl IntensityBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }

    /// Band for a raw intensity ratio; non-finite ratios are `Low`
    pub fn from_intensity(intensity: f64) -> Self {
        if !intensity.is_finite() || intensity < INTENSITY_NORMAL {
            Self::Low
        } else if intensity < INTENSITY_HIGH {
            Self::Normal
        } else if intensity < INTENSITY_VERY_HIGH {
            Self::High
        } else {
            Self::VeryHigh
        }
    }
}

impl std::fmt::Display for IntensityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One cell of the monthly spending heat map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatCell {
    pub period: String,
    pub expense: f64,
    /// expense / average monthly expense
    pub intensity: f64,
    pub band: IntensityBand,
}

/// Largest month-over-month increase in a category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryChange {
    pub category: String,
    pub current: f64,
    pub previous: f64,
    pub change_percent: f64,
}

/// Expense totals per (month, category), ordered by month then category
///
/// Category labels are normalized across the whole input so a category keeps
/// the same label in every month: the spelling of its earliest transaction.
pub fn monthly_category_totals<'a, I>(transactions: I) -> Result<Vec<CategoryMonthTotal>>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut labels = LabelBook::default();
    let mut totals: BTreeMap<(NaiveDate, String), f64> = BTreeMap::new();

    for tx in transactions {
        let amount = ensure_amount(&format!("amount of transaction {}", tx.id), tx.amount)?;
        if !tx.is_expense() {
            continue;
        }
        let key = labels.note(&tx.category, tx);
        *totals.entry((first_of_month(tx.day()), key)).or_insert(0.0) += amount;
    }

    let mut rows: Vec<CategoryMonthTotal> = totals
        .into_iter()
        .map(|((period, key), amount)| CategoryMonthTotal {
            period,
            category: labels.label(&key),
            amount,
        })
        .collect();
    rows.sort_by(|a, b| {
        a.period
            .cmp(&b.period)
            .then_with(|| a.category.cmp(&b.category))
    });
    Ok(rows)
}

/// Flag category months whose amount exceeds `multiple` x the trailing average
///
/// A period needs at least [`MIN_BASELINE_PERIODS`] earlier periods of the same
/// category, and a positive baseline, to be eligible.
pub fn detect_spikes(totals: &[CategoryMonthTotal], params: SpikeParams) -> Vec<Spike> {
    let window = params.window.max(MIN_BASELINE_PERIODS);

    let mut series: BTreeMap<String, Vec<&CategoryMonthTotal>> = BTreeMap::new();
    for total in totals {
        series
            .entry(normalize_label(&total.category))
            .or_default()
            .push(total);
    }

    let mut spikes = Vec::new();
    for entries in series.values_mut() {
        entries.sort_by_key(|t| t.period);

        for i in MIN_BASELINE_PERIODS..entries.len() {
            let prior = &entries[i.saturating_sub(window)..i];
            let baseline = prior.iter().map(|t| t.amount).sum::<f64>() / prior.len() as f64;
            if baseline <= 0.0 {
                continue;
            }

            let current = entries[i];
            if current.amount > params.multiple * baseline {
                spikes.push(Spike {
                    period: current.key(),
                    category: current.category.clone(),
                    amount: current.amount,
                    baseline,
                    ratio: current.amount / baseline,
                });
            }
        }
    }

    spikes.sort_by(|a, b| {
        a.period
            .cmp(&b.period)
            .then_with(|| a.category.cmp(&b.category))
    });
    spikes
}

/// Band for a period's expense against the average expense
///
/// A zero (or negative) average yields `Low` rather than an error.
pub fn classify_intensity(period_expense: f64, average_expense: f64) -> IntensityBand {
    if average_expense > 0.0 {
        IntensityBand::from_intensity(period_expense / average_expense)
    } else {
        IntensityBand::Low
    }
}

/// Intensity of each month against the mean monthly expense of the series
pub fn heat_map(monthly: &[MonthlyAggregate]) -> Vec<HeatCell> {
    if monthly.is_empty() {
        return Vec::new();
    }
    let average = monthly.iter().map(|m| m.expense).sum::<f64>() / monthly.len() as f64;

    monthly
        .iter()
        .map(|m| HeatCell {
            period: m.key.clone(),
            expense: m.expense,
            intensity: if average > 0.0 { m.expense / average } else { 0.0 },
            band: classify_intensity(m.expense, average),
        })
        .collect()
}

/// The category with the largest increase from the previous calendar month
///
/// A category with no spend in the previous month counts as a 100% increase.
pub fn biggest_category_change(
    totals: &[CategoryMonthTotal],
    current_month: NaiveDate,
) -> Option<CategoryChange> {
    let current_start = first_of_month(current_month);
    let previous_start = current_start.checked_sub_months(Months::new(1))?;

    let mut previous: HashMap<String, f64> = HashMap::new();
    for total in totals.iter().filter(|t| t.period == previous_start) {
        *previous.entry(normalize_label(&total.category)).or_insert(0.0) += total.amount;
    }

    let mut current: BTreeMap<String, (String, f64)> = BTreeMap::new();
    for total in totals.iter().filter(|t| t.period == current_start) {
        let entry = current
            .entry(normalize_label(&total.category))
            .or_insert_with(|| (total.category.clone(), 0.0));
        entry.1 += total.amount;
    }

    current
        .into_iter()
        .filter(|(_, (_, amount))| *amount > 0.0)
        .map(|(key, (category, amount))| {
            let prev = previous.get(&key).copied().unwrap_or(0.0);
            let change_percent = if prev > 0.0 {
                percent_change(amount, prev)
            } else {
                100.0
            };
            CategoryChange {
                category,
                current: amount,
                previous: prev,
                change_percent,
            }
        })
        .filter(|c| c.change_percent > 0.0)
        .max_by(|a, b| {
            a.change_percent
                .total_cmp(&b.change_percent)
                .then_with(|| a.current.total_cmp(&b.current))
                .then_with(|| b.category.cmp(&a.category))
        })
}

//! Period comparison: monthly aggregates rolled up into years

use std::collections::BTreeMap;

use serde::Serialize;

use super::buckets::MonthlyAggregate;
use super::health::savings_rate_percent;

/// Average monthly figures for one calendar year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyAggregate {
    pub year: i32,
    /// Number of monthly aggregates present for the year
    pub months: usize,
    pub avg_income: f64,
    pub avg_expense: f64,
    /// 0-100; 0 when the year had no income
    pub savings_rate_percent: f64,
}

/// Difference between two consecutive years present in the data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodChange {
    pub from_year: i32,
    pub to_year: i32,
    /// Savings rate difference in percentage points
    pub savings_rate_change_points: f64,
    /// Percent change of the average monthly expense
    pub avg_expense_change_percent: f64,
}

/// Roll monthly aggregates up into yearly averages, ascending by year
///
/// Averages divide by the number of months present, not by 12, so a year with
/// three months of data averages over those three months.
pub fn compare_by_year(monthly: &[MonthlyAggregate]) -> Vec<YearlyAggregate> {
    let mut years: BTreeMap<i32, (f64, f64, usize)> = BTreeMap::new();
    for month in monthly {
        let entry = years.entry(month.year()).or_insert((0.0, 0.0, 0));
        entry.0 += month.income;
        entry.1 += month.expense;
        entry.2 += 1;
    }

    years
        .into_iter()
        .map(|(year, (income, expense, months))| {
            let avg_income = income / months as f64;
            let avg_expense = expense / months as f64;
            YearlyAggregate {
                year,
                months,
                avg_income,
                avg_expense,
                savings_rate_percent: savings_rate_percent(avg_income, avg_expense),
            }
        })
        .collect()
}

/// Changes between each pair of consecutive entries in `yearly`
pub fn year_over_year(yearly: &[YearlyAggregate]) -> Vec<PeriodChange> {
    yearly
        .windows(2)
        .map(|pair| PeriodChange {
            from_year: pair[0].year,
            to_year: pair[1].year,
            savings_rate_change_points: pair[1].savings_rate_percent - pair[0].savings_rate_percent,
            avg_expense_change_percent: percent_change(pair[1].avg_expense, pair[0].avg_expense),
        })
        .collect()
}

/// Percent change from `previous` to `current`, 0 when `previous` is not positive
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) * 100.0 / previous
    } else {
        0.0
    }
}

//! Analytics engine - assembles every analytics section for one snapshot
//!
//! The engine holds only its configuration. Each dashboard section is
//! produced by the matching function in [`crate::analytics`].

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::analytics::allocation::{
    allocation_breakdown, allocation_snapshot, AllocationSlice, AllocationSnapshot,
};
use crate::analytics::anomaly::{
    biggest_category_change, detect_spikes, heat_map, monthly_category_totals, CategoryChange,
    HeatCell, Spike,
};
use crate::analytics::buckets::{
    aggregate_by_bucket, aggregate_by_bucket_dense, first_of_month, summarize, BucketRange,
    DailyAggregate, Granularity, MonthlyAggregate, PeriodTotals,
};
use crate::analytics::categories::{
    aggregate_by_category_for, repeated_merchants, top_n, CategoryAggregate, MerchantAggregate,
};
use crate::analytics::health::{
    budget_status, classify_savings_rate, emergency_fund_status, BudgetStatus,
    EmergencyFundStatus, SavingsBand,
};
use crate::analytics::periods::{compare_by_year, year_over_year, PeriodChange, YearlyAggregate};
use crate::analytics::projection::{spending_twins, Scenario, ScenarioBaseline};
use crate::config::{AnalyticsConfig, MAX_TREND_MONTHS};
use crate::error::Result;
use crate::models::{Snapshot, Transaction, TransactionType};

/// Slice labels used in the allocation breakdown
pub const EXPENSES_SLICE: &str = "Expenses";
pub const GOALS_SLICE: &str = "Goal contributions";
pub const UNALLOCATED_SLICE: &str = "Unallocated";

/// Every dashboard section for one reference date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub reference: NaiveDate,
    /// Totals from the first of the reference month through the reference date
    pub current_month: PeriodTotals,
    pub savings_band: SavingsBand,
    /// Present when the profile states a monthly budget
    pub budget: Option<BudgetStatus>,
    /// Surplus used for projections: the manual override, else the stated
    /// monthly income less this month's expense, else the current month's
    pub surplus: f64,
    pub daily_trend: Vec<DailyAggregate>,
    pub monthly_trend: Vec<MonthlyAggregate>,
    pub yearly: Vec<YearlyAggregate>,
    pub year_over_year: Vec<PeriodChange>,
    /// One cell per month from the first month with any transaction
    pub heat_map: Vec<HeatCell>,
    pub spikes: Vec<Spike>,
    pub top_categories: Vec<CategoryAggregate>,
    pub repeated_merchants: Vec<MerchantAggregate>,
    pub biggest_category_change: Option<CategoryChange>,
    /// Present when a profile is supplied
    pub emergency_fund: Option<EmergencyFundStatus>,
    pub twins: Vec<Scenario>,
    pub allocation: AllocationSnapshot,
    pub allocation_breakdown: Vec<AllocationSlice>,
}

/// Stateless analytics over caller-supplied snapshots
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Build the dashboard as of `reference`
    ///
    /// Transactions dated after `reference` are ignored. Input order does not
    /// matter; every section sorts what it needs.
    pub fn dashboard(&self, snapshot: &Snapshot, reference: NaiveDate) -> Result<DashboardReport> {
        let config = &self.config;

        // Validate everything up front so a bad amount fails the whole report
        summarize(&snapshot.transactions)?;

        let history: Vec<&Transaction> = snapshot
            .transactions
            .iter()
            .filter(|tx| tx.day() <= reference)
            .collect();
        debug!(
            total = snapshot.transactions.len(),
            considered = history.len(),
            %reference,
            "Building dashboard"
        );

        let month_to_date = BucketRange::new(first_of_month(reference), reference)?;
        // Configs built in code skip validation
        let trend_months = config.trend_months.min(MAX_TREND_MONTHS);
        let trailing = BucketRange::trailing_months(reference, trend_months);

        let current_month = summarize(
            history
                .iter()
                .copied()
                .filter(|tx| month_to_date.contains(tx.day())),
        )?;
        let savings_band = classify_savings_rate(current_month.savings_rate_percent());

        let daily_trend = aggregate_by_bucket_dense(
            history.iter().copied(),
            Granularity::Day,
            Some(month_to_date),
        )?;
        let monthly_trend =
            aggregate_by_bucket_dense(history.iter().copied(), Granularity::Month, Some(trailing))?;

        // Months before the first transaction would dilute every average
        let first_active = history
            .iter()
            .map(|tx| tx.day())
            .filter(|day| trailing.contains(*day))
            .min()
            .map(first_of_month);
        let active_months = active_tail(&monthly_trend, first_active);

        let all_months = aggregate_by_bucket(history.iter().copied(), Granularity::Month)?;
        let yearly = compare_by_year(&all_months);
        let year_over_year = year_over_year(&yearly);

        let heat_map = heat_map(active_months);

        let category_totals = monthly_category_totals(history.iter().copied())?;
        let spikes = detect_spikes(&category_totals, config.spike_params());
        let biggest_category_change = biggest_category_change(&category_totals, reference);

        let in_trailing: Vec<&Transaction> = history
            .iter()
            .copied()
            .filter(|tx| trailing.contains(tx.day()))
            .collect();
        let expense_categories =
            aggregate_by_category_for(in_trailing.iter().copied(), TransactionType::Expense)?;
        let top_categories = top_n(&expense_categories, config.top_categories);
        let repeated_merchants =
            repeated_merchants(in_trailing.iter().copied(), config.repeated_merchant_min_count)?;

        let profile = snapshot.profile.as_ref();

        let budget = profile
            .filter(|p| p.monthly_budget > 0.0)
            .map(|p| budget_status(current_month.expense, p.monthly_budget));

        let emergency_fund = profile.map(|p| {
            let avg_expense = mean_expense(active_months);
            emergency_fund_status(p.emergency_fund_balance, avg_expense, config.emergency_months)
        });

        let surplus = profile
            .and_then(|p| p.manual_surplus)
            .filter(|s| s.is_finite())
            .or_else(|| {
                profile
                    .filter(|p| p.monthly_income > 0.0)
                    .map(|p| p.monthly_income - current_month.expense)
            })
            .unwrap_or_else(|| current_month.surplus());

        let twins = spending_twins(
            ScenarioBaseline {
                surplus,
                expense: current_month.expense,
            },
            config.twin_delta(),
            &config.horizons,
        )?;

        let allocation = allocation_snapshot(&snapshot.goals, surplus, config.goal_highlight_count);
        let allocation_breakdown = allocation_breakdown(&[
            (EXPENSES_SLICE, current_month.expense),
            (GOALS_SLICE, allocation.total_contributions),
            (UNALLOCATED_SLICE, allocation.unallocated),
        ]);

        info!(
            months = monthly_trend.len(),
            spikes = spikes.len(),
            categories = top_categories.len(),
            "Dashboard ready"
        );

        Ok(DashboardReport {
            reference,
            current_month,
            savings_band,
            budget,
            surplus,
            daily_trend,
            monthly_trend,
            yearly,
            year_over_year,
            heat_map,
            spikes,
            top_categories,
            repeated_merchants,
            biggest_category_change,
            emergency_fund,
            twins,
            allocation,
            allocation_breakdown,
        })
    }
}

/// The months from the first one holding any transaction
fn active_tail(monthly: &[MonthlyAggregate], first: Option<NaiveDate>) -> &[MonthlyAggregate] {
    match first {
        Some(first) => {
            let skip = monthly.iter().take_while(|m| m.start < first).count();
            &monthly[skip..]
        }
        None => &[],
    }
}

fn mean_expense(monthly: &[MonthlyAggregate]) -> f64 {
    if monthly.is_empty() {
        0.0
    } else {
        monthly.iter().map(|m| m.expense).sum::<f64>() / monthly.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::anomaly::IntensityBand;
    use crate::analytics::health::EmergencyBand;
    use crate::models::{parse_timestamp, FinancialProfile};

    fn tx(id: &str, date: &str, kind: TransactionType, amount: f64, category: &str) -> Transaction {
        Transaction::new(id, parse_timestamp(date).unwrap(), kind, amount, category).unwrap()
    }

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_empty_snapshot() {
        let engine = AnalyticsEngine::default();
        let report = engine.dashboard(&Snapshot::default(), reference()).unwrap();

        assert_eq!(report.current_month, PeriodTotals::default());
        assert_eq!(report.savings_band, SavingsBand::NeedsImprovement);
        assert_eq!(report.daily_trend.len(), 15);
        assert_eq!(report.monthly_trend.len(), 12);
        assert!(report.monthly_trend.iter().all(|m| m.expense == 0.0));
        assert!(report.heat_map.is_empty());
        assert!(report.yearly.is_empty());
        assert!(report.spikes.is_empty());
        assert!(report.top_categories.is_empty());
        assert!(report.biggest_category_change.is_none());
        assert!(report.emergency_fund.is_none());
        assert!(report.budget.is_none());
        assert_eq!(report.twins.len(), 3);
        assert!(report.allocation_breakdown.is_empty());
    }

    #[test]
    fn test_future_transactions_are_ignored() {
        let snapshot = Snapshot {
            transactions: vec![
                tx("1", "2024-03-01", TransactionType::Income, 1000.0, "Salary"),
                tx("2", "2024-03-20", TransactionType::Expense, 900.0, "Rent"),
            ],
            ..Default::default()
        };
        let report = AnalyticsEngine::default()
            .dashboard(&snapshot, reference())
            .unwrap();
        assert_eq!(report.current_month.income, 1000.0);
        assert_eq!(report.current_month.expense, 0.0);
        assert_eq!(report.current_month.transaction_count, 1);
    }

    #[test]
    fn test_manual_surplus_overrides_current_month() {
        let snapshot = Snapshot {
            transactions: vec![
                tx("1", "2024-03-01", TransactionType::Income, 5000.0, "Salary"),
                tx("2", "2024-03-02", TransactionType::Expense, 3000.0, "Rent"),
            ],
            goals: vec![],
            profile: Some(FinancialProfile {
                manual_surplus: Some(1234.0),
                emergency_fund_balance: 0.0,
                ..Default::default()
            }),
        };
        let report = AnalyticsEngine::default()
            .dashboard(&snapshot, reference())
            .unwrap();
        assert_eq!(report.surplus, 1234.0);
        assert_eq!(report.twins[1].surplus, 1234.0);
        assert_eq!(
            report.emergency_fund.map(|e| e.band),
            Some(EmergencyBand::AtRisk)
        );
    }

    #[test]
    fn test_flat_spending_averages_over_active_months() {
        let snapshot = Snapshot {
            transactions: vec![
                tx("1", "2024-01-05", TransactionType::Expense, 1000.0, "Rent"),
                tx("2", "2024-02-05", TransactionType::Expense, 1000.0, "Rent"),
                tx("3", "2024-03-05", TransactionType::Expense, 1000.0, "Rent"),
            ],
            goals: vec![],
            profile: Some(FinancialProfile {
                emergency_fund_balance: 3000.0,
                ..Default::default()
            }),
        };
        let report = AnalyticsEngine::default()
            .dashboard(&snapshot, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap())
            .unwrap();

        // The trend stays dense but only active months are averaged
        assert_eq!(report.monthly_trend.len(), 12);
        let periods: Vec<&str> = report.heat_map.iter().map(|c| c.period.as_str()).collect();
        assert_eq!(periods, vec!["2024-01", "2024-02", "2024-03"]);
        for cell in &report.heat_map {
            assert_eq!(cell.intensity, 1.0);
            assert_eq!(cell.band, IntensityBand::Normal);
        }

        let fund = report.emergency_fund.unwrap();
        assert_eq!(fund.months_covered, 3.0);
        assert_eq!(fund.band, EmergencyBand::Building);
    }

    #[test]
    fn test_income_only_month_starts_active_range() {
        let snapshot = Snapshot {
            transactions: vec![
                tx("1", "2024-02-01", TransactionType::Income, 5000.0, "Salary"),
                tx("2", "2024-03-05", TransactionType::Expense, 1000.0, "Rent"),
            ],
            ..Default::default()
        };
        let report = AnalyticsEngine::default()
            .dashboard(&snapshot, reference())
            .unwrap();
        assert_eq!(report.heat_map.len(), 2);
        assert_eq!(report.heat_map[0].band, IntensityBand::Low);
        assert_eq!(report.heat_map[1].intensity, 2.0);
    }

    #[test]
    fn test_stated_income_sets_surplus() {
        let snapshot = Snapshot {
            transactions: vec![
                tx("1", "2024-03-01", TransactionType::Income, 5000.0, "Salary"),
                tx("2", "2024-03-02", TransactionType::Expense, 3000.0, "Rent"),
            ],
            goals: vec![],
            profile: Some(FinancialProfile {
                monthly_income: 8000.0,
                ..Default::default()
            }),
        };
        let report = AnalyticsEngine::default()
            .dashboard(&snapshot, reference())
            .unwrap();
        assert_eq!(report.surplus, 5000.0);
        assert_eq!(report.current_month.surplus(), 2000.0);
    }

    #[test]
    fn test_invalid_amount_fails_report() {
        let mut bad = tx("1", "2024-03-01", TransactionType::Expense, 10.0, "Food");
        bad.amount = f64::NAN;
        let snapshot = Snapshot {
            transactions: vec![bad],
            ..Default::default()
        };
        assert!(AnalyticsEngine::default()
            .dashboard(&snapshot, reference())
            .is_err());
    }

    #[test]
    fn test_oversized_trend_window_is_capped() {
        let config = AnalyticsConfig {
            trend_months: u32::MAX,
            ..Default::default()
        };
        let report = AnalyticsEngine::new(config)
            .dashboard(&Snapshot::default(), reference())
            .unwrap();
        assert_eq!(report.monthly_trend.len(), MAX_TREND_MONTHS as usize);
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AnalyticsEngine>();
    }
}

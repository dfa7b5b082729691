//! Integration tests for fincast-core
//!
//! These tests exercise the full snapshot → dashboard workflow through the
//! public API, the way the CLI drives it.

use chrono::NaiveDate;
use fincast_core::{
    aggregate_by_bucket, parse_config, project_contributions, round_currency, AnalyticsConfig,
    AnalyticsEngine, BudgetBand, EmergencyBand, Error, Granularity, IntensityBand,
    ProjectionInput, ProportionalRescaler, SavingsBand, Snapshot, TextRecommendation,
};

/// Four months of steady spending with a food spike and a new coffee habit in
/// the reference month, plus one entry dated after the reference date
fn snapshot_json() -> &'static str {
    r#"{
  "transactions": [
    {"id": "t01", "date": "2023-12-01", "type": "income", "amount": 50000, "category": "Salary"},
    {"id": "t02", "date": "2023-12-03", "type": "expense", "amount": 15000, "category": "Rent"},
    {"id": "t03", "date": "2023-12-10", "type": "expense", "amount": 8000, "category": "Food"},
    {"id": "t04", "date": "2024-01-01", "type": "income", "amount": 50000, "category": "Salary"},
    {"id": "t05", "date": "2024-01-03", "type": "expense", "amount": 15000, "category": "Rent"},
    {"id": "t06", "date": "2024-01-12T18:30:00Z", "type": "expense", "amount": 8000,
     "category": "food"},
    {"id": "t07", "date": "2024-02-01", "type": "income", "amount": 50000, "category": "Salary"},
    {"id": "t08", "date": "2024-02-03", "type": "expense", "amount": 15000, "category": "Rent"},
    {"id": "t09", "date": "2024-02-14", "type": "expense", "amount": 8000, "category": "Food"},
    {"id": "t10", "date": "2024-03-01", "type": "Income", "amount": 50000, "category": "Salary"},
    {"id": "t11", "date": "2024-03-03", "type": "expense", "amount": 15000, "category": "Rent"},
    {"id": "t12", "date": "2024-03-09", "type": "expense", "amount": 20000, "category": "Food"},
    {"id": "t13", "date": "2024-03-05", "type": "expense", "amount": 250, "category": "Coffee",
     "merchant": "Blue Tokai"},
    {"id": "t14", "date": "2024-03-06", "type": "expense", "amount": 250, "category": "Coffee",
     "merchant": "blue tokai"},
    {"id": "t15", "date": "2024-03-07", "type": "expense", "amount": 250, "category": "Coffee",
     "merchant": "Blue Tokai"},
    {"id": "t16", "date": "2024-03-25", "type": "expense", "amount": 99999, "category": "Travel"}
  ],
  "goals": [
    {"id": "g1", "name": "Emergency top-up", "target_amount": 60000, "priority": "high",
     "monthly_contribution": 5000, "expected_months": 12, "status": "in_progress"},
    {"id": "g2", "name": "New laptop", "target_amount": 90000, "priority": "medium",
     "monthly_contribution": 3000, "expected_months": 12}
  ],
  "profile": {
    "risk_level": "medium",
    "monthly_income": 50000,
    "monthly_budget": 40000,
    "emergency_fund_balance": 50000
  }
}"#
}

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
}

fn load_snapshot() -> Snapshot {
    serde_json::from_str(snapshot_json()).expect("Failed to parse snapshot")
}

// =============================================================================
// Dashboard Workflow
// =============================================================================

#[test]
fn test_full_dashboard_workflow() {
    let snapshot = load_snapshot();
    assert_eq!(snapshot.transactions.len(), 16);

    let report = AnalyticsEngine::default()
        .dashboard(&snapshot, reference())
        .expect("Dashboard failed");

    // Month to date excludes the entry dated after the reference
    assert_eq!(report.current_month.income, 50_000.0);
    assert_eq!(report.current_month.expense, 35_750.0);
    assert_eq!(report.current_month.surplus(), 14_250.0);
    assert_eq!(report.current_month.savings_rate_percent(), 28.5);
    assert_eq!(report.savings_band, SavingsBand::Good);

    let budget = report.budget.expect("budget section");
    assert_eq!(budget.band, BudgetBand::Warning);

    // One spike: food in March against a steady 8,000 baseline
    assert_eq!(report.spikes.len(), 1);
    assert_eq!(report.spikes[0].period, "2024-03");
    assert_eq!(report.spikes[0].category, "Food");
    assert_eq!(report.spikes[0].baseline, 8_000.0);

    let change = report.biggest_category_change.expect("category change");
    assert_eq!(change.category, "Food");
    assert_eq!(change.change_percent, 150.0);

    let names: Vec<&str> = report
        .top_categories
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(names, vec!["Rent", "Food", "Coffee"]);

    assert_eq!(report.repeated_merchants.len(), 1);
    assert_eq!(report.repeated_merchants[0].merchant, "Blue Tokai");
    assert_eq!(report.repeated_merchants[0].count, 3);

    // Averaged over December to March only: 104,750 / 4
    let emergency = report.emergency_fund.expect("emergency section");
    assert_eq!(emergency.recommended_amount, 26_187.5 * 6.0);
    assert_eq!(emergency.band, EmergencyBand::AtRisk);

    assert_eq!(report.allocation.total_contributions, 8_000.0);
    assert_eq!(report.allocation.unallocated, 6_250.0);
    assert_eq!(report.allocation.highlighted.len(), 2);

    assert_eq!(report.twins.len(), 3);
    assert_eq!(report.twins[1].surplus, 14_250.0);
    assert_eq!(report.twins[1].estimates[0].net_worth, 171_000.0);
}

#[test]
fn test_series_conserve_totals() {
    let snapshot = load_snapshot();
    let report = AnalyticsEngine::default()
        .dashboard(&snapshot, reference())
        .unwrap();

    assert_eq!(report.monthly_trend.len(), 12);
    assert_eq!(report.monthly_trend[0].key, "2023-04");
    assert_eq!(report.monthly_trend[11].key, "2024-03");

    let monthly_expense: f64 = report.monthly_trend.iter().map(|m| m.expense).sum();
    assert_eq!(monthly_expense, 3.0 * 23_000.0 + 35_750.0);

    let daily_expense: f64 = report.daily_trend.iter().map(|d| d.expense).sum();
    assert_eq!(daily_expense, report.current_month.expense);
    assert_eq!(report.daily_trend.len(), 20);

    for month in &report.monthly_trend {
        assert_eq!(month.surplus(), month.income - month.expense);
    }

    // Months before the first transaction get no heat cell
    let periods: Vec<&str> = report.heat_map.iter().map(|c| c.period.as_str()).collect();
    assert_eq!(periods, vec!["2023-12", "2024-01", "2024-02", "2024-03"]);
    assert_eq!(report.heat_map[0].band, IntensityBand::Normal);
    assert_eq!(report.heat_map[3].band, IntensityBand::High);
}

#[test]
fn test_yearly_comparison_uses_months_present() {
    let report = AnalyticsEngine::default()
        .dashboard(&load_snapshot(), reference())
        .unwrap();

    assert_eq!(report.yearly.len(), 2);
    assert_eq!(report.yearly[0].year, 2023);
    assert_eq!(report.yearly[0].months, 1);
    assert_eq!(report.yearly[1].year, 2024);
    assert_eq!(report.yearly[1].months, 3);
    assert_eq!(report.yearly[1].avg_income, 50_000.0);
    assert_eq!(report.year_over_year.len(), 1);
}

#[test]
fn test_input_order_does_not_matter() {
    let snapshot = load_snapshot();
    let mut reversed = snapshot.clone();
    reversed.transactions.reverse();

    let engine = AnalyticsEngine::default();
    let forward = engine.dashboard(&snapshot, reference()).unwrap();
    let backward = engine.dashboard(&reversed, reference()).unwrap();
    assert_eq!(forward, backward);

    // And repeated runs are identical
    assert_eq!(forward, engine.dashboard(&snapshot, reference()).unwrap());
}

#[test]
fn test_report_serializes_derived_fields() {
    let report = AnalyticsEngine::default()
        .dashboard(&load_snapshot(), reference())
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["current_month"]["surplus"], 14_250.0);
    assert_eq!(json["monthly_trend"][11]["surplus"], 14_250.0);
    assert_eq!(json["savings_band"], "good");
    assert_eq!(json["heat_map"][3]["band"], "high");
}

// =============================================================================
// Record Validation
// =============================================================================

#[test]
fn test_unknown_transaction_type_is_rejected() {
    let json = r#"{"transactions": [
        {"id": "x1", "date": "2024-03-01", "type": "transfer", "amount": 10,
         "category": "Misc"}
    ]}"#;
    let err = serde_json::from_str::<Snapshot>(json).unwrap_err();
    assert!(err.to_string().contains("transfer"));
}

#[test]
fn test_bad_date_is_rejected() {
    let json = r#"{"transactions": [
        {"id": "x1", "date": "03/01/2024", "type": "expense", "amount": 10,
         "category": "Misc"}
    ]}"#;
    assert!(serde_json::from_str::<Snapshot>(json).is_err());
}

#[test]
fn test_sparse_buckets_sort_chronologically() {
    let snapshot = load_snapshot();
    let months = aggregate_by_bucket(&snapshot.transactions, Granularity::Month).unwrap();
    let keys: Vec<&str> = months.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(keys, vec!["2023-12", "2024-01", "2024-02", "2024-03"]);
}

// =============================================================================
// Projection and Rescaling
// =============================================================================

#[test]
fn test_sip_projection_workflow() {
    let input = ProjectionInput::new(5000.0, 12, 12.0).unwrap();
    let result = project_contributions(&input);
    assert_eq!(round_currency(result.future_value), 63_413.0);
    assert_eq!(result.total_contributed, 60_000.0);

    assert!(matches!(
        ProjectionInput::new(5000.0, 0, 12.0),
        Err(Error::InvalidNumericInput(_))
    ));
}

#[test]
fn test_rescale_advisor_text() {
    let rescaler = ProportionalRescaler::default();
    let advice = TextRecommendation("Invest ₹6,000 monthly in a balanced fund".into());

    let rescaled = rescaler.rescale_from(&advice, 30_000.0, 45_000.0).unwrap();
    assert_eq!(rescaled.ratio, 0.2);
    assert_eq!(rescaled.rescaled_recommendation, 9_000.0);

    let zeroed = rescaler.rescale_from(&advice, 30_000.0, 0.0).unwrap();
    assert_eq!(zeroed.rescaled_recommendation, 0.0);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_changes_dashboard() {
    let config = parse_config(
        r#"
        [anomaly]
        spike_multiple = 3.0

        [dashboard]
        trend_months = 6
        top_categories = 1
        "#,
    )
    .unwrap();
    let report = AnalyticsEngine::new(config)
        .dashboard(&load_snapshot(), reference())
        .unwrap();

    // 20,000 is not above 3 x 8,000
    assert!(report.spikes.is_empty());
    assert_eq!(report.monthly_trend.len(), 6);
    assert_eq!(report.top_categories.len(), 1);
}

#[test]
fn test_config_file_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("analytics.toml");
    std::fs::write(&path, "[health]\nemergency_months = 1.5\n").unwrap();

    let (config, _) = AnalyticsConfig::load(Some(&path)).unwrap();
    assert_eq!(config.emergency_months, 1.5);

    let report = AnalyticsEngine::new(config)
        .dashboard(&load_snapshot(), reference())
        .unwrap();
    assert_eq!(
        report.emergency_fund.map(|e| e.band),
        Some(EmergencyBand::Healthy)
    );
}

//! Dashboard report command

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use fincast_core::{AnalyticsEngine, DashboardReport};

use crate::loader::load_snapshot;

use super::{money, print_json, truncate};

/// Resolve `--as-of` to a reference date, defaulting to today (UTC)
pub fn resolve_as_of(as_of: Option<&str>) -> Result<NaiveDate> {
    match as_of {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .context("Invalid --as-of date format (use YYYY-MM-DD)"),
        None => Ok(Utc::now().date_naive()),
    }
}

pub fn cmd_report(
    engine: &AnalyticsEngine,
    file: &Path,
    profile: Option<&Path>,
    goals: Option<&Path>,
    as_of: Option<&str>,
    json: bool,
) -> Result<()> {
    let reference = resolve_as_of(as_of)?;
    let snapshot = load_snapshot(file, profile, goals)?;
    let report = engine
        .dashboard(&snapshot, reference)
        .context("Failed to build dashboard")?;

    if json {
        return print_json(&report);
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &DashboardReport) {
    print_summary(report);
    print_monthly_trend(report);
    print_yearly(report);
    print_categories(report);
    print_anomalies(report);
    print_twins(report);
    print_goals(report);
}

fn print_summary(report: &DashboardReport) {
    let month = &report.current_month;

    println!();
    println!("📊 Fincast Dashboard");
    println!("   As of: {}", report.reference);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Income:        {:>12}", money(month.income));
    println!("   Expense:       {:>12}", money(month.expense));
    println!("   Surplus:       {:>12}", money(month.surplus()));
    println!(
        "   Savings rate:  {:>11.1}% ({})",
        month.savings_rate_percent(),
        report.savings_band
    );

    if let Some(budget) = &report.budget {
        println!(
            "   Budget:        {:>12} of {} ({:.0}%, {})",
            money(budget.spent),
            money(budget.limit),
            budget.percent_used,
            budget.band
        );
    }

    if let Some(peak) = report
        .daily_trend
        .iter()
        .filter(|d| d.expense > 0.0)
        .max_by(|a, b| a.expense.total_cmp(&b.expense))
    {
        println!(
            "   Peak day:      {:>12} on {}",
            money(peak.expense),
            peak.key
        );
    }

    if let Some(fund) = &report.emergency_fund {
        println!();
        println!("💰 Emergency Fund");
        println!("   ─────────────────────────────────────────────────────────────");
        println!(
            "   Covers {:.1} months ({:.1} more needed), {:.0}% of {}",
            fund.months_covered,
            fund.months_needed,
            fund.progress_percent,
            money(fund.recommended_amount)
        );
        println!("   Status: {}", fund.band);
    }
}

fn print_monthly_trend(report: &DashboardReport) {
    println!();
    println!("📈 Monthly Trend");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:8} │ {:>10} │ {:>10} │ {:>10} │ {:9}",
        "Month", "Income", "Expense", "Surplus", "Intensity"
    );
    println!("   ─────────┼────────────┼────────────┼────────────┼──────────");

    for month in &report.monthly_trend {
        let band = report
            .heat_map
            .iter()
            .find(|cell| cell.period == month.key)
            .map_or("-", |cell| cell.band.as_str());
        println!(
            "   {:8} │ {:>10} │ {:>10} │ {:>10} │ {:9}",
            month.key,
            money(month.income),
            money(month.expense),
            money(month.surplus()),
            band
        );
    }
}

fn print_yearly(report: &DashboardReport) {
    if report.yearly.is_empty() {
        return;
    }

    println!();
    println!("📅 Year Comparison (monthly averages)");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:6} │ {:>6} │ {:>10} │ {:>10} │ {:>8}",
        "Year", "Months", "Income", "Expense", "Savings"
    );
    println!("   ───────┼────────┼────────────┼────────────┼─────────");
    for year in &report.yearly {
        println!(
            "   {:6} │ {:>6} │ {:>10} │ {:>10} │ {:>7.1}%",
            year.year,
            year.months,
            money(year.avg_income),
            money(year.avg_expense),
            year.savings_rate_percent
        );
    }
    for change in &report.year_over_year {
        println!(
            "   {} → {}: savings {:+.1} pts, expense {:+.1}%",
            change.from_year,
            change.to_year,
            change.savings_rate_change_points,
            change.avg_expense_change_percent
        );
    }
}

fn print_categories(report: &DashboardReport) {
    println!();
    println!("🏷️  Top Categories");
    println!("   ─────────────────────────────────────────────────────────────");
    if report.top_categories.is_empty() {
        println!("   No spending found in this period.");
    } else {
        println!("   {:25} │ {:>10} │ {:>5}", "Category", "Amount", "Count");
        println!("   ──────────────────────────┼────────────┼───────");
        for category in &report.top_categories {
            println!(
                "   {:25} │ {:>10} │ {:>5}",
                truncate(&category.category, 25),
                money(category.total),
                category.count
            );
        }
    }

    if !report.repeated_merchants.is_empty() {
        println!();
        println!("🔁 Repeated Merchants");
        println!("   ─────────────────────────────────────────────────────────────");
        for merchant in &report.repeated_merchants {
            println!(
                "   {:25} {:>3}x  avg {:>8}  total {:>10}",
                truncate(&merchant.merchant, 25),
                merchant.count,
                money(merchant.average),
                money(merchant.total)
            );
        }
    }
}

fn print_anomalies(report: &DashboardReport) {
    if report.spikes.is_empty() && report.biggest_category_change.is_none() {
        return;
    }

    println!();
    println!("⚠️  Spending Spikes");
    println!("   ─────────────────────────────────────────────────────────────");
    for spike in &report.spikes {
        println!(
            "   {} {:20} {:>10} vs avg {:>10} ({:.1}x)",
            spike.period,
            truncate(&spike.category, 20),
            money(spike.amount),
            money(spike.baseline),
            spike.ratio
        );
    }
    if let Some(change) = &report.biggest_category_change {
        println!(
            "   Biggest jump this month: {} {:+.0}% ({} → {})",
            change.category,
            change.change_percent,
            money(change.previous),
            money(change.current)
        );
    }
}

fn print_twins(report: &DashboardReport) {
    let Some(first) = report.twins.first() else {
        return;
    };

    println!();
    println!("👯 Spending Twins (linear, no returns)");
    println!("   ─────────────────────────────────────────────────────────────");
    let horizons: Vec<String> = first
        .estimates
        .iter()
        .map(|e| format!("{:>10}", format!("{}m", e.months)))
        .collect();
    println!(
        "   {:12} │ {:>10} │ {:>10} │ {}",
        "Scenario",
        "Expense",
        "Surplus",
        horizons.join(" │ ")
    );
    for scenario in &report.twins {
        let values: Vec<String> = scenario
            .estimates
            .iter()
            .map(|e| format!("{:>10}", money(e.net_worth)))
            .collect();
        println!(
            "   {:12} │ {:>10} │ {:>10} │ {}",
            scenario.label,
            money(scenario.expense),
            money(scenario.surplus),
            values.join(" │ ")
        );
    }
}

fn print_goals(report: &DashboardReport) {
    let allocation = &report.allocation;
    if allocation.highlighted.is_empty() && report.allocation_breakdown.is_empty() {
        return;
    }

    println!();
    println!("🎯 Goals & Allocation");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Contributions {} of surplus {} ({:.0}%), unallocated {}",
        money(allocation.total_contributions),
        money(allocation.surplus),
        allocation.share_of_surplus_percent,
        money(allocation.unallocated)
    );
    for slice in &report.allocation_breakdown {
        println!(
            "   {:20} {:>10} {:>5.1}%",
            slice.label,
            money(slice.amount),
            slice.share_percent
        );
    }
    for goal in &allocation.highlighted {
        println!(
            "   • {:25} {:>8}/mo  {:>5.0}%  [{}, {}]",
            truncate(&goal.name, 25),
            money(goal.monthly_contribution),
            goal.progress_percent,
            goal.priority,
            goal.status
        );
    }
}

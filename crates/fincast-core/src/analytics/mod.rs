//! Pure analytics over transactions, goals and profiles
//!
//! Modules, leaves first:
//!
//! - **buckets** - day and month aggregation, dense series, period totals
//! - **categories** - category and merchant grouping, top-N ranking
//! - **periods** - yearly roll-ups and year-over-year change
//! - **anomaly** - category spikes and heat-map intensity
//! - **health** - savings, emergency fund and budget bands
//! - **projection** - compounding contributions and linear scenarios
//! - **rescale** - proportional rescaling of external recommendations
//! - **allocation** - surplus allocation and goal cards
//!
//! Nothing here performs I/O or logs. Inputs may arrive in any order.

pub mod allocation;
pub mod anomaly;
pub mod buckets;
pub mod categories;
pub mod health;
pub mod periods;
pub mod projection;
pub mod rescale;

pub use allocation::{
    allocation_breakdown, allocation_snapshot, AllocationSlice, AllocationSnapshot, GoalCard,
};
pub use anomaly::{
    biggest_category_change, classify_intensity, detect_spikes, heat_map,
    monthly_category_totals, CategoryChange, CategoryMonthTotal, HeatCell, IntensityBand, Spike,
    SpikeParams,
};
pub use buckets::{
    aggregate_by_bucket, aggregate_by_bucket_dense, summarize, BucketAggregate, BucketRange,
    DailyAggregate, Granularity, MonthlyAggregate, PeriodTotals,
};
pub use categories::{
    aggregate_by_category, aggregate_by_category_for, normalize_label, repeated_merchants, top_n,
    CategoryAggregate, MerchantAggregate, UNCATEGORIZED_LABEL,
};
pub use health::{
    budget_status, classify_emergency_coverage, classify_savings_rate, emergency_fund_status,
    savings_rate_percent, BudgetBand, BudgetStatus, EmergencyBand, EmergencyFundStatus,
    SavingsBand,
};
pub use periods::{compare_by_year, percent_change, year_over_year, PeriodChange, YearlyAggregate};
pub use projection::{
    goal_progress_percent, project_contributions, project_scenario, round_currency,
    spending_twins, HorizonEstimate, ProjectionInput, ProjectionResult, Scenario,
    ScenarioBaseline,
};
pub use rescale::{
    extract_amount, rescale, FixedRecommendation, ProportionalRescaler, RecommendationSource,
    Rescaled, TextRecommendation, DEFAULT_RECOMMENDATION_RATIO,
};

//! Where the monthly surplus goes

use serde::Serialize;

use crate::models::{Goal, GoalPriority, GoalStatus};

use super::projection::goal_progress_percent;

/// One named share of the monthly money flow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSlice {
    pub label: String,
    pub amount: f64,
    /// Share of the positive total, 0-100
    pub share_percent: f64,
}

/// Keep the positive slices and attach each one's share of their total
pub fn allocation_breakdown(slices: &[(&str, f64)]) -> Vec<AllocationSlice> {
    let kept: Vec<(&str, f64)> = slices
        .iter()
        .copied()
        .filter(|(_, amount)| amount.is_finite() && *amount > 0.0)
        .collect();
    let total: f64 = kept.iter().map(|(_, amount)| amount).sum();

    kept.into_iter()
        .map(|(label, amount)| AllocationSlice {
            label: label.to_string(),
            amount,
            share_percent: amount * 100.0 / total,
        })
        .collect()
}

/// Compact goal summary for dashboard cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalCard {
    pub id: String,
    pub name: String,
    pub priority: GoalPriority,
    pub status: GoalStatus,
    pub monthly_contribution: f64,
    pub progress_percent: f64,
}

impl From<&Goal> for GoalCard {
    fn from(goal: &Goal) -> Self {
        Self {
            id: goal.id.clone(),
            name: goal.name.clone(),
            priority: goal.priority,
            status: goal.status,
            monthly_contribution: goal.monthly_contribution,
            progress_percent: goal_progress_percent(goal),
        }
    }
}

/// Goal contributions measured against the monthly surplus
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSnapshot {
    pub surplus: f64,
    pub total_contributions: f64,
    /// Share of the surplus committed to goals; 0 when there is no surplus
    pub share_of_surplus_percent: f64,
    /// Surplus left after contributions, negative when over-committed
    pub unallocated: f64,
    pub highlighted: Vec<GoalCard>,
}

pub fn allocation_snapshot(goals: &[Goal], surplus: f64, highlight: usize) -> AllocationSnapshot {
    let total_contributions: f64 = goals
        .iter()
        .map(|g| g.monthly_contribution)
        .filter(|c| c.is_finite() && *c > 0.0)
        .sum();

    let share_of_surplus_percent = if surplus > 0.0 {
        total_contributions * 100.0 / surplus
    } else {
        0.0
    };

    AllocationSnapshot {
        surplus,
        total_contributions,
        share_of_surplus_percent,
        unallocated: surplus - total_contributions,
        highlighted: goals.iter().take(highlight).map(GoalCard::from).collect(),
    }
}

//! Domain models for Fincast
//!
//! Input records arrive from the persistence layer as loosely typed data
//! ([`TransactionRecord`]) and are validated into [`Transaction`] before any
//! aggregation happens. Status, priority and risk strings become closed enums.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_amount, Error, Result};

/// Direction of a money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(Error::InvalidTransactionType(format!(
                "{:?} (valid: income, expense)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction as delivered by the persistence collaborator, not yet validated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub merchant: Option<String>,
}

/// A validated transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransactionRecord")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDateTime,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Always non-negative; direction comes from `kind`
    pub amount: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
}

impl Transaction {
    /// Create a transaction, rejecting negative or non-finite amounts
    pub fn new(
        id: impl Into<String>,
        date: NaiveDateTime,
        kind: TransactionType,
        amount: f64,
        category: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        let amount = ensure_amount(&format!("amount of transaction {}", id), amount)?;
        Ok(Self {
            id,
            date,
            kind,
            amount,
            category: category.into(),
            merchant: None,
        })
    }

    /// Attach a merchant name
    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    /// Calendar date of the transaction (time of day dropped)
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = Error;

    fn try_from(record: TransactionRecord) -> Result<Self> {
        let kind: TransactionType = record.kind.parse().map_err(|e| match e {
            Error::InvalidTransactionType(msg) => Error::InvalidTransactionType(format!(
                "transaction {}: {}",
                record.id, msg
            )),
            other => other,
        })?;
        let date = parse_timestamp(&record.date)?;
        let merchant = record
            .merchant
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        let mut tx = Transaction::new(record.id, date, kind, record.amount, record.category)?;
        tx.merchant = merchant;
        Ok(tx)
    }
}

/// Parse a transaction timestamp
///
/// Accepts `YYYY-MM-DD`, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (or with a space
/// separator) and RFC 3339. RFC 3339 values are converted to UTC; naive values
/// are taken as-is.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }

    Err(Error::InvalidDate(format!(
        "Unable to parse {:?} (use YYYY-MM-DD or RFC 3339)",
        s
    )))
}

/// Goal priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl GoalPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::str::FromStr for GoalPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Unknown goal priority: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Goal lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    #[serde(alias = "in-progress")]
    InProgress,
    Achievable,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Achievable => "achievable",
            Self::Completed => "completed",
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_progress" | "in-progress" => Ok(Self::InProgress),
            "achievable" => Ok(Self::Achievable),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Unknown goal status: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A savings goal funded by a monthly contribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub priority: GoalPriority,
    #[serde(default)]
    pub monthly_contribution: f64,
    #[serde(default)]
    pub expected_months: u32,
    #[serde(default)]
    pub status: GoalStatus,
}

/// Investment risk appetite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown risk level: {}", s)),
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User-stated financial profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialProfile {
    /// Passed through to recommendation sources; no analytic reads it
    #[serde(default)]
    pub risk_level: RiskLevel,
    /// Stated income; when positive the dashboard surplus is this less the
    /// month's expense
    #[serde(default)]
    pub monthly_income: f64,
    #[serde(default)]
    pub monthly_budget: f64,
    /// Money currently set aside for emergencies
    #[serde(default)]
    pub emergency_fund_balance: f64,
    /// Surplus override entered by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_surplus: Option<f64>,
}

/// Everything the engine needs for one user, loaded by the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub profile: Option<FinancialProfile>,
}

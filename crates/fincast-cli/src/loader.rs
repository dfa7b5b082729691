//! Input file loading
//!
//! Transactions come from CSV (`id,date,type,amount,category,merchant`, with
//! `id` and `merchant` optional) or JSON. JSON may be a bare array of
//! transactions or a full snapshot object with `transactions`, `goals` and
//! `profile`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use fincast_core::{FinancialProfile, Goal, Snapshot, Transaction, TransactionRecord};
use serde::Deserialize;
use tracing::debug;

/// A CSV row before validation
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    id: Option<String>,
    date: String,
    #[serde(rename = "type")]
    kind: String,
    amount: f64,
    #[serde(default)]
    category: String,
    #[serde(default)]
    merchant: Option<String>,
}

/// Input format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => anyhow::bail!(
                "Unsupported input file {} (use .csv or .json)",
                path.display()
            ),
        }
    }
}

/// Parse transactions from CSV text
pub fn parse_transactions_csv(content: &str) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut transactions = Vec::new();
    for (index, result) in rdr.deserialize::<CsvRow>().enumerate() {
        // Data rows start on line 2
        let line = index + 2;
        let row = result.with_context(|| format!("Invalid CSV row on line {}", line))?;
        let record = TransactionRecord {
            id: row
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("row-{}", line)),
            date: row.date,
            kind: row.kind,
            amount: row.amount,
            category: row.category,
            merchant: row.merchant,
        };
        let tx = Transaction::try_from(record)
            .with_context(|| format!("Invalid transaction on line {}", line))?;
        transactions.push(tx);
    }
    Ok(transactions)
}

/// Parse a JSON transaction array or snapshot object
pub fn parse_snapshot_json(content: &str) -> Result<Snapshot> {
    let value: serde_json::Value = serde_json::from_str(content).context("Invalid JSON")?;
    if value.is_array() {
        let transactions: Vec<Transaction> =
            serde_json::from_value(value).context("Invalid transaction list")?;
        Ok(Snapshot {
            transactions,
            ..Default::default()
        })
    } else {
        serde_json::from_value(value).context("Invalid snapshot")
    }
}

/// Load a snapshot from a transaction file plus optional profile and goals files
///
/// Separate profile and goals files replace any embedded in a JSON snapshot.
pub fn load_snapshot(
    file: &Path,
    profile: Option<&Path>,
    goals: Option<&Path>,
) -> Result<Snapshot> {
    let content =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let mut snapshot = match InputFormat::from_path(file)? {
        InputFormat::Csv => Snapshot {
            transactions: parse_transactions_csv(&content)?,
            ..Default::default()
        },
        InputFormat::Json => parse_snapshot_json(&content)?,
    };

    if let Some(path) = profile {
        snapshot.profile = Some(load_profile(path)?);
    }
    if let Some(path) = goals {
        snapshot.goals = load_goals(path)?;
    }

    debug!(
        transactions = snapshot.transactions.len(),
        goals = snapshot.goals.len(),
        profile = snapshot.profile.is_some(),
        "Loaded snapshot from {}",
        file.display()
    );
    Ok(snapshot)
}

pub fn load_profile(path: &Path) -> Result<FinancialProfile> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid profile in {}", path.display()))
}

pub fn load_goals(path: &Path) -> Result<Vec<Goal>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid goals in {}", path.display()))
}

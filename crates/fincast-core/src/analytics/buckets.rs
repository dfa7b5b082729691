//! Time bucket aggregation
//!
//! Groups transactions into calendar day or month buckets and sums income and
//! expense per bucket. Buckets are keyed and ordered by their start date, so
//! `2024-10` always sorts after `2024-09` regardless of how the label renders.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ensure_amount, Error, Result};
use crate::models::{Transaction, TransactionType};

use super::health::savings_rate_percent;

/// Bucket size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
        }
    }

    /// Start date of the bucket containing `date`
    pub fn truncate(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Month => first_of_month(date),
        }
    }

    /// Canonical, locale-independent key for a bucket start
    pub fn key(&self, start: NaiveDate) -> String {
        match self {
            Self::Day => start.format("%Y-%m-%d").to_string(),
            Self::Month => start.format("%Y-%m").to_string(),
        }
    }

    /// Start of the following bucket
    pub fn next(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Day => start.succ_opt(),
            Self::Month => first_of_month(start).checked_add_months(Months::new(1)),
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "month" | "monthly" => Ok(Self::Month),
            _ => Err(format!("Unknown granularity: {} (valid: day, month)", s)),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub(crate) fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Income and expense totals for one day or month
///
/// `surplus` is never stored; it is derived from `income` and `expense`
/// whenever it is read or serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketAggregate {
    /// `YYYY-MM-DD` for days, `YYYY-MM` for months
    pub key: String,
    pub start: NaiveDate,
    pub granularity: Granularity,
    pub income: f64,
    pub expense: f64,
}

/// A month bucket
pub type MonthlyAggregate = BucketAggregate;

/// A day bucket
pub type DailyAggregate = BucketAggregate;

impl BucketAggregate {
    fn empty(granularity: Granularity, start: NaiveDate) -> Self {
        Self {
            key: granularity.key(start),
            start,
            granularity,
            income: 0.0,
            expense: 0.0,
        }
    }

    /// Build a monthly aggregate from an externally supplied `YYYY-MM` key
    pub fn month(key: &str, income: f64, expense: f64) -> Result<Self> {
        let start = NaiveDate::parse_from_str(&format!("{}-01", key.trim()), "%Y-%m-%d")
            .map_err(|_| Error::InvalidDate(format!("Invalid month key {:?} (use YYYY-MM)", key)))?;
        Ok(Self {
            income: ensure_amount("income", income)?,
            expense: ensure_amount("expense", expense)?,
            ..Self::empty(Granularity::Month, start)
        })
    }

    pub fn surplus(&self) -> f64 {
        self.income - self.expense
    }

    pub fn savings_rate_percent(&self) -> f64 {
        savings_rate_percent(self.income, self.expense)
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    fn add(&mut self, tx: &Transaction) {
        match tx.kind {
            TransactionType::Income => self.income += tx.amount,
            TransactionType::Expense => self.expense += tx.amount,
        }
    }
}

impl Serialize for BucketAggregate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("BucketAggregate", 6)?;
        s.serialize_field("key", &self.key)?;
        s.serialize_field("start", &self.start)?;
        s.serialize_field("granularity", &self.granularity)?;
        s.serialize_field("income", &self.income)?;
        s.serialize_field("expense", &self.expense)?;
        s.serialize_field("surplus", &self.surplus())?;
        s.end()
    }
}

/// Inclusive calendar date range used for dense bucketing and period filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BucketRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidDate(format!(
                "Range start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// The calendar month containing `reference`
    pub fn month_of(reference: NaiveDate) -> Self {
        Self {
            start: first_of_month(reference),
            end: last_of_month(reference),
        }
    }

    /// `months` whole calendar months ending with the month containing `reference`
    ///
    /// The range ends on `reference` itself so future-dated entries are excluded.
    pub fn trailing_months(reference: NaiveDate, months: u32) -> Self {
        let back = months.max(1) - 1;
        let start = first_of_month(reference)
            .checked_sub_months(Months::new(back))
            .unwrap_or(NaiveDate::MIN);
        Self {
            start,
            end: reference,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Totals for an arbitrary set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeriodTotals {
    pub income: f64,
    pub expense: f64,
    pub transaction_count: usize,
}

impl PeriodTotals {
    pub fn surplus(&self) -> f64 {
        self.income - self.expense
    }

    pub fn savings_rate_percent(&self) -> f64 {
        savings_rate_percent(self.income, self.expense)
    }
}

impl Serialize for PeriodTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PeriodTotals", 5)?;
        s.serialize_field("income", &self.income)?;
        s.serialize_field("expense", &self.expense)?;
        s.serialize_field("surplus", &self.surplus())?;
        s.serialize_field("savings_rate_percent", &self.savings_rate_percent())?;
        s.serialize_field("transaction_count", &self.transaction_count)?;
        s.end()
    }
}

fn checked_amount(tx: &Transaction) -> Result<f64> {
    ensure_amount(&format!("amount of transaction {}", tx.id), tx.amount)
}

/// Sum income and expense over a set of transactions
pub fn summarize<'a, I>(transactions: I) -> Result<PeriodTotals>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = PeriodTotals::default();
    for tx in transactions {
        let amount = checked_amount(tx)?;
        match tx.kind {
            TransactionType::Income => totals.income += amount,
            TransactionType::Expense => totals.expense += amount,
        }
        totals.transaction_count += 1;
    }
    Ok(totals)
}

/// Group transactions into buckets, returning only buckets that received at
/// least one transaction, in chronological order
pub fn aggregate_by_bucket<'a, I>(
    transactions: I,
    granularity: Granularity,
) -> Result<Vec<BucketAggregate>>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut buckets: BTreeMap<NaiveDate, BucketAggregate> = BTreeMap::new();

    for tx in transactions {
        checked_amount(tx)?;
        let start = granularity.truncate(tx.day());
        buckets
            .entry(start)
            .or_insert_with(|| BucketAggregate::empty(granularity, start))
            .add(tx);
    }

    Ok(buckets.into_values().collect())
}

/// Group transactions into a continuous run of buckets
///
/// With an explicit `range`, every bucket overlapping it is emitted and
/// transactions outside it are ignored. Without one, the run spans the first
/// to the last populated bucket. Empty buckets carry zero totals.
pub fn aggregate_by_bucket_dense<'a, I>(
    transactions: I,
    granularity: Granularity,
    range: Option<BucketRange>,
) -> Result<Vec<BucketAggregate>>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut in_range = Vec::new();
    for tx in transactions {
        checked_amount(tx)?;
        if range.map_or(true, |r| r.contains(tx.day())) {
            in_range.push(tx);
        }
    }

    let sparse = aggregate_by_bucket(in_range, granularity)?;

    let (first, last) = match range {
        Some(r) => (granularity.truncate(r.start), granularity.truncate(r.end)),
        None => match (sparse.first(), sparse.last()) {
            (Some(first), Some(last)) => (first.start, last.start),
            _ => return Ok(Vec::new()),
        },
    };

    let mut populated: BTreeMap<NaiveDate, BucketAggregate> =
        sparse.into_iter().map(|b| (b.start, b)).collect();

    let mut dense = Vec::new();
    let mut cursor = Some(first);
    while let Some(start) = cursor {
        if start > last {
            break;
        }
        dense.push(
            populated
                .remove(&start)
                .unwrap_or_else(|| BucketAggregate::empty(granularity, start)),
        );
        cursor = granularity.next(start);
    }

    Ok(dense)
}

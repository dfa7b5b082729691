//! Category and merchant aggregation

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{ensure_amount, Result};
use crate::models::{Transaction, TransactionType};

/// Label used for transactions with a blank category
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Totals for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAggregate {
    /// Earliest-seen label for the normalized category
    pub category: String,
    pub total: f64,
    pub count: usize,
}

/// Totals for one merchant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantAggregate {
    pub merchant: String,
    pub total: f64,
    pub count: usize,
    pub average: f64,
}

/// Grouping key for a free-text label: trimmed, inner whitespace collapsed,
/// lowercased
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Display form of a label: trimmed with collapsed whitespace, or the
/// uncategorized label when blank
pub(crate) fn display_label(label: &str) -> String {
    let trimmed = label.split_whitespace().collect::<Vec<_>>().join(" ");
    if trimmed.is_empty() {
        UNCATEGORIZED_LABEL.to_string()
    } else {
        trimmed
    }
}

/// Earliest occurrence of a label, by date then id
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct FirstSeen {
    date: NaiveDateTime,
    id: String,
}

impl FirstSeen {
    pub(crate) fn of(tx: &Transaction) -> Self {
        Self {
            date: tx.date,
            id: tx.id.clone(),
        }
    }
}

/// Display labels per normalized key, keeping the spelling seen earliest
#[derive(Debug, Default)]
pub(crate) struct LabelBook {
    labels: HashMap<String, (FirstSeen, String)>,
}

impl LabelBook {
    /// Record `label` as used by `tx` and return its normalized key
    pub(crate) fn note(&mut self, label: &str, tx: &Transaction) -> String {
        let display = display_label(label);
        let key = normalize_label(&display);
        let seen = FirstSeen::of(tx);
        match self.labels.get_mut(&key) {
            Some(entry) if seen < entry.0 => *entry = (seen, display),
            Some(_) => {}
            None => {
                self.labels.insert(key.clone(), (seen, display));
            }
        }
        key
    }

    pub(crate) fn first_seen(&self, key: &str) -> Option<&FirstSeen> {
        self.labels.get(key).map(|(seen, _)| seen)
    }

    pub(crate) fn label(&self, key: &str) -> String {
        self.labels
            .get(key)
            .map(|(_, display)| display.clone())
            .unwrap_or_else(|| key.to_string())
    }
}

/// Accumulates totals per normalized label
#[derive(Default)]
struct LabelGroups {
    book: LabelBook,
    totals: HashMap<String, (f64, usize)>,
}

impl LabelGroups {
    fn add(&mut self, label: &str, tx: &Transaction, amount: f64) {
        let key = self.book.note(label, tx);
        let group = self.totals.entry(key).or_insert((0.0, 0));
        group.0 += amount;
        group.1 += 1;
    }

    /// `(label, total, count)` ordered by when each label first appeared
    fn into_groups(self) -> Vec<(String, f64, usize)> {
        let mut keyed: Vec<(String, f64, usize)> = self
            .totals
            .into_iter()
            .map(|(key, (total, count))| (key, total, count))
            .collect();
        keyed.sort_by(|a, b| {
            self.book
                .first_seen(&a.0)
                .cmp(&self.book.first_seen(&b.0))
                .then_with(|| a.0.cmp(&b.0))
        });
        keyed
            .into_iter()
            .map(|(key, total, count)| (self.book.label(&key), total, count))
            .collect()
    }
}

fn group_categories<'a, I>(
    transactions: I,
    kind: Option<TransactionType>,
) -> Result<Vec<CategoryAggregate>>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut groups = LabelGroups::default();
    for tx in transactions {
        let amount = ensure_amount(&format!("amount of transaction {}", tx.id), tx.amount)?;
        if kind.map_or(true, |k| k == tx.kind) {
            groups.add(&tx.category, tx, amount);
        }
    }

    Ok(groups
        .into_groups()
        .into_iter()
        .map(|(category, total, count)| CategoryAggregate {
            category,
            total,
            count,
        })
        .collect())
}

/// Group all transactions by category, in first-seen order
///
/// "Food", " food " and "FOOD" merge into one entry labelled with the
/// spelling of the earliest transaction (by date, then id), so the result
/// does not depend on input order.
pub fn aggregate_by_category<'a, I>(transactions: I) -> Result<Vec<CategoryAggregate>>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    group_categories(transactions, None)
}

/// Group transactions of one type by category
pub fn aggregate_by_category_for<'a, I>(
    transactions: I,
    kind: TransactionType,
) -> Result<Vec<CategoryAggregate>>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    group_categories(transactions, Some(kind))
}

/// The `n` largest categories by total, ties broken by name ascending
pub fn top_n(aggregates: &[CategoryAggregate], n: usize) -> Vec<CategoryAggregate> {
    let mut sorted = aggregates.to_vec();
    sorted.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    sorted.truncate(n);
    sorted
}

/// Merchants charged at least `min_count` times across expense transactions
///
/// Sorted by count descending, then total descending, then name.
pub fn repeated_merchants<'a, I>(
    transactions: I,
    min_count: usize,
) -> Result<Vec<MerchantAggregate>>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut groups = LabelGroups::default();
    for tx in transactions {
        let amount = ensure_amount(&format!("amount of transaction {}", tx.id), tx.amount)?;
        if !tx.is_expense() {
            continue;
        }
        if let Some(merchant) = tx.merchant.as_deref().filter(|m| !m.trim().is_empty()) {
            groups.add(merchant, tx, amount);
        }
    }

    let mut merchants: Vec<MerchantAggregate> = groups
        .into_groups()
        .into_iter()
        .filter(|(_, _, count)| *count >= min_count.max(1))
        .map(|(merchant, total, count)| MerchantAggregate {
            merchant,
            total,
            count,
            average: total / count as f64,
        })
        .collect();

    merchants.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal))
            .then_with(|| a.merchant.cmp(&b.merchant))
    });

    Ok(merchants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::parse_timestamp;

    fn expense(id: &str, category: &str, amount: f64) -> Transaction {
        Transaction::new(
            id,
            parse_timestamp("2024-06-01").unwrap(),
            TransactionType::Expense,
            amount,
            category,
        )
        .unwrap()
    }

    fn income(id: &str, category: &str, amount: f64) -> Transaction {
        Transaction::new(
            id,
            parse_timestamp("2024-06-01").unwrap(),
            TransactionType::Income,
            amount,
            category,
        )
        .unwrap()
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Food   & Dining "), "food & dining");
        assert_eq!(normalize_label("FOOD"), "food");
    }

    #[test]
    fn test_categories_merge_case_and_whitespace() {
        let txs = vec![
            expense("1", "Food", 10.0),
            expense("2", "food ", 15.0),
            expense("3", "Rent", 900.0),
            expense("4", " FOOD", 5.0),
        ];
        let groups = aggregate_by_category(&txs).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "Food");
        assert_eq!(groups[0].total, 30.0);
        assert_eq!(groups[0].count, 3);
        assert_eq!(groups[1].category, "Rent");
    }

    #[test]
    fn test_label_comes_from_earliest_transaction() {
        let on = |id: &str, date: &str, category: &str| {
            Transaction::new(
                id,
                parse_timestamp(date).unwrap(),
                TransactionType::Expense,
                10.0,
                category,
            )
            .unwrap()
        };
        let txs = vec![
            on("b", "2024-02-01", "FOOD"),
            on("c", "2024-01-15", "Rent"),
            on("a", "2024-01-10", "food"),
            on("z", "2024-01-10", "Food"),
        ];
        let forward = aggregate_by_category(&txs).unwrap();
        let reversed: Vec<Transaction> = txs.iter().rev().cloned().collect();
        let backward = aggregate_by_category(&reversed).unwrap();

        assert_eq!(forward, backward);
        assert_eq!(forward[0].category, "food");
        assert_eq!(forward[0].count, 3);
        assert_eq!(forward[1].category, "Rent");
    }

    #[test]
    fn test_blank_category_is_uncategorized() {
        let txs = vec![expense("1", "", 10.0), expense("2", "   ", 2.0)];
        let groups = aggregate_by_category(&txs).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, UNCATEGORIZED_LABEL);
        assert_eq!(groups[0].count, 2);
    }

    #[test]
    fn test_aggregate_for_one_type() {
        let txs = vec![
            expense("1", "Food", 10.0),
            income("2", "Salary", 5000.0),
            expense("3", "Travel", 300.0),
        ];
        let expenses = aggregate_by_category_for(&txs, TransactionType::Expense).unwrap();
        assert_eq!(expenses.len(), 2);
        assert!(expenses.iter().all(|c| c.category != "Salary"));
    }

    #[test]
    fn test_negative_amount_fails() {
        let mut txs = vec![expense("1", "Food", 10.0)];
        txs[0].amount = -3.0;
        assert!(matches!(
            aggregate_by_category(&txs),
            Err(Error::InvalidNumericInput(_))
        ));
    }

    #[test]
    fn test_top_n_ties_break_by_name() {
        let groups = vec![
            CategoryAggregate {
                category: "Travel".into(),
                total: 100.0,
                count: 1,
            },
            CategoryAggregate {
                category: "Books".into(),
                total: 100.0,
                count: 4,
            },
            CategoryAggregate {
                category: "Rent".into(),
                total: 900.0,
                count: 1,
            },
            CategoryAggregate {
                category: "Coffee".into(),
                total: 20.0,
                count: 9,
            },
        ];
        let top = top_n(&groups, 3);
        let names: Vec<&str> = top.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Rent", "Books", "Travel"]);
        assert!(top_n(&groups, 0).is_empty());
        assert_eq!(top_n(&groups, 10).len(), 4);
    }

    #[test]
    fn test_repeated_merchants() {
        let txs = vec![
            expense("1", "Food", 4.0).with_merchant("Blue Bottle"),
            expense("2", "Food", 6.0).with_merchant("blue bottle"),
            expense("3", "Food", 5.0).with_merchant("Blue  Bottle"),
            expense("4", "Shopping", 60.0).with_merchant("Store"),
            expense("5", "Shopping", 40.0).with_merchant("Store"),
            expense("6", "Shopping", 10.0).with_merchant("Kiosk"),
            income("7", "Refund", 60.0).with_merchant("Store"),
            expense("8", "Misc", 1.0),
        ];
        let merchants = repeated_merchants(&txs, 2).unwrap();
        assert_eq!(merchants.len(), 2);
        assert_eq!(merchants[0].merchant, "Blue Bottle");
        assert_eq!(merchants[0].count, 3);
        assert_eq!(merchants[0].average, 5.0);
        assert_eq!(merchants[1].merchant, "Store");
        assert_eq!(merchants[1].total, 100.0);
    }
}

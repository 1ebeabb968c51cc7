// 🗂️ Grouping Engine - category → date → transactions
// Pure, total transform: every record lands in exactly one DateGroup

use crate::transaction::Transaction;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

// ============================================================================
// DERIVED TYPES
// ============================================================================

/// Transactions sharing one category and one date, in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub transactions: Vec<Transaction>,
}

impl DateGroup {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn total_amount(&self) -> f64 {
        self.transactions.iter().map(|tx| tx.amount).sum()
    }
}

/// Category label → date groups sorted ascending by date.
/// `BTreeMap` keeps category keys in ascending lexicographic order.
pub type CategorizedGroups = BTreeMap<String, Vec<DateGroup>>;

// ============================================================================
// GROUPING
// ============================================================================

/// Group transactions by category, then by date.
///
/// Within a date the original relative order is kept, so the result is
/// deterministic for a given input order. Duplicate ids are not checked.
pub fn group_transactions(transactions: &[Transaction]) -> CategorizedGroups {
    // category → date → transactions (both levels ordered by key)
    let mut partitions: BTreeMap<&str, BTreeMap<NaiveDate, Vec<Transaction>>> = BTreeMap::new();

    for tx in transactions {
        partitions
            .entry(tx.category.as_str())
            .or_default()
            .entry(tx.date)
            .or_default()
            .push(tx.clone());
    }

    let groups: CategorizedGroups = partitions
        .into_iter()
        .map(|(category, by_date)| {
            let date_groups = by_date
                .into_iter()
                .map(|(date, transactions)| DateGroup { date, transactions })
                .collect();
            (category.to_string(), date_groups)
        })
        .collect();

    tracing::debug!(
        transactions = transactions.len(),
        categories = groups.len(),
        "grouped transactions"
    );

    groups
}

// ============================================================================
// SUMMARIES
// ============================================================================

/// Number of transactions in a category
pub fn transaction_count(date_groups: &[DateGroup]) -> usize {
    date_groups.iter().map(DateGroup::len).sum()
}

/// Sum of amounts in a category
pub fn category_total(date_groups: &[DateGroup]) -> f64 {
    date_groups.iter().map(DateGroup::total_amount).sum()
}

/// Number of transactions across every category
pub fn total_transactions(groups: &CategorizedGroups) -> usize {
    groups.values().map(|date_groups| transaction_count(date_groups)).sum()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::seed_transactions;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tx(id: u32, description: &str, amount: f64, day: &str, category: &str) -> Transaction {
        Transaction::new(id, description, amount, date(day), category)
    }

    #[test]
    fn test_same_day_same_category_keeps_input_order() {
        let input = vec![
            tx(1, "Starbucks", 5.99, "2025-02-27", "Coffee Shop"),
            tx(5, "Starbucks", 4.50, "2025-02-27", "Coffee Shop"),
        ];

        let groups = group_transactions(&input);

        assert_eq!(groups.len(), 1);
        let coffee = &groups["Coffee Shop"];
        assert_eq!(coffee.len(), 1);
        assert_eq!(coffee[0].date, date("2025-02-27"));
        let ids: Vec<u32> = coffee[0].transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn test_empty_input() {
        let groups = group_transactions(&[]);
        assert!(groups.is_empty());
        assert_eq!(total_transactions(&groups), 0);
    }

    #[test]
    fn test_seed_conserves_records() {
        let seed = seed_transactions();
        let groups = group_transactions(&seed);

        assert_eq!(total_transactions(&groups), seed.len());
        assert_eq!(groups.len(), 13);
    }

    #[test]
    fn test_each_transaction_in_matching_group_only() {
        let seed = seed_transactions();
        let groups = group_transactions(&seed);

        for original in &seed {
            let mut hits = 0;
            for (category, date_groups) in &groups {
                for group in date_groups {
                    for t in &group.transactions {
                        if t.id == original.id {
                            assert_eq!(category, &original.category);
                            assert_eq!(group.date, original.date);
                            hits += 1;
                        }
                    }
                }
            }
            assert_eq!(hits, 1, "transaction {} found {} times", original.id, hits);
        }
    }

    #[test]
    fn test_categories_and_dates_sorted() {
        let groups = group_transactions(&seed_transactions());

        let keys: Vec<&String> = groups.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys.first().map(|k| k.as_str()), Some("Book Store"));
        assert_eq!(keys.last().map(|k| k.as_str()), Some("Pharmacy"));

        for date_groups in groups.values() {
            assert!(date_groups.windows(2).all(|w| w[0].date < w[1].date));
        }
    }

    #[test]
    fn test_dates_sorted_ascending_regardless_of_input_order() {
        let groups = group_transactions(&seed_transactions());

        // Hardware: 2025-02-24 (Home Depot) appears before 2025-07-29 (PS Store)
        let hardware = &groups["Hardware"];
        assert_eq!(hardware.len(), 2);
        assert_eq!(hardware[0].date, date("2025-02-24"));
        assert_eq!(hardware[1].date, date("2025-07-29"));

        // Fast Food arrives newest first in the seed
        let fast_food: Vec<NaiveDate> = groups["Fast Food"].iter().map(|g| g.date).collect();
        assert_eq!(
            fast_food,
            vec![date("2025-02-24"), date("2025-02-25"), date("2025-02-26")]
        );
    }

    #[test]
    fn test_interleaved_input_stays_stable() {
        let input = vec![
            tx(8, "AMC Theater", 18.00, "2025-02-26", "Entertainment"),
            tx(9, "Walgreens", 12.30, "2025-02-26", "Pharmacy"),
            tx(21, "Cinema City", 25.00, "2025-02-26", "Entertainment"),
        ];

        let groups = group_transactions(&input);
        let ids: Vec<u32> = groups["Entertainment"][0]
            .transactions
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![8, 21]);
    }

    #[test]
    fn test_duplicate_ids_are_tolerated() {
        let input = vec![
            tx(1, "Starbucks", 5.99, "2025-02-27", "Coffee Shop"),
            tx(1, "Starbucks", 5.99, "2025-02-27", "Coffee Shop"),
        ];

        let groups = group_transactions(&input);
        assert_eq!(total_transactions(&groups), 2);
    }

    #[test]
    fn test_category_summaries() {
        let groups = group_transactions(&seed_transactions());
        let coffee = &groups["Coffee Shop"];

        assert_eq!(transaction_count(coffee), 3);
        assert!((category_total(coffee) - 16.74).abs() < 1e-9);
    }
}

// 💳 Transaction Model - Immutable records + embedded seed dataset
// Records are created once at load time and never mutated afterwards

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// TRANSACTION
// ============================================================================

/// A single financial record.
///
/// `date` is a calendar date, so comparisons are chronological no matter how
/// the value was written on input. It serializes as ISO-8601 (`2025-02-27`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Stable identifier (uniqueness is not enforced by grouping)
    pub id: u32,

    pub description: String,

    /// Signed amount, negative values are credits
    pub amount: f64,

    pub date: NaiveDate,

    /// Primary grouping key
    pub category: String,
}

impl Transaction {
    pub fn new(
        id: u32,
        description: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Transaction {
            id,
            description: description.into(),
            amount,
            date,
            category: category.into(),
        }
    }

    /// Literal display of the amount: `$5.99`, `$-3.00`
    pub fn display_amount(&self) -> String {
        format!("${:.2}", self.amount)
    }

    /// Credits (negative amounts) are shown differently from debits
    pub fn is_credit(&self) -> bool {
        self.amount < 0.0
    }

    /// ISO-8601 date label used by date headers and item rows
    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

// ============================================================================
// SEED DATA
// ============================================================================

/// (id, description, amount, date, category)
const SEED: [(u32, &str, f64, &str, &str); 22] = [
    (1, "Starbucks", 5.99, "2025-02-27", "Coffee Shop"),
    (2, "Whole Foods", 45.30, "2025-02-27", "Grocery"),
    (3, "Barnes & Noble", 23.75, "2025-02-27", "Book Store"),
    (4, "CVS Pharmacy", 15.20, "2025-02-27", "Pharmacy"),
    (5, "Starbucks", 4.50, "2025-02-27", "Coffee Shop"),
    (6, "McDonalds", 8.99, "2025-02-26", "Fast Food"),
    (7, "Shell Gas", 40.00, "2025-02-26", "Gas Station"),
    (8, "AMC Theater", 18.00, "2025-02-26", "Entertainment"),
    (9, "Walgreens", 12.30, "2025-02-26", "Pharmacy"),
    (10, "App Store", 9.99, "2025-02-26", "Digital"),
    (11, "Kroger", 67.89, "2025-02-25", "Grocery"),
    (12, "H&M", 54.20, "2025-02-25", "Clothing"),
    (13, "Supercuts", 35.00, "2025-02-25", "Personal Care"),
    (14, "PetSmart", 28.45, "2025-02-25", "Pet Store"),
    (15, "McDonalds", 7.85, "2025-02-25", "Fast Food"),
    (16, "Netflix", 12.99, "2025-02-24", "Digital"),
    (17, "Home Depot", 38.75, "2025-02-24", "Hardware"),
    (18, "Car Wash", 15.00, "2025-02-24", "Car Care"),
    (19, "Burger King", 9.85, "2025-02-24", "Fast Food"),
    (20, "Starbucks", 6.25, "2025-02-24", "Coffee Shop"),
    (21, "Cinema City", 25.00, "2025-02-26", "Entertainment"),
    (22, "PS Store", 438.99, "2025-07-29", "Hardware"),
];

/// The embedded dataset shown when no CSV file is configured.
///
/// The literals above are fixed and well-formed; a date that fails to parse
/// is skipped with a warning rather than panicking.
pub fn seed_transactions() -> Vec<Transaction> {
    SEED.iter()
        .filter_map(|&(id, description, amount, date, category)| {
            match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                Ok(date) => Some(Transaction::new(id, description, amount, date, category)),
                Err(e) => {
                    tracing::warn!(id, date, error = %e, "skipping seed record with invalid date");
                    None
                }
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

// 📥 Ingestion Boundary - CSV → validated Transactions
// Malformed records are rejected here so grouping only ever sees clean input

use crate::transaction::Transaction;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("line {line}: malformed record: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("line {line}: invalid date {value:?} (expected YYYY-MM-DD)")]
    InvalidDate { line: usize, value: String },

    #[error("line {line}: amount {value} is not a finite number")]
    InvalidAmount { line: usize, value: f64 },

    #[error("line {line}: category is empty")]
    EmptyCategory { line: usize },

    #[error("line {line}: duplicate id {id}")]
    DuplicateId { line: usize, id: u32 },
}

// ============================================================================
// RAW RECORD
// ============================================================================

/// One CSV row before validation
#[derive(Debug, Deserialize)]
struct RawRecord {
    id: u32,
    description: String,
    amount: f64,
    date: String,
    category: String,
}

impl RawRecord {
    fn validate(self, line: usize) -> Result<Transaction, IngestError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|_| {
            IngestError::InvalidDate {
                line,
                value: self.date.clone(),
            }
        })?;

        if !self.amount.is_finite() {
            return Err(IngestError::InvalidAmount {
                line,
                value: self.amount,
            });
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(IngestError::EmptyCategory { line });
        }

        Ok(Transaction::new(
            self.id,
            self.description.trim(),
            self.amount,
            date,
            category,
        ))
    }
}

// ============================================================================
// LOADERS
// ============================================================================

/// Load transactions from a CSV file with an
/// `id,description,amount,date,category` header.
pub fn load_csv(path: &Path) -> Result<Vec<Transaction>, IngestError> {
    let rdr = csv::Reader::from_path(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let transactions = read_transactions(rdr)?;
    tracing::info!(path = %path.display(), count = transactions.len(), "loaded transactions from CSV");

    Ok(transactions)
}

/// Same as [`load_csv`] for any reader (used for in-memory input)
pub fn load_csv_from_reader<R: Read>(reader: R) -> Result<Vec<Transaction>, IngestError> {
    read_transactions(csv::Reader::from_reader(reader))
}

fn read_transactions<R: Read>(mut rdr: csv::Reader<R>) -> Result<Vec<Transaction>, IngestError> {
    let mut transactions = Vec::new();
    let mut seen_ids = HashSet::new();

    for (index, result) in rdr.deserialize::<RawRecord>().enumerate() {
        // Line 1 is the header
        let line = index + 2;

        let raw = result.map_err(|source| IngestError::Malformed { line, source })?;
        let tx = raw.validate(line)?;

        if !seen_ids.insert(tx.id) {
            return Err(IngestError::DuplicateId { line, id: tx.id });
        }

        transactions.push(tx);
    }

    Ok(transactions)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,description,amount,date,category\n";

    fn load(body: &str) -> Result<Vec<Transaction>, IngestError> {
        let input = format!("{}{}", HEADER, body);
        load_csv_from_reader(input.as_bytes())
    }

    #[test]
    fn test_load_valid_rows() {
        let txs = load(
            "1,Starbucks,5.99,2025-02-27,Coffee Shop\n\
             2,Whole Foods,45.30,2025-02-27,Grocery\n",
        )
        .unwrap();

        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].description, "Starbucks");
        assert_eq!(txs[0].date, NaiveDate::from_ymd_opt(2025, 2, 27).unwrap());
        assert_eq!(txs[1].category, "Grocery");
    }

    #[test]
    fn test_load_sample_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/transactions.csv");
        let txs = load_csv(&path).unwrap();

        assert_eq!(txs.len(), 23);
        assert!(txs.iter().take(22).all(|t| !t.is_credit()));
        assert!(txs[22].is_credit());
    }

    #[test]
    fn test_load_empty_file() {
        let txs = load("").unwrap();
        assert!(txs.is_empty());
    }

    #[test]
    fn test_reject_invalid_date() {
        let err = load(
            "1,Starbucks,5.99,2025-02-27,Coffee Shop\n\
             2,Whole Foods,45.30,27/02/2025,Grocery\n",
        )
        .unwrap_err();

        match err {
            IngestError::InvalidDate { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "27/02/2025");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reject_empty_category() {
        let err = load("1,Starbucks,5.99,2025-02-27,  \n").unwrap_err();
        assert!(matches!(err, IngestError::EmptyCategory { line: 2 }));
    }

    #[test]
    fn test_reject_duplicate_id() {
        let err = load(
            "7,Shell Gas,40.00,2025-02-26,Gas Station\n\
             7,Shell Gas,40.00,2025-02-26,Gas Station\n",
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::DuplicateId { line: 3, id: 7 }));
    }

    #[test]
    fn test_reject_unparseable_amount() {
        let err = load("1,Starbucks,five,2025-02-27,Coffee Shop\n").unwrap_err();
        assert!(matches!(err, IngestError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_reject_negative_id() {
        let err = load("-1,Starbucks,5.99,2025-02-27,Coffee Shop\n").unwrap_err();
        assert!(matches!(err, IngestError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_error_message_names_line() {
        let err = load("1,Starbucks,5.99,2025-13-01,Coffee Shop\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 2: invalid date \"2025-13-01\" (expected YYYY-MM-DD)"
        );
    }
}

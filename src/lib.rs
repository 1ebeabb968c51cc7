// Category Ledger - Core Library
// Grouping + expansion state, usable by the terminal UI, the CLI and tests

pub mod config;
pub mod expansion;
pub mod grouping;
pub mod ingest;
pub mod session;
pub mod transaction;
pub mod transition;
pub mod view;

// Re-export commonly used types
pub use config::Settings;
pub use expansion::ExpansionState;
pub use grouping::{
    category_total, group_transactions, total_transactions, transaction_count,
    CategorizedGroups, DateGroup,
};
pub use ingest::{load_csv, load_csv_from_reader, IngestError};
pub use session::{CategorySnapshot, Session, Snapshot};
pub use transaction::{seed_transactions, Transaction};
pub use transition::{Direction, Transition, Transitions, DEFAULT_TRANSITION};
pub use view::{
    expansion_marker, next_category_header, previous_category_header, project_rows,
    project_rows_with, render_text, sticky_header_index, Row,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

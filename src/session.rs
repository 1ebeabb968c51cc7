// 🧭 Session - grouped data + expansion flags + transitions for one screen
// Everything here is discarded when the screen closes

use crate::expansion::ExpansionState;
use crate::grouping::{
    category_total, group_transactions, total_transactions, transaction_count, CategorizedGroups,
    DateGroup,
};
use crate::transaction::Transaction;
use crate::transition::Transitions;
use crate::view::{project_rows, project_rows_with, Row};
use serde::Serialize;
use std::time::{Duration, Instant};

pub struct Session {
    groups: CategorizedGroups,
    expansion: ExpansionState,
    transitions: Transitions,
}

impl Session {
    /// Group the transactions and seed an expanded flag for every category
    pub fn new(transactions: &[Transaction], transition: Duration) -> Self {
        let groups = group_transactions(transactions);
        let expansion = ExpansionState::initialize(groups.keys().cloned());

        tracing::info!(
            transactions = transactions.len(),
            categories = groups.len(),
            "session initialized"
        );

        Session {
            groups,
            expansion,
            transitions: Transitions::new(transition),
        }
    }

    pub fn groups(&self) -> &CategorizedGroups {
        &self.groups
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn total_transactions(&self) -> usize {
        total_transactions(&self.groups)
    }

    pub fn is_expanded(&self, category: &str) -> bool {
        self.expansion.is_expanded(category)
    }

    /// Toggle a category and start its enter/exit transition.
    /// Unknown categories are ignored and reported as `None`.
    pub fn toggle(&mut self, category: &str, now: Instant) -> Option<bool> {
        if !self.groups.contains_key(category) {
            tracing::warn!(category, "ignoring toggle for unknown category");
            return None;
        }

        let expanded = self.expansion.toggle(category);
        self.transitions.start(category, expanded, now);
        Some(expanded)
    }

    /// Collapse the named categories without transitions (initial layout).
    /// Returns the names that matched no category.
    pub fn collapse_initially<'n>(&mut self, categories: &'n [String]) -> Vec<&'n str> {
        let mut unknown = Vec::new();

        for category in categories {
            if !self.groups.contains_key(category) {
                unknown.push(category.as_str());
            } else if self.expansion.is_expanded(category) {
                self.expansion.toggle(category);
            }
        }

        if !unknown.is_empty() {
            tracing::warn!(?unknown, "start_collapsed names unknown categories");
        }
        unknown
    }

    pub fn expand_all(&mut self, now: Instant) {
        self.set_all(true, now);
    }

    pub fn collapse_all(&mut self, now: Instant) {
        self.set_all(false, now);
    }

    fn set_all(&mut self, expanded: bool, now: Instant) {
        let changed: Vec<String> = self
            .expansion
            .iter()
            .filter(|(_, flag)| *flag != expanded)
            .map(|(category, _)| category.to_string())
            .collect();

        if expanded {
            self.expansion.expand_all();
        } else {
            self.expansion.collapse_all();
        }

        for category in &changed {
            self.transitions.start(category, expanded, now);
        }
        tracing::debug!(expanded, changed = changed.len(), "set all categories");
    }

    /// Rows to draw at `now`, including partially revealed categories
    pub fn rows_at(&self, now: Instant) -> Vec<Row<'_>> {
        project_rows_with(&self.groups, &self.expansion, |category| {
            self.transitions.visible_fraction(category, now)
        })
    }

    /// Rows for the settled state (no transitions)
    pub fn rows(&self) -> Vec<Row<'_>> {
        project_rows(&self.groups, &self.expansion)
    }

    /// Drop finished transitions; true while any are still running
    pub fn tick(&mut self, now: Instant) -> bool {
        self.transitions.prune(now);
        self.transitions.is_animating()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            total_transactions: self.total_transactions(),
            categories: self
                .groups
                .iter()
                .map(|(category, date_groups)| CategorySnapshot {
                    category,
                    expanded: self.expansion.is_expanded(category),
                    transaction_count: transaction_count(date_groups),
                    total_amount: category_total(date_groups),
                    date_groups,
                })
                .collect(),
        }
    }
}

// ============================================================================
// SNAPSHOT (json output)
// ============================================================================

#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub total_transactions: usize,
    pub categories: Vec<CategorySnapshot<'a>>,
}

#[derive(Debug, Serialize)]
pub struct CategorySnapshot<'a> {
    pub category: &'a str,
    pub expanded: bool,
    pub transaction_count: usize,
    pub total_amount: f64,
    pub date_groups: &'a [DateGroup],
}

// ============================================================================
// TESTS
// ============================================================================

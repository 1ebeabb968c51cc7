// 📜 Row Projection - grouped data + expansion flags → flat list of rows
// The host calls this after every toggle and renders whatever comes back

use crate::expansion::ExpansionState;
use crate::grouping::{category_total, transaction_count, CategorizedGroups};
use crate::transaction::Transaction;
use chrono::NaiveDate;
use std::fmt::Write as _;

pub const EXPANDED_MARKER: char = '▼';
pub const COLLAPSED_MARKER: char = '▲';

// ============================================================================
// ROWS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Row<'a> {
    CategoryHeader {
        category: &'a str,
        expanded: bool,
        count: usize,
        total: f64,
    },
    DateHeader {
        category: &'a str,
        date: NaiveDate,
    },
    Item {
        category: &'a str,
        transaction: &'a Transaction,
    },
}

impl<'a> Row<'a> {
    pub fn category(&self) -> &'a str {
        match self {
            Row::CategoryHeader { category, .. }
            | Row::DateHeader { category, .. }
            | Row::Item { category, .. } => *category,
        }
    }

    pub fn is_category_header(&self) -> bool {
        matches!(self, Row::CategoryHeader { .. })
    }
}

/// Marker shown next to a category name
pub fn expansion_marker(expanded: bool) -> char {
    if expanded {
        EXPANDED_MARKER
    } else {
        COLLAPSED_MARKER
    }
}

// ============================================================================
// PROJECTION
// ============================================================================

/// Rows for the current state: every category header, and the date headers
/// and items of expanded categories only.
pub fn project_rows<'a>(groups: &'a CategorizedGroups, state: &ExpansionState) -> Vec<Row<'a>> {
    project_rows_with(groups, state, |_| None)
}

/// Like [`project_rows`], but `reveal` may report a visible fraction
/// (0.0..=1.0) for a category that is mid-transition. Such a category shows
/// that share of its child rows, rounded up, whatever its flag says.
pub fn project_rows_with<'a, F>(
    groups: &'a CategorizedGroups,
    state: &ExpansionState,
    reveal: F,
) -> Vec<Row<'a>>
where
    F: Fn(&str) -> Option<f64>,
{
    let mut rows = Vec::new();

    for (category, date_groups) in groups {
        let category = category.as_str();
        let expanded = state.is_expanded(category);

        rows.push(Row::CategoryHeader {
            category,
            expanded,
            count: transaction_count(date_groups),
            total: category_total(date_groups),
        });

        let fraction = match reveal(category) {
            Some(fraction) => fraction.clamp(0.0, 1.0),
            None if expanded => 1.0,
            None => continue,
        };

        let children: Vec<Row<'a>> = date_groups
            .iter()
            .flat_map(move |group| {
                std::iter::once(Row::DateHeader {
                    category,
                    date: group.date,
                })
                .chain(
                    group
                        .transactions
                        .iter()
                        .map(move |transaction| Row::Item { category, transaction }),
                )
            })
            .collect();

        let visible = (children.len() as f64 * fraction).ceil() as usize;
        rows.extend(children.into_iter().take(visible));
    }

    rows
}

// ============================================================================
// STICKY HEADERS
// ============================================================================

/// Index of the date header pinned above the row at `top`.
///
/// The pinned header is the closest date header at or before `top` within
/// the same category. A category header at `top` pins nothing.
pub fn sticky_header_index(rows: &[Row<'_>], top: usize) -> Option<usize> {
    if top >= rows.len() {
        return None;
    }

    for index in (0..=top).rev() {
        match rows[index] {
            Row::DateHeader { .. } => return Some(index),
            Row::CategoryHeader { .. } => return None,
            Row::Item { .. } => {}
        }
    }

    None
}

/// Index of the next category header strictly after `from`, if any
pub fn next_category_header(rows: &[Row<'_>], from: usize) -> Option<usize> {
    rows.iter()
        .enumerate()
        .skip(from + 1)
        .find(|(_, row)| row.is_category_header())
        .map(|(index, _)| index)
}

/// Index of the closest category header strictly before `from`, if any
pub fn previous_category_header(rows: &[Row<'_>], from: usize) -> Option<usize> {
    rows.iter()
        .enumerate()
        .take(from.min(rows.len()))
        .rev()
        .find(|(_, row)| row.is_category_header())
        .map(|(index, _)| index)
}

// ============================================================================
// PLAIN TEXT
// ============================================================================

/// Render rows as indented text (used by the `print` command)
pub fn render_text(rows: &[Row<'_>]) -> String {
    let mut out = String::new();

    for row in rows {
        // Writing into a String cannot fail
        let _ = match row {
            Row::CategoryHeader {
                category,
                expanded,
                count,
                ..
            } => writeln!(out, "{} {} ({})", expansion_marker(*expanded), category, count),
            Row::DateHeader { date, .. } => writeln!(out, "  {}", date.format("%Y-%m-%d")),
            Row::Item { transaction, .. } => writeln!(
                out,
                "    {:<28}{:>12}",
                transaction.description,
                transaction.display_amount()
            ),
        };
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================

// 🔽 View State Controller - per-category expand/collapse flags
// Owned by the session; the host reads flags and forwards toggles back in

use serde::Serialize;
use std::collections::BTreeMap;

/// Category → expanded flag.
///
/// Seed it from the grouped category keys with [`ExpansionState::initialize`]
/// so every category has an explicit entry. A missing key reads as expanded;
/// that fallback lives only in [`ExpansionState::is_expanded`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpansionState {
    flags: BTreeMap<String, bool>,
}

impl ExpansionState {
    /// Every given category starts expanded
    pub fn initialize<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = ExpansionState::default();
        state.ensure_categories(categories);
        state
    }

    /// Add entries for categories not seen yet.
    ///
    /// Existing entries keep their current flag, so calling this again after
    /// a re-render never undoes a toggle. Returns how many keys were added.
    pub fn ensure_categories<I, S>(&mut self, categories: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for category in categories {
            self.flags.entry(category.into()).or_insert_with(|| {
                added += 1;
                true
            });
        }
        added
    }

    /// Flip the flag for `category` and return the new value
    pub fn toggle(&mut self, category: &str) -> bool {
        let expanded = !self.is_expanded(category);
        if !self.flags.contains_key(category) {
            tracing::warn!(category, "toggle on uninitialized category");
        }
        self.flags.insert(category.to_string(), expanded);
        tracing::debug!(category, expanded, "toggled category");
        expanded
    }

    pub fn is_expanded(&self, category: &str) -> bool {
        self.flags.get(category).copied().unwrap_or(true)
    }

    pub fn expand_all(&mut self) {
        self.flags.values_mut().for_each(|flag| *flag = true);
    }

    pub fn collapse_all(&mut self) {
        self.flags.values_mut().for_each(|flag| *flag = false);
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn expanded_count(&self) -> usize {
        self.flags.values().filter(|flag| **flag).count()
    }

    /// Read-only view of every entry, ordered by category
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(category, flag)| (category.as_str(), *flag))
    }
}

// ============================================================================
// TESTS
// ============================================================================

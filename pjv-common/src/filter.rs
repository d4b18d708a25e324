//! Interactive filter engine
//!
//! A `FilterSelection` is a conjunction of optional predicates. Applying
//! it is a pure function of (table, selection); the hosting interface
//! layer calls `apply` on every input event.

use serde::{Deserialize, Serialize};

use crate::model::CaseRow;

/// Fixed window of recent year labels offered as the default selection,
/// intersected with the years actually present in the table.
pub const DEFAULT_YEAR_WINDOW: [&str; 7] =
    ["2026", "2025", "2024", "2023", "2022", "2021", "2020"];

/// Session-scoped filter state. Empty/unset members contribute no
/// constraint; all active members combine with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Case-insensitive substring over the subject identifier
    pub subject_contains: Option<String>,
    /// Case-insensitive substring over the opposing-party text
    pub opposing_contains: Option<String>,
    /// Venue codes (set membership)
    #[serde(default)]
    pub venues: Vec<String>,
    /// Year labels (set membership)
    #[serde(default)]
    pub years: Vec<String>,
    /// Procedural classes (set membership)
    #[serde(default)]
    pub classes: Vec<String>,
    /// Subject-matter categories (set membership)
    #[serde(default)]
    pub matters: Vec<String>,
}

impl FilterSelection {
    /// True when no predicate is active (matches everything)
    pub fn is_unconstrained(&self) -> bool {
        !has_text(&self.subject_contains)
            && !has_text(&self.opposing_contains)
            && self.venues.is_empty()
            && self.years.is_empty()
            && self.classes.is_empty()
            && self.matters.is_empty()
    }

    /// Whether a single row satisfies every active predicate
    pub fn matches(&self, row: &CaseRow) -> bool {
        contains_ci(&row.subject_id, &self.subject_contains)
            && contains_ci(&row.opposing_party, &self.opposing_contains)
            && in_set(&row.venue, &self.venues)
            && in_set(&row.filing_year, &self.years)
            && in_set(&row.class, &self.classes)
            && in_set(&row.matter, &self.matters)
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Null-safe, case-insensitive substring predicate: a row with no value
/// in the column never matches a non-empty filter.
fn contains_ci(field: &Option<String>, needle: &Option<String>) -> bool {
    match needle.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        None => true,
        Some(n) => field
            .as_deref()
            .is_some_and(|f| f.to_lowercase().contains(&n.to_lowercase())),
    }
}

/// Set-membership predicate; an empty set matches everything
fn in_set(field: &Option<String>, set: &[String]) -> bool {
    set.is_empty() || field.as_deref().is_some_and(|f| set.iter().any(|s| s == f))
}

/// Apply a selection to the table, producing the filtered view.
///
/// Pure: the same (table, selection) pair always yields the same rows,
/// and an unconstrained selection returns the full table.
pub fn apply(table: &[CaseRow], selection: &FilterSelection) -> Vec<CaseRow> {
    table
        .iter()
        .filter(|row| selection.matches(row))
        .cloned()
        .collect()
}

/// Build the default selection for a freshly loaded session: the
/// preferred venue if present in the data, and the recent-year window
/// intersected with the years present.
pub fn default_selection(table: &[CaseRow], preferred_venue: &str) -> FilterSelection {
    let venue_present = table
        .iter()
        .any(|r| r.venue.as_deref() == Some(preferred_venue));
    let venues = if venue_present {
        vec![preferred_venue.to_string()]
    } else {
        Vec::new()
    };

    let years = DEFAULT_YEAR_WINDOW
        .iter()
        .filter(|y| table.iter().any(|r| r.filing_year.as_deref() == Some(**y)))
        .map(|y| y.to_string())
        .collect();

    FilterSelection {
        venues,
        years,
        ..Default::default()
    }
}

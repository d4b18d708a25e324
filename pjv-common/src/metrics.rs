//! KPI and frequency aggregations over the consolidated table
//!
//! All functions take a row slice so they work identically on the full
//! table and on a filtered view.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::CaseRow;

/// Headline metrics for a (possibly filtered) view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    /// Number of case rows
    pub case_count: usize,
    /// Distinct subject identifiers among the rows
    pub distinct_subjects: usize,
    /// Sum of normalized claim values
    pub total_claim_value: f64,
    /// Distinct venue codes among the rows
    pub distinct_venues: usize,
}

/// Compute the four headline KPIs
pub fn kpis(rows: &[CaseRow]) -> Kpis {
    let distinct_subjects: HashSet<_> =
        rows.iter().filter_map(|r| r.subject_id.as_deref()).collect();
    let distinct_venues: HashSet<_> = rows.iter().filter_map(|r| r.venue.as_deref()).collect();
    Kpis {
        case_count: rows.len(),
        distinct_subjects: distinct_subjects.len(),
        total_claim_value: rows.iter().map(|r| r.claim_value).sum(),
        distinct_venues: distinct_venues.len(),
    }
}

/// Frequency count over one optional column, None values skipped.
/// Ordered by descending count, ties broken by label (stable).
pub fn value_counts<'a, F>(rows: &'a [CaseRow], column: F) -> Vec<(String, usize)>
where
    F: Fn(&'a CaseRow) -> Option<&'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        if let Some(value) = column(row) {
            *counts.entry(value).or_insert(0) += 1;
        }
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Top-N helper over `value_counts` ordering
pub fn top_n<'a, F>(rows: &'a [CaseRow], column: F, n: usize) -> Vec<(String, usize)>
where
    F: Fn(&'a CaseRow) -> Option<&'a str>,
{
    let mut counts = value_counts(rows, column);
    counts.truncate(n);
    counts
}

/// Per-year case counts, ascending by year label; rows without a year
/// label are excluded.
pub fn year_counts(rows: &[CaseRow]) -> Vec<(String, usize)> {
    let mut counts = value_counts(rows, |r| r.filing_year.as_deref());
    counts.sort_by(|a, b| a.0.cmp(&b.0));
    counts
}

/// Per-venue case counts (all distinct venues, not limited to top-N)
pub fn venue_counts(rows: &[CaseRow]) -> Vec<(String, usize)> {
    value_counts(rows, |r| r.venue.as_deref())
}

/// Sorted distinct values of one optional column (for filter options)
pub fn distinct_values<'a, F>(rows: &'a [CaseRow], column: F) -> Vec<String>
where
    F: Fn(&'a CaseRow) -> Option<&'a str>,
{
    let mut values: Vec<String> = rows
        .iter()
        .filter_map(|r| column(r))
        .collect::<HashSet<_>>()
        .into_iter()
        .map(String::from)
        .collect();
    values.sort();
    values
}

//! Absence analyzer: subjects searched but with no matching record
//!
//! Pure set membership over the registry and the consolidated table; no
//! fuzzy matching and no identifier normalization.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::CaseRow;

/// Both complement reports, preserving the registry's original order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbsenceReport {
    /// Total subjects ever searched
    pub searched_total: usize,
    /// Venue code used for the restricted analysis
    pub preferred_venue: String,
    /// Registry subjects with no case anywhere in the table
    pub missing_overall: Vec<String>,
    /// Registry subjects with no case in the preferred venue
    pub missing_in_preferred: Vec<String>,
}

/// Compute the general and venue-restricted complement lists
pub fn analyze(registry: &[String], table: &[CaseRow], preferred_venue: &str) -> AbsenceReport {
    let present: HashSet<&str> = table
        .iter()
        .filter_map(|r| r.subject_id.as_deref())
        .collect();
    let present_in_venue: HashSet<&str> = table
        .iter()
        .filter(|r| r.venue.as_deref() == Some(preferred_venue))
        .filter_map(|r| r.subject_id.as_deref())
        .collect();

    AbsenceReport {
        searched_total: registry.len(),
        preferred_venue: preferred_venue.to_string(),
        missing_overall: complement(registry, &present),
        missing_in_preferred: complement(registry, &present_in_venue),
    }
}

/// Registry entries absent from `present`, in registry order
fn complement(registry: &[String], present: &HashSet<&str>) -> Vec<String> {
    registry
        .iter()
        .filter(|id| !present.contains(id.as_str()))
        .cloned()
        .collect()
}

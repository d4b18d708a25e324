//! Filter option lists and default selections

use axum::{extract::State, Json};
use pjv_common::{filter, metrics};
use serde::Serialize;

use super::view::ViewError;
use crate::AppState;

/// Everything the UI needs to populate its filter widgets
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    /// All distinct venue codes, ascending
    pub venues: Vec<String>,
    /// All distinct year labels, most recent first
    pub years: Vec<String>,
    /// All distinct procedural classes, ascending
    pub classes: Vec<String>,
    /// Top-20 subject-matter categories by frequency
    pub matters: Vec<String>,
    /// Default selections applied on first load
    pub default_venues: Vec<String>,
    pub default_years: Vec<String>,
}

/// GET /api/options
pub async fn get_options(
    State(state): State<AppState>,
) -> Result<Json<OptionsResponse>, ViewError> {
    let snapshot = state.cache.lock().expect("cache poisoned").get()?;
    let rows = &snapshot.rows;

    let mut years = metrics::distinct_values(rows, |r| r.filing_year.as_deref());
    years.reverse();

    let matters = metrics::top_n(rows, |r| r.matter.as_deref(), 20)
        .into_iter()
        .map(|(label, _)| label)
        .collect();

    let defaults = filter::default_selection(rows, &state.config.dashboard.preferred_venue);

    Ok(Json(OptionsResponse {
        venues: metrics::distinct_values(rows, |r| r.venue.as_deref()),
        years,
        classes: metrics::distinct_values(rows, |r| r.class.as_deref()),
        matters,
        default_venues: defaults.venues,
        default_years: defaults.years,
    }))
}

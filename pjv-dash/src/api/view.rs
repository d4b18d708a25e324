//! Filtered view, CSV export, and cache reload
//!
//! The filter engine itself is pure (`pjv_common::filter::apply`); these
//! handlers only translate query parameters, recompute the KPIs and chart
//! series from the filtered view, and serialize the result.

use std::cmp::Ordering;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use pjv_common::filter::FilterSelection;
use pjv_common::metrics::{self, Kpis};
use pjv_common::model::CaseRow;
use pjv_common::{filter, Error};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::AppState;

/// Filter query parameters. Multi-value selections arrive as one
/// pipe-separated parameter (category labels may contain commas).
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    /// Substring over the subject identifier
    pub subject: Option<String>,
    /// Substring over the opposing-party text
    pub opposing: Option<String>,
    pub venues: Option<String>,
    pub years: Option<String>,
    pub classes: Option<String>,
    pub matters: Option<String>,
}

impl ViewQuery {
    pub fn into_selection(self) -> FilterSelection {
        FilterSelection {
            subject_contains: self.subject,
            opposing_contains: self.opposing,
            venues: split_multi(self.venues),
            years: split_multi(self.years),
            classes: split_multi(self.classes),
            matters: split_multi(self.matters),
        }
    }
}

fn split_multi(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split('|')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// One labeled count in a chart series
#[derive(Debug, Serialize)]
pub struct CountEntry {
    pub label: String,
    pub count: usize,
}

fn series(counts: Vec<(String, usize)>) -> Vec<CountEntry> {
    counts
        .into_iter()
        .map(|(label, count)| CountEntry { label, count })
        .collect()
}

/// Filtered-view response: KPIs, the two chart series, and the detail
/// rows sorted by claim value descending.
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub kpis: Kpis,
    pub venue_share: Vec<CountEntry>,
    pub yearly_trend: Vec<CountEntry>,
    pub rows: Vec<CaseRow>,
}

/// GET /api/view
///
/// Recomputes KPIs and both chart series purely from the filtered view,
/// never from the full table.
pub async fn get_view(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<ViewResponse>, ViewError> {
    let snapshot = state.cache.lock().expect("cache poisoned").get()?;
    let selection = query.into_selection();

    let mut rows = filter::apply(&snapshot.rows, &selection);
    let kpis = metrics::kpis(&rows);
    let venue_share = series(metrics::venue_counts(&rows));
    let yearly_trend = series(metrics::year_counts(&rows));

    rows.sort_by(|a, b| {
        b.claim_value
            .partial_cmp(&a.claim_value)
            .unwrap_or(Ordering::Equal)
    });

    Ok(Json(ViewResponse {
        kpis,
        venue_share,
        yearly_trend,
        rows,
    }))
}

/// GET /api/export
///
/// Downloads exactly the currently filtered rows as a UTF-8 CSV.
pub async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Response, ViewError> {
    let snapshot = state.cache.lock().expect("cache poisoned").get()?;
    let selection = query.into_selection();

    let mut rows = filter::apply(&snapshot.rows, &selection);
    rows.sort_by(|a, b| {
        b.claim_value
            .partial_cmp(&a.claim_value)
            .unwrap_or(Ordering::Equal)
    });

    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        writer
            .write_record(pjv_common::model::CSV_COLUMNS)
            .map_err(|e| ViewError::Internal(e.to_string()))?;
    }
    for row in &rows {
        writer
            .serialize(row)
            .map_err(|e| ViewError::Internal(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ViewError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"dados_filtrados.csv\"",
            ),
        ],
        bytes,
    )
        .into_response())
}

/// POST /api/reload
///
/// Explicit cache invalidation: the next view re-reads the artifacts.
pub async fn reload(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.cache.lock().expect("cache poisoned").invalidate();
    Json(json!({ "status": "reloaded" }))
}

/// View API errors
#[derive(Debug)]
pub enum ViewError {
    /// Consolidated artifacts not present yet
    MissingData(String),
    Internal(String),
}

impl From<Error> for ViewError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(msg) => ViewError::MissingData(msg),
            other => ViewError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ViewError::MissingData(msg) => (StatusCode::NOT_FOUND, msg),
            ViewError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

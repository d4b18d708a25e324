//! Absence report: subjects searched but with no matching record

use axum::{extract::State, Json};
use pjv_common::absence::{self, AbsenceReport};

use super::view::ViewError;
use crate::AppState;

/// GET /api/absence
///
/// Both complement lists (general and preferred-venue-restricted) with
/// their counts. 404 when the registry artifact is missing.
pub async fn get_absence(
    State(state): State<AppState>,
) -> Result<Json<AbsenceReport>, ViewError> {
    let snapshot = state.cache.lock().expect("cache poisoned").get()?;
    let registry = snapshot.registry.as_ref().ok_or_else(|| {
        ViewError::MissingData(format!(
            "registry {} not found (run pjv-report first)",
            state.config.registry_path.display()
        ))
    })?;

    let report = absence::analyze(
        registry,
        &snapshot.rows,
        &state.config.dashboard.preferred_venue,
    );
    Ok(Json(report))
}

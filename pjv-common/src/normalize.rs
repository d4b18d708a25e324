//! Field normalization for the consolidated table
//!
//! Coercion is total: a bad date degrades to None, a bad claim value
//! degrades to 0. No row is ever dropped here.

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::model::CaseRow;

/// Parse a `DD/MM/YYYY` filing date; None on any mismatch, including
/// impossible calendar dates like `31/02/2024`.
pub fn parse_filing_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y").ok()
}

/// Parse a locale-formatted claim value.
///
/// When a comma is present it is the decimal separator and periods are
/// thousands separators ("1.234,56" -> 1234.56). Without a comma the
/// string is parsed as-is. Anything unparseable yields 0.
pub fn parse_claim_value(raw: &str) -> f64 {
    try_parse_claim_value(raw).unwrap_or(0.0)
}

/// Like `parse_claim_value` but distinguishes a failed parse from a
/// genuine zero
fn try_parse_claim_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let canonical = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    canonical.parse::<f64>().ok()
}

/// Normalize every row in place: parsed filing date, derived year label,
/// numeric claim value. An empty collection is returned unchanged.
///
/// Claim values that were present but unparseable are counted and logged
/// once per run, since they silently flatten to 0 in the summed-value KPI.
pub fn normalize(rows: &mut [CaseRow]) {
    if rows.is_empty() {
        return;
    }

    let mut coerced_claims = 0usize;
    for row in rows.iter_mut() {
        row.filing_date = row.filing_date_raw.as_deref().and_then(parse_filing_date);
        row.filing_year = row.filing_date.map(|d| d.year().to_string());

        match row.claim_value_raw.take() {
            Some(raw) => match try_parse_claim_value(&raw) {
                Some(value) => row.claim_value = value,
                None => {
                    row.claim_value = 0.0;
                    if !raw.trim().is_empty() {
                        coerced_claims += 1;
                    }
                }
            },
            None => row.claim_value = 0.0,
        }
    }

    if coerced_claims > 0 {
        warn!(
            "{} claim value(s) could not be parsed and were set to 0",
            coerced_claims
        );
    }
}

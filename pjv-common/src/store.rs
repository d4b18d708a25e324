//! Consolidated store: CSV table + JSON subject registry
//!
//! These two files are the sole contract between the batch pipeline and
//! the dashboard; the dashboard never re-reads the per-subject documents.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::debug;

use crate::model::{CaseRow, CSV_COLUMNS};
use crate::normalize::parse_filing_date;
use crate::Result;

/// Write the consolidated table as a UTF-8 CSV with a header row.
///
/// An empty table still gets its header so the file round-trips.
pub fn write_table(path: &Path, rows: &[CaseRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        writer.write_record(CSV_COLUMNS)?;
    } else {
        for row in rows {
            writer.serialize(row)?;
        }
    }
    writer.flush()?;
    debug!("wrote {} row(s) to {}", rows.len(), path.display());
    Ok(())
}

/// Read the consolidated table back, re-deriving the parsed filing date
/// from the raw column (the parsed form is never persisted).
pub fn read_table(path: &Path) -> Result<Vec<CaseRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize::<CaseRow>() {
        let mut row = record?;
        row.filing_date = row.filing_date_raw.as_deref().and_then(parse_filing_date);
        rows.push(row);
    }
    Ok(rows)
}

/// Persist the searched-subject registry as a JSON string array
pub fn write_registry(path: &Path, registry: &[String]) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), registry)?;
    Ok(())
}

/// Read the searched-subject registry
pub fn read_registry(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

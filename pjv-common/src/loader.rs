//! Record loader: per-subject JSON documents -> flattened case rows
//!
//! A parse failure on any single file is logged and skipped; it never
//! aborts the run.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::model::{CaseRow, LoadSummary, LookupDocument};
use crate::{Error, Result};

/// Everything a load run produces: the flattened rows, the tallies, and
/// the registry of every subject identifier that was looked up (in
/// directory enumeration order, found or not).
#[derive(Debug, Default)]
pub struct LoadOutput {
    pub rows: Vec<CaseRow>,
    pub summary: LoadSummary,
    pub registry: Vec<String>,
}

/// Load every regular file in `dir` as a lookup document and flatten all
/// case entries into one row-per-case collection.
///
/// Rows are tagged with the originating document's subject identifier and
/// lookup timestamp. Ordering follows directory enumeration order, which
/// is platform-dependent; callers must treat it as unordered.
pub fn load_directory(dir: &Path) -> Result<LoadOutput> {
    if !dir.is_dir() {
        return Err(Error::NotFound(format!(
            "input directory {} does not exist",
            dir.display()
        )));
    }

    let mut out = LoadOutput::default();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("skipping unreadable directory entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        match parse_document(&path) {
            Ok(doc) => {
                out.summary.total_files += 1;
                if let Some(id) = &doc.subject_id {
                    out.registry.push(id.clone());
                }
                if doc.has_cases() {
                    out.summary.with_cases += 1;
                    let cases = doc.cases.unwrap_or_default();
                    for case in cases {
                        out.rows
                            .push(case.into_row(doc.subject_id.clone(), doc.looked_up_at.clone()));
                    }
                } else {
                    out.summary.without_cases += 1;
                }
            }
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
            }
        }
    }

    debug!(
        "loaded {} case row(s) from {} file(s) ({} with cases, {} without)",
        out.rows.len(),
        out.summary.total_files,
        out.summary.with_cases,
        out.summary.without_cases
    );

    Ok(out)
}

/// Parse a single lookup document
fn parse_document(path: &Path) -> Result<LookupDocument> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_doc(dir: &Path, name: &str, content: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn summary_counts_add_up() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(
            dir.path(),
            "a.json",
            r#"{"chave_pesquisa":"111","data_consulta":"2026-01-01T00:00:00",
                "processos":[{"numero_processo":"0001","tribunal":"TJGO"}]}"#,
        );
        write_doc(
            dir.path(),
            "b.json",
            r#"{"chave_pesquisa":"222","data_consulta":"2026-01-02T00:00:00",
                "processos":[{"numero_processo":"0002","tribunal":"TJSP"}]}"#,
        );
        write_doc(dir.path(), "c.json", r#"{"chave_pesquisa":"333","processos":[]}"#);

        let out = load_directory(dir.path()).unwrap();
        assert_eq!(out.summary.total_files, 3);
        assert_eq!(out.summary.with_cases, 2);
        assert_eq!(out.summary.without_cases, 1);
        assert_eq!(
            out.summary.total_files,
            out.summary.with_cases + out.summary.without_cases
        );
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.registry.len(), 3);
    }

    #[test]
    fn rows_inherit_subject_and_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(
            dir.path(),
            "a.json",
            r#"{"chave_pesquisa":"12345678900","data_consulta":"2026-02-01T12:00:00",
                "processos":[{"numero_processo":"0001"},{"numero_processo":"0002"}]}"#,
        );

        let out = load_directory(dir.path()).unwrap();
        assert_eq!(out.rows.len(), 2);
        for row in &out.rows {
            assert_eq!(row.subject_id.as_deref(), Some("12345678900"));
            assert_eq!(row.looked_up_at.as_deref(), Some("2026-02-01T12:00:00"));
        }
    }

    #[test]
    fn malformed_file_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "bad.json", "{ this is not json");
        write_doc(
            dir.path(),
            "good.json",
            r#"{"chave_pesquisa":"111","processos":[{"numero_processo":"0001"}]}"#,
        );

        let out = load_directory(dir.path()).unwrap();
        // The malformed file is not counted at all
        assert_eq!(out.summary.total_files, 1);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.registry, vec!["111".to_string()]);
    }

    #[test]
    fn missing_directory_is_reported() {
        let err = load_directory(Path::new("/nonexistent/pjv-input")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn empty_directory_yields_empty_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = load_directory(dir.path()).unwrap();
        assert_eq!(out.summary, LoadSummary::default());
        assert!(out.rows.is_empty());
        assert!(out.registry.is_empty());
    }
}

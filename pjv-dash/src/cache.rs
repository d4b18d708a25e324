//! Memoized loader for the consolidated table and the registry
//!
//! Keyed by the table file's modification time: the table is re-read only
//! when the mtime changes or after an explicit `invalidate`. Never
//! auto-invalidates on its own.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use pjv_common::model::CaseRow;
use pjv_common::{store, Error, Result};
use tracing::info;

/// One loaded snapshot of the two artifacts
#[derive(Clone)]
pub struct Snapshot {
    pub rows: Arc<Vec<CaseRow>>,
    /// None when the registry file does not exist
    pub registry: Option<Arc<Vec<String>>>,
}

pub struct TableCache {
    table_path: PathBuf,
    registry_path: PathBuf,
    loaded: Option<(SystemTime, Snapshot)>,
}

impl TableCache {
    pub fn new(table_path: PathBuf, registry_path: PathBuf) -> Self {
        Self {
            table_path,
            registry_path,
            loaded: None,
        }
    }

    /// Return the cached snapshot, re-reading the files when the table's
    /// mtime changed since the last read. A missing table is NotFound;
    /// a missing registry degrades to None.
    pub fn get(&mut self) -> Result<Snapshot> {
        let mtime = std::fs::metadata(&self.table_path)
            .and_then(|m| m.modified())
            .map_err(|_| {
                Error::NotFound(format!(
                    "consolidated table {} not found (run pjv-report first)",
                    self.table_path.display()
                ))
            })?;

        if let Some((cached_mtime, snapshot)) = &self.loaded {
            if *cached_mtime == mtime {
                return Ok(snapshot.clone());
            }
        }

        let rows = store::read_table(&self.table_path)?;
        let registry = if self.registry_path.exists() {
            Some(Arc::new(store::read_registry(&self.registry_path)?))
        } else {
            None
        };
        info!(
            "Loaded consolidated table: {} row(s), registry {}",
            rows.len(),
            registry
                .as_ref()
                .map(|r| format!("{} subject(s)", r.len()))
                .unwrap_or_else(|| "missing".to_string())
        );

        let snapshot = Snapshot {
            rows: Arc::new(rows),
            registry,
        };
        self.loaded = Some((mtime, snapshot.clone()));
        Ok(snapshot)
    }

    /// Drop the cached snapshot; the next `get` re-reads from disk
    pub fn invalidate(&mut self) {
        self.loaded = None;
    }
}

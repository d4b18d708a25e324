//! # PJV Common Library
//!
//! Shared code for the PJV (Processos Judiciais Viewer) tools including:
//! - Data model for lookup documents and the consolidated case table
//! - Record loader (per-subject JSON documents -> flattened rows)
//! - Normalizer (date / claim-value coercion)
//! - Consolidated store (CSV table + JSON registry)
//! - Filter engine and KPI aggregation
//! - Absence analyzer (searched-but-not-found subjects)
//! - Configuration loading

pub mod absence;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod store;

pub use error::{Error, Result};
pub use model::{CaseRecord, CaseRow, LoadSummary, LookupDocument};

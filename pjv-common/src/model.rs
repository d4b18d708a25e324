//! Data model for lookup documents and the consolidated case table
//!
//! Wire field names (JSON documents, CSV columns) follow the upstream
//! search-service contract and are therefore Portuguese; Rust field names
//! are English. The CSV written by `store::write_table` and the documents
//! read by `loader` must keep these names stable.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One lookup-result document, one JSON file per searched subject.
///
/// Read-only input; unknown extra fields are ignored, every expected field
/// may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupDocument {
    /// Subject identifier the lookup was run for (CPF-like key)
    #[serde(rename = "chave_pesquisa")]
    pub subject_id: Option<String>,

    /// Timestamp the lookup was executed (kept as the raw string)
    #[serde(rename = "data_consulta")]
    pub looked_up_at: Option<String>,

    /// Case entries found for the subject; absent or null means none
    #[serde(rename = "processos", default)]
    pub cases: Option<Vec<CaseRecord>>,
}

impl LookupDocument {
    /// True when the lookup returned at least one case entry
    pub fn has_cases(&self) -> bool {
        self.cases.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// One judicial proceeding entry inside a lookup document.
///
/// Every field is optional: malformed or missing values degrade during
/// normalization, they never fail the pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseRecord {
    #[serde(rename = "numero_processo")]
    pub case_number: Option<String>,

    /// Subject-matter category
    #[serde(rename = "assunto")]
    pub matter: Option<String>,

    /// Procedural class category
    #[serde(rename = "classe")]
    pub class: Option<String>,

    /// Originating venue/court code (e.g. "TJGO")
    #[serde(rename = "tribunal")]
    pub venue: Option<String>,

    /// Filing date as a raw `DD/MM/YYYY` string
    #[serde(rename = "data_distribuicao")]
    pub filing_date: Option<String>,

    /// Claim value as a raw locale-formatted string ("1.234,56");
    /// upstream sometimes emits it as a bare JSON number instead
    #[serde(rename = "valor_causa", default, deserialize_with = "de_lenient_string")]
    pub claim_value: Option<String>,

    /// Opposing-party free text
    #[serde(rename = "partes_polo_passivo")]
    pub opposing_party: Option<String>,
}

impl CaseRecord {
    /// Flatten into a table row, tagging with the originating document's
    /// subject identifier and lookup timestamp. Derived columns are left
    /// unset; `normalize::normalize` fills them in.
    pub fn into_row(self, subject_id: Option<String>, looked_up_at: Option<String>) -> CaseRow {
        CaseRow {
            subject_id,
            looked_up_at,
            case_number: self.case_number,
            matter: self.matter,
            class: self.class,
            venue: self.venue,
            filing_date_raw: self.filing_date,
            filing_year: None,
            claim_value: 0.0,
            opposing_party: self.opposing_party,
            claim_value_raw: self.claim_value,
            filing_date: None,
        }
    }
}

/// Accept either a JSON string or a bare number for string-ish fields
fn de_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// One row of the consolidated table: a flattened case entry plus the
/// derived columns added by the normalizer.
///
/// Serializes straight to the CSV column contract. The `*_raw` / parsed
/// companions that do not appear in the file are `serde(skip)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseRow {
    /// Subject identifier of the originating lookup
    #[serde(rename = "cpf_consulta")]
    pub subject_id: Option<String>,

    /// Lookup timestamp of the originating document
    #[serde(rename = "data_consulta_ref")]
    pub looked_up_at: Option<String>,

    #[serde(rename = "numero_processo")]
    pub case_number: Option<String>,

    #[serde(rename = "assunto")]
    pub matter: Option<String>,

    #[serde(rename = "classe")]
    pub class: Option<String>,

    #[serde(rename = "tribunal")]
    pub venue: Option<String>,

    /// Filing date exactly as received (`DD/MM/YYYY`)
    #[serde(rename = "data_distribuicao")]
    pub filing_date_raw: Option<String>,

    /// Derived year label; None when the filing date did not parse
    #[serde(rename = "ano_distribuicao")]
    pub filing_year: Option<String>,

    /// Normalized claim value; 0 when absent or unparseable
    #[serde(
        rename = "valor_causa",
        deserialize_with = "de_claim_value",
        default
    )]
    pub claim_value: f64,

    #[serde(rename = "partes_polo_passivo")]
    pub opposing_party: Option<String>,

    /// Claim value exactly as received; consumed by the normalizer,
    /// never persisted
    #[serde(skip)]
    pub claim_value_raw: Option<String>,

    /// Parsed filing date; re-derived from `filing_date_raw` on read
    #[serde(skip)]
    pub filing_date: Option<NaiveDate>,
}

/// CSV header, in declaration order. Used when writing an empty table so
/// the file still round-trips.
pub const CSV_COLUMNS: [&str; 10] = [
    "cpf_consulta",
    "data_consulta_ref",
    "numero_processo",
    "assunto",
    "classe",
    "tribunal",
    "data_distribuicao",
    "ano_distribuicao",
    "valor_causa",
    "partes_polo_passivo",
];

/// Tolerant claim-value deserializer for CSV reads: empty cells and
/// locale-formatted leftovers coerce instead of erroring.
fn de_claim_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(crate::normalize::parse_claim_value)
        .unwrap_or(0.0))
}

/// Load-run tallies: how many documents were read and how many of them
/// carried case entries.
///
/// Invariant: `total_files == with_cases + without_cases`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub total_files: usize,
    pub with_cases: usize,
    pub without_cases: usize,
}

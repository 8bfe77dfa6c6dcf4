use std::collections::BTreeMap;
use std::path::PathBuf;

use ruleout_model::{CaseFailure, DiagnosticKind};

#[derive(Debug)]
pub struct ExportResult {
    pub cohort: String,
    pub output: PathBuf,
    pub catalog: Option<CatalogResult>,
    pub cases_found: usize,
    pub exported: usize,
    pub dropped: Vec<CaseFailure>,
    /// Rows removed by the post-filter.
    pub filtered: usize,
    pub rows_written: usize,
    pub random_ids: usize,
    pub diagnostics: BTreeMap<DiagnosticKind, usize>,
}

impl ExportResult {
    pub fn has_dropped(&self) -> bool {
        !self.dropped.is_empty()
    }
}

#[derive(Debug)]
pub struct CatalogResult {
    pub output: PathBuf,
    pub cases_found: usize,
    pub fields: usize,
    pub dropped: Vec<CaseFailure>,
}

/// One field of a single case, as listed by `ruleout fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub field_key: String,
    pub label: String,
    pub value: String,
}

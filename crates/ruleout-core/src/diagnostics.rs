//! Diagnostic sink for non-fatal anomalies.
//!
//! Every reported anomaly is stored once and emitted once as a `tracing`
//! event, so the run summary and the log stream always agree.

use std::collections::BTreeMap;

use ruleout_model::{Diagnostic, DiagnosticKind};
use tracing::{error, warn};

#[derive(Debug, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    emit: bool,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            emit: true,
        }
    }
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that stores without logging, for a second pass over cases whose
    /// anomalies were already reported.
    pub fn silent() -> Self {
        Self {
            entries: Vec::new(),
            emit: false,
        }
    }

    pub fn push(&mut self, kind: DiagnosticKind, case_index: Option<usize>, message: String) {
        if self.emit {
            let case = case_index.map(|index| index + 1);
            match kind {
                DiagnosticKind::CaseDropped => error!(kind = %kind, case = ?case, "{message}"),
                _ => warn!(kind = %kind, case = ?case, "{message}"),
            }
        }
        self.entries.push(Diagnostic {
            kind,
            case_index,
            message,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|entry| entry.kind == kind).count()
    }

    /// Diagnostic counts per kind; kinds that never occurred are omitted.
    pub fn counts(&self) -> BTreeMap<DiagnosticKind, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn for_case(&self, case_index: usize) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(move |entry| entry.case_index == Some(case_index))
    }
}

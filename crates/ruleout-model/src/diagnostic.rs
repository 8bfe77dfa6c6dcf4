use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a non-fatal anomaly found while processing a cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A question carried a label attribute without its type attribute.
    MissingTypeAttribute,
    /// Two observations of one field disagreed.
    ConflictingValues,
    /// The case had no identity sub-node or it lacked a last name.
    MissingIdentitySubnode,
    /// A required identity component was missing; a random ID was assigned.
    MissingIdentityComponent,
    /// The case was dropped from the output.
    CaseDropped,
}

impl DiagnosticKind {
    pub const ALL: [DiagnosticKind; 5] = [
        DiagnosticKind::MissingTypeAttribute,
        DiagnosticKind::ConflictingValues,
        DiagnosticKind::MissingIdentitySubnode,
        DiagnosticKind::MissingIdentityComponent,
        DiagnosticKind::CaseDropped,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::MissingTypeAttribute => "missing_type_attribute",
            DiagnosticKind::ConflictingValues => "conflicting_values",
            DiagnosticKind::MissingIdentitySubnode => "missing_identity_subnode",
            DiagnosticKind::MissingIdentityComponent => "missing_identity_component",
            DiagnosticKind::CaseDropped => "case_dropped",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Zero-based case position, when the anomaly belongs to a case.
    pub case_index: Option<usize>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.case_index {
            Some(index) => write!(f, "[{}] case #{}: {}", self.kind, index + 1, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::FieldKey;

/// Column name of the synthetic identifier field.
pub const ID_COLUMN: &str = "ID";

/// How a case identifier was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentitySource {
    /// SHA-256 of the identity components; reproducible across runs.
    Pseudonymous,
    /// Random UUID; identity components were missing.
    Random,
}

/// Flat de-identified record for one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseAssessment {
    pub id: String,
    pub identity: IdentitySource,
    pub fields: BTreeMap<FieldKey, String>,
}

impl CaseAssessment {
    pub fn new(id: impl Into<String>, identity: IdentitySource) -> Self {
        Self {
            id: id.into(),
            identity,
            fields: BTreeMap::new(),
        }
    }

    /// Look up a value by column name; `ID` resolves to the case identifier.
    pub fn get(&self, column: &str) -> Option<&str> {
        if column == ID_COLUMN {
            return Some(&self.id);
        }
        self.fields.get(column).map(String::as_str)
    }

    pub fn is_pseudonymous(&self) -> bool {
        self.identity == IdentitySource::Pseudonymous
    }
}

/// A case that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFailure {
    /// Zero-based position of the case in cohort order.
    pub index: usize,
    pub case_id: Option<String>,
    /// Raw attributes of the case node, for operator triage.
    pub attributes: Vec<(String, String)>,
    pub reason: String,
}

impl CaseFailure {
    /// Short human-readable case reference used in diagnostics.
    pub fn case_ref(&self) -> String {
        case_ref(self.index, self.case_id.as_deref())
    }
}

/// Formats `case #N` or `case #N (<id>)`.
pub fn case_ref(index: usize, case_id: Option<&str>) -> String {
    match case_id {
        Some(id) if !id.is_empty() => format!("case #{} ({id})", index + 1),
        _ => format!("case #{}", index + 1),
    }
}

/// Result of processing one case.
pub type CaseOutcome = Result<CaseAssessment, CaseFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_column_resolves_to_identifier() {
        let mut record = CaseAssessment::new("abc", IdentitySource::Random);
        record.fields.insert(FieldKey::new("age"), "45".to_string());
        assert_eq!(record.get(ID_COLUMN), Some("abc"));
        assert_eq!(record.get("age"), Some("45"));
        assert_eq!(record.get("sex"), None);
        assert!(!record.is_pseudonymous());
    }

    #[test]
    fn case_ref_is_one_based() {
        assert_eq!(case_ref(0, None), "case #1");
        assert_eq!(case_ref(4, Some("C-9")), "case #5 (C-9)");
        assert_eq!(case_ref(4, Some("")), "case #5");
    }
}

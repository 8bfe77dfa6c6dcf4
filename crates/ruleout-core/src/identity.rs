//! Pseudonymous case identifiers.
//!
//! The identifier is the SHA-256 of `case id + last name + patient id +
//! institution`, concatenated without separators. Identical inputs give the
//! identical identifier in every run, which allows linking exports without
//! exposing identity attributes. When a required component is missing the
//! case gets a random UUID instead, which is not reproducible across runs.

use ruleout_ingest::Node;
use ruleout_model::{DiagnosticKind, IdentityAttributes, IdentitySource};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::diagnostics::Diagnostics;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseIdentity {
    pub id: String,
    pub source: IdentitySource,
}

/// Hex SHA-256 of the four identity components in fixed order.
pub fn pseudonymous_id(
    case_id: &str,
    last_name: &str,
    patient_id: &str,
    institution: &str,
) -> String {
    let mut material = String::with_capacity(
        case_id.len() + last_name.len() + patient_id.len() + institution.len(),
    );
    material.push_str(case_id);
    material.push_str(last_name);
    material.push_str(patient_id);
    material.push_str(institution);
    sha256_hex(material.as_bytes())
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Fresh random identifier (hyphenated UUID v4).
pub fn random_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Default)]
pub struct IdentityHasher {
    attributes: IdentityAttributes,
}

impl IdentityHasher {
    pub fn new(attributes: IdentityAttributes) -> Self {
        Self { attributes }
    }

    pub fn attributes(&self) -> &IdentityAttributes {
        &self.attributes
    }

    /// Derive the identifier of `case`.
    ///
    /// Never fails. A missing last name degrades to an empty string; any
    /// other missing component degrades to a random identifier. Each
    /// degradation is reported once.
    pub fn identify(
        &self,
        case: &Node,
        case_index: usize,
        diagnostics: &mut Diagnostics,
    ) -> CaseIdentity {
        let subnode = case.first_child();
        let last_name = match subnode.and_then(|node| node.attr(&self.attributes.last_name)) {
            Some(value) => value,
            None => {
                let message = match subnode {
                    Some(node) => format!(
                        "identity sub-node <{}> has no {} attribute; using empty last name",
                        node.name(),
                        self.attributes.last_name
                    ),
                    None => "case has no identity sub-node; using empty last name".to_string(),
                };
                diagnostics.push(
                    DiagnosticKind::MissingIdentitySubnode,
                    Some(case_index),
                    message,
                );
                ""
            }
        };

        let case_id = case.attr(&self.attributes.case_id);
        let patient_id = subnode.and_then(|node| node.attr(&self.attributes.patient_id));
        let institution = subnode.and_then(|node| node.attr(&self.attributes.institution));

        if let (Some(case_id), Some(patient_id), Some(institution)) =
            (case_id, patient_id, institution)
        {
            return CaseIdentity {
                id: pseudonymous_id(case_id, last_name, patient_id, institution),
                source: IdentitySource::Pseudonymous,
            };
        }

        let missing: Vec<&str> = [
            (case_id.is_none(), self.attributes.case_id.as_str()),
            (patient_id.is_none(), self.attributes.patient_id.as_str()),
            (institution.is_none(), self.attributes.institution.as_str()),
        ]
        .into_iter()
        .filter_map(|(absent, name)| absent.then_some(name))
        .collect();
        diagnostics.push(
            DiagnosticKind::MissingIdentityComponent,
            Some(case_index),
            format!(
                "missing identity component(s) {}; assigned random identifier",
                missing.join(", ")
            ),
        );
        CaseIdentity {
            id: random_id(),
            source: IdentitySource::Random,
        }
    }
}

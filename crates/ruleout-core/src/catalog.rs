//! Cohort-wide label catalog for schema discovery.
//!
//! Every observed field is catalogued (no allow-list). Each case contributes
//! its resolved value per field, using the same precedence as record
//! building; the catalog keeps the distinct values across the cohort.

use ruleout_ingest::Node;
use ruleout_model::{CaseFailure, FieldKey, IdentityAttributes, LabelCatalog};
use tracing::{info, info_span};

use crate::assessment::drop_case;
use crate::diagnostics::Diagnostics;
use crate::extract::ExtractError;
use crate::resolve::{ResolvedField, resolve_case};

#[derive(Debug, Default)]
pub struct CatalogBuild {
    pub catalog: LabelCatalog,
    pub failures: Vec<CaseFailure>,
}

/// Accumulate the label catalog over all cases.
///
/// Cases that fail extraction are skipped and reported as dropped.
pub fn build_label_catalog(
    cases: &[&Node],
    identity: &IdentityAttributes,
    diagnostics: &mut Diagnostics,
) -> CatalogBuild {
    let span = info_span!("catalog", cases = cases.len());
    let _guard = span.enter();
    let mut build = CatalogBuild::default();
    for (index, case) in cases.iter().enumerate() {
        match resolve_case(case, index, diagnostics, |_| true) {
            Ok(resolver) => {
                for (key, field) in resolver.into_fields() {
                    build.catalog.record(key, &field.label, field.value);
                }
            }
            Err(error) => {
                let failure = drop_case(case, index, identity, &error, diagnostics);
                build.failures.push(failure);
            }
        }
    }
    info!(
        fields = build.catalog.len(),
        dropped = build.failures.len(),
        "built label catalog"
    );
    build
}

/// Every field of a single case with its label and resolved value.
pub fn case_fields(
    case: &Node,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<(FieldKey, ResolvedField)>, ExtractError> {
    let resolver = resolve_case(case, 0, diagnostics, |_| true)?;
    Ok(resolver.into_fields().into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruleout_model::DiagnosticKind;

    fn question(label: &str, key: &str, answer: &str) -> Node {
        Node::new("Question")
            .with_attribute("Label", label)
            .with_attribute("QuestionType", key)
            .with_attribute("Answer", answer)
    }

    fn case(questions: Vec<Node>) -> Node {
        questions
            .into_iter()
            .fold(Node::new("Case"), |case, question| case.with_child(question))
    }

    #[test]
    fn unions_per_case_values() {
        let first = case(vec![
            question("Age", "age", "45"),
            question("Sex", "sex", "F"),
        ]);
        let second = case(vec![
            question("Age (years)", "age", "45"),
            question("Age (years)", "age", "61"),
        ]);
        let third = case(vec![question("Age", "age", "")]);
        let mut diagnostics = Diagnostics::new();
        let build = build_label_catalog(
            &[&first, &second, &third],
            &IdentityAttributes::default(),
            &mut diagnostics,
        );

        let age = build.catalog.get("age").expect("age");
        assert_eq!(age.label, "Age");
        let values: Vec<&str> = age.values.iter().map(String::as_str).collect();
        assert_eq!(values, vec!["", "45", "61"]);
        assert_eq!(build.catalog.get("sex").expect("sex").values.len(), 1);
        assert!(build.failures.is_empty());
        assert_eq!(diagnostics.count(DiagnosticKind::ConflictingValues), 1);
    }

    #[test]
    fn failed_cases_are_skipped() {
        let good = case(vec![question("Age", "age", "45")]);
        let bad = case(vec![
            Node::new("Question")
                .with_attribute("Label", "Age")
                .with_attribute("QuestionType", "age"),
        ]);
        let mut diagnostics = Diagnostics::new();
        let build = build_label_catalog(
            &[&good, &bad],
            &IdentityAttributes::default(),
            &mut diagnostics,
        );
        assert_eq!(build.failures.len(), 1);
        assert_eq!(build.failures[0].index, 1);
        assert_eq!(diagnostics.count(DiagnosticKind::CaseDropped), 1);
        assert_eq!(build.catalog.get("age").expect("age").values.len(), 1);
    }

    #[test]
    fn lists_single_case_fields() {
        let node = case(vec![
            question("Sex", "sex", "F"),
            question("Age", "age", "45"),
        ]);
        let mut diagnostics = Diagnostics::new();
        let fields = case_fields(&node, &mut diagnostics).expect("fields");
        let keys: Vec<&str> = fields.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["age", "sex"]);
        assert_eq!(fields[0].1.label, "Age");
    }
}

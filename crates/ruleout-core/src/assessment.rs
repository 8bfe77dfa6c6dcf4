//! Per-case record building.

use ruleout_ingest::Node;
use ruleout_model::{
    AllowList, CaseAssessment, CaseFailure, CaseOutcome, CohortDefinition, DiagnosticKind,
    IdentityAttributes, case_ref,
};
use tracing::{debug, info, info_span};

use crate::diagnostics::Diagnostics;
use crate::extract::ExtractError;
use crate::identity::IdentityHasher;
use crate::resolve::resolve_case;

/// Builds one [`CaseAssessment`] per case, restricted to an allow-list.
#[derive(Debug, Clone)]
pub struct AssessmentBuilder {
    allow_list: AllowList,
    hasher: IdentityHasher,
}

impl AssessmentBuilder {
    pub fn new(allow_list: AllowList, identity: IdentityAttributes) -> Self {
        Self {
            allow_list,
            hasher: IdentityHasher::new(identity),
        }
    }

    pub fn from_cohort(cohort: &CohortDefinition) -> Self {
        Self::new(cohort.allow_list.clone(), cohort.identity.clone())
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Build the record for one case.
    ///
    /// An extraction error drops the whole case: the returned failure carries
    /// the case's raw attributes and a `CaseDropped` diagnostic is reported.
    pub fn assess_case(
        &self,
        case: &Node,
        case_index: usize,
        diagnostics: &mut Diagnostics,
    ) -> CaseOutcome {
        let identity = self.hasher.identify(case, case_index, diagnostics);
        let resolver = match resolve_case(case, case_index, diagnostics, |key| {
            self.allow_list.contains(key.as_str())
        }) {
            Ok(resolver) => resolver,
            Err(error) => {
                return Err(drop_case(
                    case,
                    case_index,
                    self.hasher.attributes(),
                    &error,
                    diagnostics,
                ));
            }
        };
        debug!(
            case = case_index + 1,
            fields = resolver.len(),
            "assessed case"
        );
        Ok(CaseAssessment {
            id: identity.id,
            identity: identity.source,
            fields: resolver.into_values(),
        })
    }

    /// Assess every case in order.
    pub fn assess_cohort(&self, cases: &[&Node]) -> CohortAssessment {
        self.assess_cohort_with(cases, |_, _| {})
    }

    /// Assess every case in order, calling `on_case` after each one.
    pub fn assess_cohort_with<F>(&self, cases: &[&Node], mut on_case: F) -> CohortAssessment
    where
        F: FnMut(usize, &CaseOutcome),
    {
        let span = info_span!("assess", cases = cases.len());
        let _guard = span.enter();
        let mut cohort = CohortAssessment::default();
        for (index, case) in cases.iter().enumerate() {
            let outcome = self.assess_case(case, index, &mut cohort.diagnostics);
            on_case(index, &outcome);
            cohort.outcomes.push(outcome);
        }
        info!(
            exported = cohort.exported_count(),
            dropped = cohort.dropped_count(),
            "assessed cohort"
        );
        cohort
    }
}

/// Stand-in for identity attribute values in diagnostics.
const REDACTED: &str = "[REDACTED]";

/// Record a dropped case and build its failure.
///
/// The diagnostic lists the case's raw attributes, with identity values masked.
pub(crate) fn drop_case(
    case: &Node,
    case_index: usize,
    identity: &IdentityAttributes,
    error: &ExtractError,
    diagnostics: &mut Diagnostics,
) -> CaseFailure {
    let failure = CaseFailure {
        index: case_index,
        case_id: case.attr(&identity.case_id).map(str::to_string),
        attributes: case.attributes().to_vec(),
        reason: error.to_string(),
    };
    let masked = [
        identity.last_name.as_str(),
        identity.patient_id.as_str(),
        identity.institution.as_str(),
    ];
    let attributes = failure
        .attributes
        .iter()
        .map(|(key, value)| {
            let value = if masked.contains(&key.as_str()) {
                REDACTED
            } else {
                value.as_str()
            };
            format!("{key}=\"{value}\"")
        })
        .collect::<Vec<_>>()
        .join(" ");
    diagnostics.push(
        DiagnosticKind::CaseDropped,
        Some(case_index),
        format!(
            "dropped {}: {error}; case attributes: [{attributes}]",
            failure.case_ref()
        ),
    );
    failure
}

/// Outcomes of a cohort pass, in case order, with every diagnostic raised.
#[derive(Debug, Default)]
pub struct CohortAssessment {
    pub outcomes: Vec<CaseOutcome>,
    pub diagnostics: Diagnostics,
}

impl CohortAssessment {
    pub fn records(&self) -> impl Iterator<Item = &CaseAssessment> {
        self.outcomes.iter().filter_map(|outcome| outcome.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseFailure> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.as_ref().err())
    }

    pub fn exported_count(&self) -> usize {
        self.records().count()
    }

    pub fn dropped_count(&self) -> usize {
        self.failures().count()
    }

    pub fn random_id_count(&self) -> usize {
        self.records()
            .filter(|record| !record.is_pseudonymous())
            .count()
    }

    /// Successful records in case order.
    pub fn into_records(self) -> Vec<CaseAssessment> {
        self.outcomes.into_iter().filter_map(Result::ok).collect()
    }

    /// Failed case references, for summaries.
    pub fn dropped_refs(&self) -> Vec<String> {
        self.failures()
            .map(|failure| case_ref(failure.index, failure.case_id.as_deref()))
            .collect()
    }
}

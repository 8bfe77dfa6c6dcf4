//! Conflict resolution for repeated observations of one field.
//!
//! Observations are applied in document order:
//! - first value for a key is taken as-is;
//! - an equal value is a no-op;
//! - a different non-empty value replaces the current one;
//! - a different empty value never replaces a non-empty one.
//!
//! Among several conflicting non-empty values the latest wins.

use std::collections::BTreeMap;

use ruleout_ingest::Node;
use ruleout_model::{DiagnosticKind, FieldKey, Observation};

use crate::diagnostics::Diagnostics;
use crate::extract::{ExtractError, Extraction, observations};

/// Current value of a field and the label of its latest observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub label: String,
    pub value: String,
}

/// What applying one observation did to the resolved state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// First observation of the key.
    Inserted,
    /// Same value as the current one.
    Unchanged,
    /// A different non-empty value replaced `previous`.
    Replaced { previous: String },
    /// A different empty value was ignored in favor of `kept`.
    Retained { kept: String },
}

impl Resolution {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Resolution::Replaced { .. } | Resolution::Retained { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConflictResolver {
    fields: BTreeMap<FieldKey, ResolvedField>,
}

impl ConflictResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, observation: Observation) -> Resolution {
        let Observation {
            field_key,
            label,
            answer,
            ..
        } = observation;
        let Some(current) = self.fields.get_mut(&field_key) else {
            self.fields.insert(
                field_key,
                ResolvedField {
                    label,
                    value: answer,
                },
            );
            return Resolution::Inserted;
        };
        current.label = label;
        if current.value == answer {
            Resolution::Unchanged
        } else if answer.is_empty() {
            Resolution::Retained {
                kept: current.value.clone(),
            }
        } else {
            let previous = std::mem::replace(&mut current.value, answer);
            Resolution::Replaced { previous }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|field| field.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> BTreeMap<FieldKey, ResolvedField> {
        self.fields
    }

    pub fn into_values(self) -> BTreeMap<FieldKey, String> {
        self.fields
            .into_iter()
            .map(|(key, field)| (key, field.value))
            .collect()
    }
}

/// Extract and resolve every observation of a case whose key passes `keep`.
///
/// Observations rejected by `keep` are dropped before resolution and never
/// produce conflict diagnostics. Missing type attributes are reported for
/// every question regardless of `keep`, since their key is unknown.
pub fn resolve_case<F>(
    case: &Node,
    case_index: usize,
    diagnostics: &mut Diagnostics,
    mut keep: F,
) -> Result<ConflictResolver, ExtractError>
where
    F: FnMut(&FieldKey) -> bool,
{
    let mut resolver = ConflictResolver::new();
    for extraction in observations(case) {
        match extraction? {
            Extraction::MissingType { convention, label } => diagnostics.push(
                DiagnosticKind::MissingTypeAttribute,
                Some(case_index),
                format!(
                    "no {} attribute in question '{label}'",
                    convention.type_attribute()
                ),
            ),
            Extraction::Observation(observation) => {
                if !keep(&observation.field_key) {
                    continue;
                }
                let key = observation.field_key.clone();
                let incoming = observation.answer.clone();
                match resolver.observe(observation) {
                    Resolution::Replaced { previous } => diagnostics.push(
                        DiagnosticKind::ConflictingValues,
                        Some(case_index),
                        format!("{key} already resolved to '{previous}', replaced by '{incoming}'"),
                    ),
                    Resolution::Retained { kept } => diagnostics.push(
                        DiagnosticKind::ConflictingValues,
                        Some(case_index),
                        format!("{key} already resolved to '{kept}', ignoring empty value"),
                    ),
                    Resolution::Inserted | Resolution::Unchanged => {}
                }
            }
        }
    }
    Ok(resolver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use ruleout_model::Convention;

    fn obs(key: &str, answer: &str) -> Observation {
        Observation::new(key, format!("{key} label"), answer, Convention::QuestionType)
    }

    #[test]
    fn applies_precedence_rules() {
        let mut resolver = ConflictResolver::new();
        assert_eq!(resolver.observe(obs("age", "45")), Resolution::Inserted);
        assert_eq!(resolver.observe(obs("age", "45")), Resolution::Unchanged);
        assert_eq!(
            resolver.observe(obs("age", "")),
            Resolution::Retained {
                kept: "45".to_string()
            }
        );
        assert_eq!(
            resolver.observe(obs("age", "46")),
            Resolution::Replaced {
                previous: "45".to_string()
            }
        );
        assert_eq!(resolver.get("age"), Some("46"));
    }

    #[test]
    fn empty_first_value_is_replaced_by_later_answer() {
        let mut resolver = ConflictResolver::new();
        resolver.observe(obs("age", ""));
        assert!(resolver.observe(obs("age", "45")).is_conflict());
        assert_eq!(resolver.get("age"), Some("45"));
    }

    #[test]
    fn three_way_conflict_takes_latest_non_empty() {
        let mut resolver = ConflictResolver::new();
        for answer in ["a", "b", "", "c", ""] {
            resolver.observe(obs("k", answer));
        }
        assert_eq!(resolver.get("k"), Some("c"));
    }

    #[test]
    fn label_follows_latest_observation() {
        let mut resolver = ConflictResolver::new();
        resolver.observe(Observation::new("k", "first", "x", Convention::LabelQuestionType));
        resolver.observe(Observation::new("k", "second", "", Convention::QuestionType));
        let fields = resolver.into_fields();
        assert_eq!(fields["k"].label, "second");
        assert_eq!(fields["k"].value, "x");
    }

    fn answer() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), "[a-c]{1,2}"]
    }

    proptest! {
        #[test]
        fn without_duplicates_resolution_is_identity(
            values in proptest::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{0,4}", 0..8)
        ) {
            let mut resolver = ConflictResolver::new();
            for (key, value) in &values {
                prop_assert_eq!(resolver.observe(obs(key, value)), Resolution::Inserted);
            }
            let resolved: BTreeMap<String, String> = resolver
                .into_values()
                .into_iter()
                .map(|(key, value)| (key.into_inner(), value))
                .collect();
            prop_assert_eq!(resolved, values);
        }

        #[test]
        fn agreeing_duplicates_keep_value(value in "[a-z0-9]{1,8}", repeats in 1usize..5) {
            let mut resolver = ConflictResolver::new();
            for _ in 0..=repeats {
                resolver.observe(obs("k", &value));
            }
            prop_assert_eq!(resolver.get("k"), Some(value.as_str()));
        }

        #[test]
        fn empty_never_overwrites_non_empty(value in "[a-z0-9]{1,8}") {
            let mut resolver = ConflictResolver::new();
            resolver.observe(obs("k", &value));
            resolver.observe(obs("k", ""));
            prop_assert_eq!(resolver.get("k"), Some(value.as_str()));
        }

        #[test]
        fn last_non_empty_wins(sequence in proptest::collection::vec(answer(), 1..10)) {
            let mut resolver = ConflictResolver::new();
            for value in &sequence {
                resolver.observe(obs("k", value));
            }
            let expected = sequence
                .iter()
                .rev()
                .find(|value| !value.is_empty())
                .cloned()
                .unwrap_or_default();
            prop_assert_eq!(resolver.get("k"), Some(expected.as_str()));
        }
    }
}

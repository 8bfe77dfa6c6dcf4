//! Field extraction from question nodes.
//!
//! A question encodes a field under `(Label, QuestionType)` or
//! `(Question, Type)`. Both pairings are tried on every question node, so
//! one node can yield zero, one, or two observations.

use ruleout_ingest::{Descendants, Node};
use ruleout_model::{Convention, Observation};
use thiserror::Error;

pub const QUESTION: &str = "Question";
pub const ANSWER: &str = "Answer";

/// Failure that aborts extraction for the whole case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("question '{label}' ({field_key}) has no Answer attribute")]
    MissingAnswer { field_key: String, label: String },
}

/// One item of a case's extraction stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction<'a> {
    Observation(Observation),
    /// A label attribute was present without its type attribute; the
    /// pairing was skipped.
    MissingType {
        convention: Convention,
        label: &'a str,
    },
}

/// Lazy stream of extractions over every question below a case.
///
/// Calling [`observations`] again restarts from the first question.
#[derive(Debug, Clone)]
pub struct Observations<'a> {
    nodes: Descendants<'a>,
    current: Option<&'a Node>,
    next_convention: usize,
}

/// Walk a case's descendants (any depth) and extract field observations.
pub fn observations(case: &Node) -> Observations<'_> {
    Observations {
        nodes: case.descendants(),
        current: None,
        next_convention: 0,
    }
}

impl<'a> Iterator for Observations<'a> {
    type Item = Result<Extraction<'a>, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(question) = self.current {
                while let Some(&convention) = Convention::ALL.get(self.next_convention) {
                    self.next_convention += 1;
                    if let Some(item) = read_pairing(question, convention) {
                        return Some(item);
                    }
                }
                self.current = None;
            }
            let node = self.nodes.next()?;
            if node.name() == QUESTION {
                self.current = Some(node);
                self.next_convention = 0;
            }
        }
    }
}

fn read_pairing(
    question: &Node,
    convention: Convention,
) -> Option<Result<Extraction<'_>, ExtractError>> {
    let label = question.attr(convention.label_attribute())?;
    let Some(field_key) = question.attr(convention.type_attribute()) else {
        return Some(Ok(Extraction::MissingType { convention, label }));
    };
    let Some(answer) = question.attr(ANSWER) else {
        return Some(Err(ExtractError::MissingAnswer {
            field_key: field_key.to_string(),
            label: label.to_string(),
        }));
    };
    Some(Ok(Extraction::Observation(Observation::new(
        field_key, label, answer, convention,
    ))))
}

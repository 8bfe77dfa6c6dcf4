use serde::{Deserialize, Serialize};

use crate::FieldKey;

/// Attribute naming convention a question used to encode its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Convention {
    /// `Label` + `QuestionType`.
    LabelQuestionType,
    /// `Question` + `Type`.
    QuestionType,
}

impl Convention {
    /// Conventions in the order they are tried on every question node.
    pub const ALL: [Convention; 2] = [Convention::LabelQuestionType, Convention::QuestionType];

    /// Attribute carrying the human-readable label.
    pub fn label_attribute(self) -> &'static str {
        match self {
            Convention::LabelQuestionType => "Label",
            Convention::QuestionType => "Question",
        }
    }

    /// Attribute carrying the field key.
    pub fn type_attribute(self) -> &'static str {
        match self {
            Convention::LabelQuestionType => "QuestionType",
            Convention::QuestionType => "Type",
        }
    }
}

/// One `(field key, label, answer)` triple read from a single question node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub field_key: FieldKey,
    pub label: String,
    /// Observed value; empty means "no information".
    pub answer: String,
    pub convention: Convention,
}

impl Observation {
    pub fn new(
        field_key: impl Into<FieldKey>,
        label: impl Into<String>,
        answer: impl Into<String>,
        convention: Convention,
    ) -> Self {
        Self {
            field_key: field_key.into(),
            label: label.into(),
            answer: answer.into(),
            convention,
        }
    }
}

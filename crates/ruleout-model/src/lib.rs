pub mod assessment;
pub mod catalog;
pub mod cohort;
pub mod diagnostic;
pub mod error;
pub mod field;
pub mod observation;

pub use assessment::{
    CaseAssessment, CaseFailure, CaseOutcome, ID_COLUMN, IdentitySource, case_ref,
};
pub use catalog::{LabelCatalog, LabelCatalogEntry};
pub use cohort::{
    CohortDefinition, CohortParseError, IdentityAttributes, RULEOUT_DEFAULT_FIELD, RangeFilter,
    load_cohort_definition,
};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{ConfigError, ModelError, Result};
pub use field::{AllowList, FieldKey};
pub use observation::{Convention, Observation};

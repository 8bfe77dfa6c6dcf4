//! Per-case extraction, conflict resolution, and pseudonymization.
//!
//! The pipeline for one case is:
//! 1. [`IdentityHasher`] derives the `ID` value
//! 2. [`observations`] walks every question below the case
//! 3. [`ConflictResolver`] merges repeated observations per field
//! 4. [`AssessmentBuilder`] keeps allow-listed fields and emits the record
//!
//! [`build_label_catalog`] runs steps 2-3 over every case without an
//! allow-list to collect the distinct values of every field.

pub mod assessment;
pub mod catalog;
pub mod diagnostics;
pub mod extract;
pub mod identity;
pub mod resolve;

pub use assessment::{AssessmentBuilder, CohortAssessment};
pub use catalog::{CatalogBuild, build_label_catalog, case_fields};
pub use diagnostics::Diagnostics;
pub use extract::{ExtractError, Extraction, Observations, observations};
pub use identity::{CaseIdentity, IdentityHasher, pseudonymous_id, random_id};
pub use resolve::{ConflictResolver, Resolution, ResolvedField, resolve_case};

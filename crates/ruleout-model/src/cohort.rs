//! Cohort definitions: which fields to export, where identity attributes
//! live, and which plausibility filter to apply.
//!
//! Definitions are loaded from TOML:
//!
//! ```toml
//! [cohort]
//! name = "ruleout"
//!
//! [fields]
//! allow = ["racoon-covid-19-annotation-pathology-lung-parenchyma", "age"]
//!
//! [identity]
//! case_id = "CaseID"
//!
//! [filter]
//! field = "age"
//! max = 100
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{AllowList, ConfigError, FieldKey, ModelError};

/// Field exported by the built-in ruleout cohort.
pub const RULEOUT_DEFAULT_FIELD: &str = "racoon-covid-19-annotation-pathology-lung-parenchyma";

/// Attribute names used to derive a case's pseudonymous identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityAttributes {
    /// Attribute on the case node.
    pub case_id: String,
    /// Attributes on the case's first child node.
    pub last_name: String,
    pub patient_id: String,
    pub institution: String,
}

impl Default for IdentityAttributes {
    fn default() -> Self {
        Self {
            case_id: "CaseID".to_string(),
            last_name: "LastName".to_string(),
            patient_id: "PatientID".to_string(),
            institution: "InstitutionName".to_string(),
        }
    }
}

/// Drops rows whose integer value for `field` falls outside `[min, max)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeFilter {
    pub field: FieldKey,
    /// Inclusive lower bound.
    #[serde(default)]
    pub min: Option<i64>,
    /// Exclusive upper bound.
    #[serde(default)]
    pub max: Option<i64>,
}

impl RangeFilter {
    pub fn below(field: impl Into<FieldKey>, max: i64) -> Self {
        Self {
            field: field.into(),
            min: None,
            max: Some(max),
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if let (Some(min), Some(max)) = (self.min, self.max)
            && min >= max
        {
            return Err(ModelError::InvalidRange {
                field: self.field.to_string(),
                min,
                max,
            });
        }
        Ok(())
    }

    pub fn is_out_of_range(&self, value: i64) -> bool {
        self.min.is_some_and(|min| value < min) || self.max.is_some_and(|max| value >= max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortDefinition {
    pub name: String,
    pub allow_list: AllowList,
    pub identity: IdentityAttributes,
    pub filter: Option<RangeFilter>,
}

impl CohortDefinition {
    /// The built-in ruleout cohort: one lung parenchyma field, no filter.
    pub fn ruleout() -> Self {
        Self {
            name: "ruleout".to_string(),
            allow_list: AllowList::single(FieldKey::new(RULEOUT_DEFAULT_FIELD)),
            identity: IdentityAttributes::default(),
            filter: None,
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, CohortParseError> {
        let file: CohortFile = toml::from_str(contents).map_err(CohortParseError::Toml)?;
        if let Some(filter) = &file.filter {
            filter.validate().map_err(CohortParseError::Invalid)?;
        }
        Ok(Self {
            name: file.cohort.name,
            allow_list: file.fields.allow,
            identity: file.identity,
            filter: file.filter,
        })
    }
}

/// Parse failure without file context.
#[derive(Debug, thiserror::Error)]
pub enum CohortParseError {
    #[error(transparent)]
    Toml(toml::de::Error),
    #[error(transparent)]
    Invalid(ModelError),
}

/// Load a cohort definition from a TOML file.
pub fn load_cohort_definition(path: &Path) -> Result<CohortDefinition, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    CohortDefinition::from_toml_str(&contents).map_err(|error| match error {
        CohortParseError::Toml(source) => ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        },
        CohortParseError::Invalid(source) => ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        },
    })
}

#[derive(Debug, Deserialize)]
struct CohortFile {
    cohort: CohortHeader,
    fields: FieldsSection,
    #[serde(default)]
    identity: IdentityAttributes,
    #[serde(default)]
    filter: Option<RangeFilter>,
}

#[derive(Debug, Deserialize)]
struct CohortHeader {
    name: String,
}

#[derive(Debug, Deserialize)]
struct FieldsSection {
    allow: AllowList,
}

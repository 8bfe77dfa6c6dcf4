use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use crate::{ID_COLUMN, ModelError};

/// Opaque, cohort-wide identifier of a logical field (the `QuestionType` or
/// `Type` attribute value of a question).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct FieldKey(String);

impl FieldKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FieldKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Ordered set of field keys retained in per-case records.
///
/// Order is the configured order and becomes the output column order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(into = "Vec<FieldKey>")]
pub struct AllowList {
    ordered: Vec<FieldKey>,
    lookup: BTreeSet<FieldKey>,
}

impl AllowList {
    /// Build an allow-list, rejecting empty lists, empty keys, duplicates and
    /// the reserved `ID` column name.
    pub fn new<I, K>(keys: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = K>,
        K: Into<FieldKey>,
    {
        let mut ordered = Vec::new();
        let mut lookup = BTreeSet::new();
        for key in keys {
            let key = key.into();
            if key.as_str().trim().is_empty() {
                return Err(ModelError::EmptyFieldKey);
            }
            if key.as_str() == ID_COLUMN {
                return Err(ModelError::ReservedFieldKey(key.into_inner()));
            }
            if !lookup.insert(key.clone()) {
                return Err(ModelError::DuplicateFieldKey(key.into_inner()));
            }
            ordered.push(key);
        }
        if ordered.is_empty() {
            return Err(ModelError::EmptyAllowList);
        }
        Ok(Self { ordered, lookup })
    }

    pub(crate) fn single(key: FieldKey) -> Self {
        Self {
            ordered: vec![key.clone()],
            lookup: BTreeSet::from([key]),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldKey> {
        self.ordered.iter()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl From<AllowList> for Vec<FieldKey> {
    fn from(list: AllowList) -> Self {
        list.ordered
    }
}

impl<'de> serde::Deserialize<'de> for AllowList {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let keys = Vec::<FieldKey>::deserialize(deserializer)?;
        Self::new(keys).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_keeps_configured_order() {
        let list = AllowList::new(["zeta", "alpha", "mid"]).expect("allow list");
        let keys: Vec<&str> = list.iter().map(FieldKey::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert!(list.contains("alpha"));
        assert!(!list.contains("omega"));
    }

    #[test]
    fn allow_list_rejects_duplicates_and_empties() {
        assert!(matches!(
            AllowList::new(["a", "a"]),
            Err(ModelError::DuplicateFieldKey(key)) if key == "a"
        ));
        assert!(matches!(
            AllowList::new(["a", " "]),
            Err(ModelError::EmptyFieldKey)
        ));
        assert!(matches!(
            AllowList::new(Vec::<String>::new()),
            Err(ModelError::EmptyAllowList)
        ));
    }

    #[test]
    fn allow_list_rejects_identifier_column() {
        assert!(matches!(
            AllowList::new(["age", "ID"]),
            Err(ModelError::ReservedFieldKey(key)) if key == "ID"
        ));
        assert!(AllowList::new(["id"]).is_ok());
    }
}

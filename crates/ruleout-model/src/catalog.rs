use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::FieldKey;

/// Representative label and the distinct values observed for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCatalogEntry {
    pub label: String,
    pub values: BTreeSet<String>,
}

/// Cohort-wide field catalog, keyed by field key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCatalog {
    pub entries: BTreeMap<FieldKey, LabelCatalogEntry>,
}

impl LabelCatalog {
    pub fn get(&self, key: &str) -> Option<&LabelCatalogEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &LabelCatalogEntry)> {
        self.entries.iter()
    }

    /// Record one case's representative label and value for a field.
    ///
    /// The first label recorded for a key is kept.
    pub fn record(&mut self, key: FieldKey, label: &str, value: String) {
        let entry = self.entries.entry(key).or_insert_with(|| LabelCatalogEntry {
            label: label.to_string(),
            values: BTreeSet::new(),
        });
        entry.values.insert(value);
    }
}

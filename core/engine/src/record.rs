//! FILENAME: core/engine/src/record.rs
//! PURPOSE: A single normalized list item.
//! CONTEXT: Keys are field internal names. A record is built once by the
//! normalizer and never mutated afterwards; the grouping engine only reads it.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// Shared empty value returned for missing fields.
static EMPTY: FieldValue = FieldValue::Empty;

/// A flat mapping from internal field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    values: FxHashMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Record {
            values: FxHashMap::default(),
        }
    }

    /// Builds a record from (internal name, value) pairs.
    /// Later pairs overwrite earlier ones with the same name.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Record {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Adds a field while the record is still being built.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Returns the value of a field, or `FieldValue::Empty` when absent.
    pub fn get(&self, name: &str) -> &FieldValue {
        self.values.get(name).unwrap_or(&EMPTY)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        Record {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

//! FILENAME: core/engine/src/value.rs
//! PURPOSE: Defines the scalar values a list record can hold.
//! CONTEXT: `FieldValue` is what a normalized record stores per column.
//! `GroupValue` is its hashable twin, used as the key of a group node so that
//! child lookup during tree building is a hash probe instead of a scan.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::date::format_us_date;

/// A single scalar value of a list record, after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Date(NaiveDateTime),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    /// Returns the numeric value, or None when the value is not a finite number.
    /// Text that happens to look like a number is NOT coerced.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as text for display.
    pub fn display_text(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Boolean(b) => {
                if *b { "true" } else { "false" }.to_string()
            }
            FieldValue::Date(d) => format_us_date(d),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Empty
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

/// Formats a number without unnecessary decimal places.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

// ============================================================================
// GROUP VALUE
// ============================================================================

/// Wrapper around f64 that implements Eq and Hash for use as HashMap keys.
/// NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            // -0.0 and 0.0 compare equal, so they must hash equal too
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

/// A normalized, hashable representation of a field value.
/// Two records land in the same group exactly when their GroupValues are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupValue {
    Empty,
    Number(OrderedFloat),
    Text(String),
    Boolean(bool),
    Date(NaiveDateTime),
}

impl From<&FieldValue> for GroupValue {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Empty => GroupValue::Empty,
            FieldValue::Number(n) => GroupValue::Number(OrderedFloat(*n)),
            FieldValue::Text(s) => GroupValue::Text(s.clone()),
            FieldValue::Boolean(b) => GroupValue::Boolean(*b),
            FieldValue::Date(d) => GroupValue::Date(*d),
        }
    }
}

impl From<&GroupValue> for FieldValue {
    fn from(value: &GroupValue) -> Self {
        match value {
            GroupValue::Empty => FieldValue::Empty,
            GroupValue::Number(n) => FieldValue::Number(n.0),
            GroupValue::Text(s) => FieldValue::Text(s.clone()),
            GroupValue::Boolean(b) => FieldValue::Boolean(*b),
            GroupValue::Date(d) => FieldValue::Date(*d),
        }
    }
}

impl GroupValue {
    /// Display label of a group key. A missing key renders as an empty label.
    pub fn label(&self) -> String {
        FieldValue::from(self).display_text()
    }

    /// Total order used when groups are sorted by key:
    /// Empty < Number < Date < Text < Boolean.
    pub fn compare(&self, other: &GroupValue) -> Ordering {
        match (self, other) {
            (GroupValue::Empty, GroupValue::Empty) => Ordering::Equal,
            (GroupValue::Empty, _) => Ordering::Less,
            (_, GroupValue::Empty) => Ordering::Greater,

            (GroupValue::Number(na), GroupValue::Number(nb)) => {
                na.0.partial_cmp(&nb.0).unwrap_or(Ordering::Equal)
            }
            (GroupValue::Number(_), _) => Ordering::Less,
            (_, GroupValue::Number(_)) => Ordering::Greater,

            (GroupValue::Date(da), GroupValue::Date(db)) => da.cmp(db),
            (GroupValue::Date(_), _) => Ordering::Less,
            (_, GroupValue::Date(_)) => Ordering::Greater,

            (GroupValue::Text(ta), GroupValue::Text(tb)) => ta.cmp(tb),
            (GroupValue::Text(_), _) => Ordering::Less,
            (_, GroupValue::Text(_)) => Ordering::Greater,

            (GroupValue::Boolean(ba), GroupValue::Boolean(bb)) => ba.cmp(bb),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_display_text_trims_integral_numbers() {
        assert_eq!(FieldValue::Number(10.0).display_text(), "10");
        assert_eq!(FieldValue::Number(1.5).display_text(), "1.5");
        assert_eq!(FieldValue::Empty.display_text(), "");
    }

    #[test]
    fn test_as_number_rejects_text_and_nan() {
        assert_eq!(FieldValue::Number(3.0).as_number(), Some(3.0));
        assert_eq!(FieldValue::text("3").as_number(), None);
        assert_eq!(FieldValue::Number(f64::NAN).as_number(), None);
        assert_eq!(FieldValue::Empty.as_number(), None);
    }

    #[test]
    fn test_group_value_hash_equality() {
        let mut set = HashSet::new();
        set.insert(GroupValue::from(&FieldValue::Number(0.0)));
        set.insert(GroupValue::from(&FieldValue::Number(-0.0)));
        set.insert(GroupValue::from(&FieldValue::Number(f64::NAN)));
        set.insert(GroupValue::from(&FieldValue::Number(f64::NAN)));
        set.insert(GroupValue::from(&FieldValue::text("0")));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_group_value_ordering() {
        let mut values = vec![
            GroupValue::Text("b".to_string()),
            GroupValue::Number(OrderedFloat(2.0)),
            GroupValue::Empty,
            GroupValue::Text("a".to_string()),
            GroupValue::Number(OrderedFloat(-1.0)),
        ];
        values.sort_by(|a, b| a.compare(b));
        assert_eq!(
            values,
            vec![
                GroupValue::Empty,
                GroupValue::Number(OrderedFloat(-1.0)),
                GroupValue::Number(OrderedFloat(2.0)),
                GroupValue::Text("a".to_string()),
                GroupValue::Text("b".to_string()),
            ]
        );
    }
}

//! FILENAME: core/group-engine/src/normalize.rs
//! Record normalization.
//!
//! Items come back from the data source as JSON objects in which reference
//! fields are still nested objects. Normalization flattens them into
//! `Record`s: every reference field is replaced by its `Title`, every other
//! value becomes a `FieldValue`, and the date column is parsed into a date.
//!
//! The date-range bounds of the filter are coerced here too: a bound typed as
//! text is parsed into a date in place, and a bound that is already a date is
//! left untouched.

use chrono::NaiveDateTime;
use engine::{parse_date, FieldValue, Record};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GroupEngineError, NormalizeProblem};
use crate::schema::COMPLEX_DISPLAY_PROPERTY;

/// An item exactly as the data source returned it.
pub type RawRecord = serde_json::Map<String, Value>;

// ============================================================================
// DATE BOUNDS
// ============================================================================

/// One end of the date filter. Configuration stores it as text; it becomes a
/// date the first time it is coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DateBound {
    Text(String),
    Date(NaiveDateTime),
}

impl From<String> for DateBound {
    fn from(value: String) -> Self {
        DateBound::Text(value)
    }
}

impl From<DateBound> for String {
    fn from(value: DateBound) -> Self {
        match value {
            DateBound::Text(s) => s,
            DateBound::Date(d) => d.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

impl From<NaiveDateTime> for DateBound {
    fn from(value: NaiveDateTime) -> Self {
        DateBound::Date(value)
    }
}

impl DateBound {
    /// Parses a text bound into a date in place. Idempotent.
    pub fn coerce(&mut self, bound: &'static str) -> Result<NaiveDateTime, GroupEngineError> {
        match self {
            DateBound::Date(d) => Ok(*d),
            DateBound::Text(s) => {
                let date = parse_date(s).ok_or_else(|| GroupEngineError::InvalidDateBound {
                    bound,
                    value: s.clone(),
                })?;
                *self = DateBound::Date(date);
                Ok(date)
            }
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            DateBound::Date(d) => Some(*d),
            DateBound::Text(_) => None,
        }
    }
}

/// The configured date filter. Either bound may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<DateBound>,
    #[serde(default)]
    pub end: Option<DateBound>,
}

/// A coerced date range, ready for query construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateWindow {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether a date falls inside the window, bounds included.
    pub fn contains(&self, date: &NaiveDateTime) -> bool {
        self.start.map_or(true, |s| *date >= s) && self.end.map_or(true, |e| *date <= e)
    }
}

impl DateRange {
    pub fn new(start: Option<DateBound>, end: Option<DateBound>) -> Self {
        DateRange { start, end }
    }

    /// Coerces both bounds in place and returns the resulting window.
    pub fn coerce(&mut self) -> Result<DateWindow, GroupEngineError> {
        let start = match self.start.as_mut() {
            Some(bound) => Some(bound.coerce("start")?),
            None => None,
        };
        let end = match self.end.as_mut() {
            Some(bound) => Some(bound.coerce("end")?),
            None => None,
        };

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                warn!(target: "NORMALIZE", "date range start {} is after end {}, no item can match", s, e);
            }
        }

        Ok(DateWindow { start, end })
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// A complex field of one item that could not be dereferenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeIssue {
    /// Position of the item in the fetched sequence.
    pub index: usize,
    pub field: String,
    pub problem: NormalizeProblem,
}

/// Output of `normalize_records`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecords {
    pub records: Vec<Record>,
    pub issues: Vec<NormalizeIssue>,
}

/// Flattens raw items into records.
///
/// Each field listed in `complex_fields` is replaced by its `Title`
/// sub-property. An item whose complex field has the wrong shape keeps the
/// rest of its fields; only that field is emptied and an issue recorded.
pub fn normalize_records(
    raw: Vec<RawRecord>,
    complex_fields: &[String],
    date_field: &str,
) -> NormalizedRecords {
    let mut out = NormalizedRecords {
        records: Vec::with_capacity(raw.len()),
        issues: Vec::new(),
    };

    for (index, item) in raw.into_iter().enumerate() {
        let mut record = Record::new();

        for (name, value) in &item {
            if is_metadata_key(name) || complex_fields.contains(name) {
                continue;
            }
            let value = if name == date_field {
                date_value(value)
            } else {
                scalar_value(value)
            };
            record = record.with(name.clone(), value);
        }

        for field in complex_fields {
            let value = match dereference(item.get(field)) {
                Ok(v) => v,
                Err(problem) => {
                    warn!(target: "NORMALIZE", "item {} field {}: {}", index, field, problem);
                    out.issues.push(NormalizeIssue {
                        index,
                        field: field.clone(),
                        problem,
                    });
                    FieldValue::Empty
                }
            };
            record = record.with(field.clone(), value);
        }

        out.records.push(record);
    }

    debug!(
        target: "NORMALIZE",
        "normalized {} items, {} issues",
        out.records.len(),
        out.issues.len()
    );
    out
}

fn is_metadata_key(name: &str) -> bool {
    name == "__metadata" || name.starts_with("odata.")
}

/// Reads the display property of a reference value.
fn dereference(value: Option<&Value>) -> Result<FieldValue, NormalizeProblem> {
    match value {
        None => Err(NormalizeProblem::MissingField),
        // An unset reference field.
        Some(Value::Null) => Ok(FieldValue::Empty),
        Some(Value::Object(obj)) => obj
            .get(COMPLEX_DISPLAY_PROPERTY)
            .map(scalar_value)
            .ok_or(NormalizeProblem::MissingTitle),
        // Multi-value reference fields come back as a list of objects.
        Some(Value::Array(items)) => {
            let mut titles = Vec::with_capacity(items.len());
            for item in items {
                match item.get(COMPLEX_DISPLAY_PROPERTY) {
                    Some(title) => titles.push(scalar_value(title).display_text()),
                    None => return Err(NormalizeProblem::MissingTitle),
                }
            }
            Ok(FieldValue::Text(titles.join(", ")))
        }
        Some(other) => Err(NormalizeProblem::NotAnObject(json_kind(other).to_string())),
    }
}

fn scalar_value(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Empty,
        Value::Bool(b) => FieldValue::Boolean(*b),
        Value::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or(FieldValue::Empty),
        Value::String(s) => FieldValue::Text(s.clone()),
        other => FieldValue::Text(other.to_string()),
    }
}

/// Date column values are parsed when possible and kept as text otherwise.
fn date_value(value: &Value) -> FieldValue {
    match value {
        Value::String(s) => parse_date(s)
            .map(FieldValue::Date)
            .unwrap_or_else(|| FieldValue::Text(s.clone())),
        other => scalar_value(other),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

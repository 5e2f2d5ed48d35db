//! FILENAME: core/group-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupEngineError {
    #[error("Invalid {bound} date: {value:?}")]
    InvalidDateBound { bound: &'static str, value: String },
}

/// Why a single complex field of a single item could not be dereferenced.
/// These never abort a load; the field is emptied and the problem reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeProblem {
    #[error("field is missing from the item")]
    MissingField,

    #[error("expected an object, found {0}")]
    NotAnObject(String),

    #[error("object has no Title property")]
    MissingTitle,
}

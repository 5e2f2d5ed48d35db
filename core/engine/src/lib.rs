//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Shared value types for the list view crates.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod date;
pub mod record;
pub mod value;

// Re-export commonly used types at the crate root
pub use date::{format_us_date, parse_date};
pub use record::Record;
pub use value::{format_number, FieldValue, GroupValue, OrderedFloat};

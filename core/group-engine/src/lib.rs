//! FILENAME: core/group-engine/src/lib.rs
//! Grouped list view subsystem.
//!
//! This crate turns the flat items of a list into a multi-level grouped
//! table. It depends on `engine` only for shared types (FieldValue, Record).
//!
//! Layers:
//! - `definition`: Serializable configuration (what the view IS)
//! - `schema`: Column titles -> internal names, complex field detection
//! - `query`: Fetch parameters handed to the data source
//! - `normalize`: Raw items -> flat records, date bound coercion
//! - `tree`: Multi-level grouping (HOW we group)
//! - `view`: Renderable output for the display surface (WHAT we display)
//! - `engine`: Flattening and aggregation (HOW we render)

pub mod definition;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod query;
pub mod schema;
pub mod tree;
pub mod view;

pub use definition::*;
pub use error::{GroupEngineError, NormalizeProblem};
pub use normalize::{
    normalize_records, DateBound, DateRange, DateWindow, NormalizeIssue, NormalizedRecords,
    RawRecord,
};
pub use query::ListQuery;
pub use schema::{resolve_columns, ColumnSchema, FieldSchema, ResolvedColumns};
pub use tree::{build_group_tree, group_records, sort_group_tree, tree_leaves, GroupNode};
pub use view::*;
pub use self::engine::{
    build_header, calculate_list_view, flatten, format_date_cell, render_list_view, RowRenderer,
};

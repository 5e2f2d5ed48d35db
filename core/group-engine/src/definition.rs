//! FILENAME: core/group-engine/src/definition.rs
//! List View Definition - The serializable configuration.
//!
//! This module contains all the types needed to DESCRIBE a grouped list view.
//! These structures are designed to be:
//! - Serializable (for saving/loading the view configuration)
//! - Resolved once per load against the list schema
//! - Immutable snapshots of user intent

use serde::{Deserialize, Serialize};

/// Internal name of the column used for date filtering and date display.
pub const DATE_FIELD: &str = "Date";

/// Designated numeric field summed into group aggregates.
pub const DEFAULT_AMOUNT_FIELD: &str = "Amount";

/// Second designated numeric field summed into group aggregates.
pub const DEFAULT_CREDIT_FIELD: &str = "Credit";

/// Marker repeated once per nesting level in front of a group label.
pub const DEFAULT_INDENT_MARKER: &str = "-- ";

/// Maximum number of items requested per fetch.
pub const MAX_PAGE_SIZE: usize = 5000;

/// Default width of a display column.
pub const DEFAULT_COLUMN_WIDTH: u32 = 100;

// ============================================================================
// SORTING
// ============================================================================

/// Sort order declared for a group-by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Ascending
    }
}

/// How sibling groups are ordered at every level of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupOrdering {
    /// Order of first appearance in the fetched items. The declared
    /// `SortOrder` of each group-by field is ignored.
    FirstSeen,
    /// Stable sort of each level by key value, honoring the declared
    /// `SortOrder` of the field that produced the level.
    Sorted,
}

impl Default for GroupOrdering {
    fn default() -> Self {
        GroupOrdering::FirstSeen
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// How a group header total is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateMode {
    /// Sums the designated fields of the group's direct children only.
    /// A child that is itself a group contributes nothing.
    Shallow,
    /// Sums the designated fields of every leaf record below the group.
    Recursive,
}

impl Default for AggregateMode {
    fn default() -> Self {
        AggregateMode::Recursive
    }
}

// ============================================================================
// FIELD DEFINITIONS
// ============================================================================

/// A group-by entry as the user configured it (by column title).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupKey {
    /// Display title of the column.
    pub column: String,

    /// Declared sort order for this level.
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl GroupKey {
    pub fn new(column: impl Into<String>, sort_order: SortOrder) -> Self {
        GroupKey {
            column: column.into(),
            sort_order,
        }
    }
}

/// A group-by entry after resolution to the list's internal field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupByField {
    /// Internal name of the field the records are grouped on.
    pub name: String,

    /// Declared sort order, carried over from the `GroupKey`.
    pub sort_order: SortOrder,
}

impl GroupByField {
    pub fn new(name: impl Into<String>) -> Self {
        GroupByField {
            name: name.into(),
            sort_order: SortOrder::Ascending,
        }
    }
}

/// A column selected for display. Order in the view is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewField {
    /// Internal name used to read the record.
    pub name: String,

    /// Column title shown in the header row.
    pub display_name: String,

    pub sortable: bool,
    pub resizable: bool,
}

impl ViewField {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        ViewField {
            name: name.into(),
            display_name: display_name.into(),
            sortable: true,
            resizable: true,
        }
    }
}

// ============================================================================
// RENDER OPTIONS
// ============================================================================

/// Knobs for tree building and flattening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub aggregate_mode: AggregateMode,
    pub grouping_order: GroupOrdering,

    /// Designated numeric fields summed into group totals.
    pub amount_field: String,
    pub credit_field: String,

    /// Field whose cells are rendered as en-US dates.
    pub date_field: String,

    pub indent_marker: String,

    /// Row cap applied to every fetch.
    pub max_rows: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            aggregate_mode: AggregateMode::default(),
            grouping_order: GroupOrdering::default(),
            amount_field: DEFAULT_AMOUNT_FIELD.to_string(),
            credit_field: DEFAULT_CREDIT_FIELD.to_string(),
            date_field: DATE_FIELD.to_string(),
            indent_marker: DEFAULT_INDENT_MARKER.to_string(),
            max_rows: MAX_PAGE_SIZE,
        }
    }
}

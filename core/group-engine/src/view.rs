//! FILENAME: core/group-engine/src/view.rs
//! List View - Renderable output for the display surface.
//!
//! The engine turns a group tree into an ordered list of rows: group headers
//! interleaved with data rows, each carrying its nesting level. Nothing here
//! is persisted; a new view is produced on every load.

use engine::FieldValue;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::definition::{ViewField, DEFAULT_COLUMN_WIDTH};
use crate::normalize::DateWindow;

/// Text shown in place of the table when a load returned no items.
pub const NOT_FOUND_TEXT: &str = "Not Found";

// ============================================================================
// HEADER
// ============================================================================

/// One column of the header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCell {
    pub name: String,
    pub display_name: String,
    pub sortable: bool,
    pub resizable: bool,
    pub min_width: u32,
    pub max_width: u32,
}

impl From<&ViewField> for HeaderCell {
    fn from(field: &ViewField) -> Self {
        HeaderCell {
            name: field.name.clone(),
            display_name: field.display_name.clone(),
            sortable: field.sortable,
            resizable: field.resizable,
            min_width: DEFAULT_COLUMN_WIDTH,
            max_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

// ============================================================================
// ROWS
// ============================================================================

/// Visual hint for a group header: the outermost level is styled apart from
/// every nested level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelStyle {
    Top,
    Nested,
}

impl LevelStyle {
    pub fn for_level(level: usize) -> Self {
        if level == 0 {
            LevelStyle::Top
        } else {
            LevelStyle::Nested
        }
    }
}

/// A group header spanning the whole table width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupHeaderRow {
    /// The group's key value as text (empty for a missing key).
    pub label: String,

    /// Nesting level, 0 for top-level groups.
    pub level: usize,

    /// Sum of the designated numeric fields.
    pub aggregate: f64,

    /// Indent marker repeated `level` times.
    pub indent: String,

    /// Leaf records below this group.
    pub leaf_count: usize,

    /// Labels of the enclosing groups, outermost first, ending with this one.
    pub path: SmallVec<[String; 4]>,

    pub style: LevelStyle,
}

impl GroupHeaderRow {
    /// Header text: indent, label, and the total in parentheses when positive.
    pub fn display_text(&self) -> String {
        if self.aggregate > 0.0 {
            format!(
                "{}{} ({})",
                self.indent,
                self.label,
                engine::format_number(self.aggregate)
            )
        } else {
            format!("{}{}", self.indent, self.label)
        }
    }
}

/// One cell of a data row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayCell {
    /// Internal name of the column.
    pub field: String,

    /// The record's raw value.
    pub value: FieldValue,

    /// Pre-formatted display string.
    pub text: String,
}

/// A single record, one cell per view field in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    pub level: usize,
    pub cells: Vec<DisplayCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DisplayRow {
    GroupHeader(GroupHeaderRow),
    Data(DataRow),
}

impl DisplayRow {
    pub fn level(&self) -> usize {
        match self {
            DisplayRow::GroupHeader(h) => h.level,
            DisplayRow::Data(d) => d.level,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, DisplayRow::Data(_))
    }

    pub fn as_group_header(&self) -> Option<&GroupHeaderRow> {
        match self {
            DisplayRow::GroupHeader(h) => Some(h),
            DisplayRow::Data(_) => None,
        }
    }

    pub fn as_data(&self) -> Option<&DataRow> {
        match self {
            DisplayRow::GroupHeader(_) => None,
            DisplayRow::Data(d) => Some(d),
        }
    }
}

// ============================================================================
// VIEW
// ============================================================================

/// A rendered table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTable {
    pub header: Vec<HeaderCell>,
    pub rows: Vec<DisplayRow>,

    /// Number of records rendered as data rows.
    pub record_count: usize,

    /// Date filter shown above the table, when the filter is visible.
    pub date_window: Option<DateWindow>,
}

impl GroupTable {
    pub fn data_rows(&self) -> impl Iterator<Item = &DataRow> {
        self.rows.iter().filter_map(DisplayRow::as_data)
    }

    pub fn group_headers(&self) -> impl Iterator<Item = &GroupHeaderRow> {
        self.rows.iter().filter_map(DisplayRow::as_group_header)
    }
}

/// Result of rendering a load: a table, or the sentinel for zero records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ListView {
    NotFound,
    Table(GroupTable),
}

impl ListView {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ListView::NotFound)
    }

    pub fn table(&self) -> Option<&GroupTable> {
        match self {
            ListView::NotFound => None,
            ListView::Table(t) => Some(t),
        }
    }

    /// All rows of the view; the sentinel has none.
    pub fn rows(&self) -> &[DisplayRow] {
        match self {
            ListView::NotFound => &[],
            ListView::Table(t) => &t.rows,
        }
    }
}

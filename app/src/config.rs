//! FILENAME: app/src/config.rs
// PURPOSE: The list view configuration as the host stores it.
// CONTEXT: Mirrors the property pane values: selected list, columns,
// group-by fields and the optional date filter. Titles are resolved against
// the list schema at load time.

use std::path::Path;

use group_engine::{DateBound, DateRange, DateWindow, GroupEngineError, GroupKey, RenderOptions};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Identity of the selected list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRef {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListViewConfig {
    pub list: Option<ListRef>,

    /// Selected column titles.
    pub list_columns: Vec<String>,

    /// The selected titles in display order. Absent until the user reorders.
    pub ordered_list_columns: Option<Vec<String>>,

    /// Group-by columns, outermost first.
    pub group_by_fields: Vec<GroupKey>,

    pub start_date_time: Option<DateBound>,
    pub end_date_time: Option<DateBound>,

    /// Whether the date filter is shown with the table.
    pub show_filter: bool,

    pub options: RenderOptions,
}

impl ListViewConfig {
    /// Reads a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Title of the selected list, if one is selected.
    pub fn list_title(&self) -> Option<&str> {
        self.list
            .as_ref()
            .map(|l| l.title.as_str())
            .filter(|t| !t.is_empty())
    }

    /// A view needs a list and at least one column before anything loads.
    pub fn is_configured(&self) -> bool {
        self.list_title().is_some() && !self.list_columns.is_empty()
    }

    /// Display order of the columns.
    pub fn ordered_columns(&self) -> &[String] {
        self.ordered_list_columns
            .as_deref()
            .unwrap_or(&self.list_columns)
    }

    /// Parses text date bounds into dates in place and returns the window.
    /// Bounds that are already dates are left as they are.
    pub fn coerce_date_bounds(&mut self) -> Result<DateWindow, GroupEngineError> {
        let mut range = DateRange::new(self.start_date_time.take(), self.end_date_time.take());
        let window = range.coerce();
        self.start_date_time = range.start;
        self.end_date_time = range.end;
        window
    }
}

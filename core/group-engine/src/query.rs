//! FILENAME: core/group-engine/src/query.rs
//! Fetch parameters for one load cycle.
//!
//! The data source is asked for a projection of the resolved columns, with
//! reference fields expanded, limited to the configured date window and
//! capped at a fixed number of rows.

use engine::format_us_date;
use serde::{Deserialize, Serialize};

use crate::definition::DATE_FIELD;
use crate::normalize::DateWindow;
use crate::schema::ResolvedColumns;

/// A request for the items of one list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    pub list_title: String,
    pub select: Vec<String>,
    pub expand: Vec<String>,

    /// Column the date window applies to.
    pub date_field: String,
    pub window: DateWindow,

    /// Maximum number of items returned.
    pub top: usize,
}

impl ListQuery {
    pub fn new(list_title: impl Into<String>, resolved: &ResolvedColumns, window: DateWindow, top: usize) -> Self {
        ListQuery {
            list_title: list_title.into(),
            select: resolved.select.clone(),
            expand: resolved.expand.clone(),
            date_field: DATE_FIELD.to_string(),
            window,
            top,
        }
    }

    pub fn with_date_field(mut self, date_field: impl Into<String>) -> Self {
        self.date_field = date_field.into();
        self
    }

    /// Renders the filter clause, e.g.
    /// `Date ge '1/1/2024' and Date le '12/31/2024'`.
    /// Returns None when the window is unbounded.
    pub fn filter_expression(&self) -> Option<String> {
        let mut clauses = Vec::with_capacity(2);
        if let Some(start) = &self.window.start {
            clauses.push(format!("{} ge '{}'", self.date_field, format_us_date(start)));
        }
        if let Some(end) = &self.window.end {
            clauses.push(format!("{} le '{}'", self.date_field, format_us_date(end)));
        }

        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(" and "))
        }
    }
}

//! FILENAME: app/src/table.rs
// PURPOSE: Plain-text rendering of a list view state for the terminal.

use engine::format_us_date;
use group_engine::{DisplayRow, GroupTable, NOT_FOUND_TEXT};

use crate::session::ListViewState;

/// Shown while no list or columns are selected.
pub const PLACEHOLDER_TEXT: &str = "Configure the list view: select a list and at least one column.";

pub const LOADING_TEXT: &str = "Loading...";

const CELL_SEPARATOR: &str = " | ";

/// Renders any state as text.
pub fn render_state_text(state: &ListViewState) -> String {
    match state {
        ListViewState::NotConfigured => PLACEHOLDER_TEXT.to_string(),
        ListViewState::Loading => LOADING_TEXT.to_string(),
        ListViewState::NotFound => NOT_FOUND_TEXT.to_string(),
        ListViewState::Ready(table) => render_table_text(table),
        ListViewState::Failed(message) => format!("Failed to load list: {}", message),
    }
}

/// Renders a table: optional date filter line, header, then one line per row.
pub fn render_table_text(table: &GroupTable) -> String {
    let mut lines = Vec::with_capacity(table.rows.len() + 2);

    if let Some(window) = &table.date_window {
        let start = window.start.as_ref().map(format_us_date).unwrap_or_default();
        let end = window.end.as_ref().map(format_us_date).unwrap_or_default();
        lines.push(format!("Date: {} - {}", start, end));
    }

    lines.push(
        table
            .header
            .iter()
            .map(|h| h.display_name.as_str())
            .collect::<Vec<_>>()
            .join(CELL_SEPARATOR),
    );

    for row in &table.rows {
        match row {
            DisplayRow::GroupHeader(header) => lines.push(header.display_text()),
            DisplayRow::Data(data) => lines.push(
                data.cells
                    .iter()
                    .map(|c| c.text.as_str())
                    .collect::<Vec<_>>()
                    .join(CELL_SEPARATOR),
            ),
        }
    }

    lines.join("\n")
}

//! FILENAME: core/group-engine/src/engine.rs
//! List View Engine - Flattens a group tree into display rows.
//!
//! Algorithm:
//! 1. Group the normalized records into a tree (see `tree`)
//! 2. Walk the tree depth-first; every group emits a header row carrying its
//!    aggregate, followed by its children one level deeper
//! 3. Every leaf emits a data row with one cell per view field
//! 4. An empty tree renders as the "not found" sentinel

use engine::{format_us_date, parse_date, FieldValue, Record};
use log::debug;
use smallvec::SmallVec;

use crate::definition::{AggregateMode, RenderOptions, ViewField};
use crate::normalize::DateWindow;
use crate::schema::ResolvedColumns;
use crate::tree::{group_records, GroupNode};
use crate::view::{
    DataRow, DisplayCell, DisplayRow, GroupHeaderRow, GroupTable, HeaderCell, LevelStyle,
    ListView,
};

// ============================================================================
// ROW RENDERER
// ============================================================================

/// Turns group nodes into display rows for one set of view fields.
pub struct RowRenderer<'a> {
    view_fields: &'a [ViewField],
    options: &'a RenderOptions,
}

impl<'a> RowRenderer<'a> {
    pub fn new(view_fields: &'a [ViewField], options: &'a RenderOptions) -> Self {
        RowRenderer {
            view_fields,
            options,
        }
    }

    /// Flattens `nodes` depth-first, starting at nesting `level`.
    pub fn flatten(&self, nodes: &[GroupNode], level: usize) -> Vec<DisplayRow> {
        let mut rows = Vec::new();
        self.flatten_nodes(nodes, level, &SmallVec::new(), &mut rows);
        rows
    }

    fn flatten_nodes(
        &self,
        nodes: &[GroupNode],
        level: usize,
        parent_path: &SmallVec<[String; 4]>,
        rows: &mut Vec<DisplayRow>,
    ) {
        for node in nodes {
            match node {
                GroupNode::Group { key, children } => {
                    let label = key.label();
                    let mut path = parent_path.clone();
                    path.push(label.clone());

                    rows.push(DisplayRow::GroupHeader(GroupHeaderRow {
                        label,
                        level,
                        aggregate: self.aggregate(children),
                        indent: self.options.indent_marker.repeat(level),
                        leaf_count: node.leaf_count(),
                        path: path.clone(),
                        style: LevelStyle::for_level(level),
                    }));

                    self.flatten_nodes(children, level + 1, &path, rows);
                }
                GroupNode::Leaf { record } => {
                    rows.push(DisplayRow::Data(self.data_row(record, level)));
                }
            }
        }
    }

    /// Total of a group whose children are `children`.
    pub fn aggregate(&self, children: &[GroupNode]) -> f64 {
        match self.options.aggregate_mode {
            AggregateMode::Shallow => children
                .iter()
                .map(|child| match child {
                    GroupNode::Leaf { record } => self.record_total(record),
                    // A group has no numeric fields of its own.
                    GroupNode::Group { .. } => 0.0,
                })
                .sum(),
            AggregateMode::Recursive => children
                .iter()
                .map(|child| match child {
                    GroupNode::Leaf { record } => self.record_total(record),
                    GroupNode::Group { children, .. } => self.aggregate(children),
                })
                .sum(),
        }
    }

    /// Amount + credit of one record; missing or non-numeric values count as 0.
    fn record_total(&self, record: &Record) -> f64 {
        let amount = record.get(&self.options.amount_field).as_number().unwrap_or(0.0);
        let credit = record.get(&self.options.credit_field).as_number().unwrap_or(0.0);
        amount + credit
    }

    fn data_row(&self, record: &Record, level: usize) -> DataRow {
        let cells = self
            .view_fields
            .iter()
            .map(|field| {
                let value = record.get(&field.name).clone();
                let text = if field.name == self.options.date_field {
                    format_date_cell(&value)
                } else {
                    value.display_text()
                };
                DisplayCell {
                    field: field.name.clone(),
                    value,
                    text,
                }
            })
            .collect();

        DataRow { level, cells }
    }
}

/// Renders a date column cell as an en-US short date. Text that does not
/// parse as a date is shown unchanged.
pub fn format_date_cell(value: &FieldValue) -> String {
    match value {
        FieldValue::Date(d) => format_us_date(d),
        FieldValue::Text(s) => match parse_date(s) {
            Some(d) => format_us_date(&d),
            None => s.clone(),
        },
        other => other.display_text(),
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Flattens group nodes into display rows starting at `level`.
pub fn flatten(
    nodes: &[GroupNode],
    level: usize,
    view_fields: &[ViewField],
    options: &RenderOptions,
) -> Vec<DisplayRow> {
    RowRenderer::new(view_fields, options).flatten(nodes, level)
}

/// Builds the header row from the view fields.
pub fn build_header(view_fields: &[ViewField]) -> Vec<HeaderCell> {
    view_fields.iter().map(HeaderCell::from).collect()
}

/// Renders a group tree. An empty tree yields `ListView::NotFound`.
pub fn render_list_view(
    nodes: &[GroupNode],
    view_fields: &[ViewField],
    options: &RenderOptions,
) -> ListView {
    if nodes.is_empty() {
        return ListView::NotFound;
    }

    let rows = flatten(nodes, 0, view_fields, options);
    let record_count = rows.iter().filter(|r| r.is_data()).count();

    ListView::Table(GroupTable {
        header: build_header(view_fields),
        rows,
        record_count,
        date_window: None,
    })
}

/// Groups and renders normalized records in one step.
pub fn calculate_list_view(
    records: &[Record],
    resolved: &ResolvedColumns,
    options: &RenderOptions,
    shown_window: Option<DateWindow>,
) -> ListView {
    let tree = group_records(records, &resolved.group_by, options.grouping_order);
    debug!(
        target: "ENGINE",
        "grouped {} records into {} top-level nodes",
        records.len(),
        tree.len()
    );

    match render_list_view(&tree, &resolved.view_fields, options) {
        ListView::Table(mut table) => {
            table.date_window = shown_window;
            ListView::Table(table)
        }
        ListView::NotFound => ListView::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{GroupByField, GroupOrdering, SortOrder};
    use crate::tree::build_group_tree;
    use chrono::NaiveDate;

    fn create_test_records() -> Vec<Record> {
        vec![
            Record::new().with("Region", "East").with("Amount", 10.0),
            Record::new().with("Region", "West").with("Amount", 5.0),
            Record::new().with("Region", "East").with("Amount", 3.0),
        ]
    }

    fn create_view_fields() -> Vec<ViewField> {
        vec![
            ViewField::new("Region", "Region"),
            ViewField::new("Amount", "Amount"),
        ]
    }

    fn headers(rows: &[DisplayRow]) -> Vec<(String, usize, f64)> {
        rows.iter()
            .filter_map(DisplayRow::as_group_header)
            .map(|h| (h.label.clone(), h.level, h.aggregate))
            .collect()
    }

    #[test]
    fn test_region_example() {
        let options = RenderOptions::default();
        let tree = build_group_tree(&create_test_records(), &["Region"]);
        let rows = flatten(&tree, 0, &create_view_fields(), &options);

        assert_eq!(rows.len(), 5);
        assert_eq!(
            headers(&rows),
            vec![("East".to_string(), 0, 13.0), ("West".to_string(), 0, 5.0)]
        );

        let east = rows[0].as_group_header().unwrap();
        assert_eq!(east.leaf_count, 2);
        assert!(rows[1].is_data() && rows[2].is_data());
        assert_eq!(rows[1].level(), 1);
        assert_eq!(rows[2].as_data().unwrap().cells[1].text, "3");
        assert_eq!(rows[3].as_group_header().unwrap().leaf_count, 1);
    }

    #[test]
    fn test_aggregate_mixed_fields() {
        let records = vec![
            Record::new().with("G", "x").with("Amount", 5.0).with("Credit", 0.0),
            Record::new().with("G", "x").with("Amount", FieldValue::Empty).with("Credit", 3.0),
        ];
        let tree = build_group_tree(&records, &["G"]);
        let options = RenderOptions::default();
        let renderer = RowRenderer::new(&[], &options);
        assert_eq!(renderer.aggregate(tree[0].children()), 8.0);
    }

    #[test]
    fn test_non_numeric_amount_counts_as_zero() {
        let records = vec![
            Record::new().with("G", "x").with("Amount", "12"),
            Record::new().with("G", "x").with("Credit", 2.0),
        ];
        let tree = build_group_tree(&records, &["G"]);
        let rows = flatten(&tree, 0, &[], &RenderOptions::default());
        assert_eq!(rows[0].as_group_header().unwrap().aggregate, 2.0);
    }

    #[test]
    fn test_recursive_aggregate_rolls_up() {
        let records = vec![
            Record::new().with("A", "a").with("B", "x").with("Amount", 1.0),
            Record::new().with("A", "a").with("B", "y").with("Amount", 2.0),
            Record::new().with("A", "a").with("B", "y").with("Credit", 4.0),
        ];
        let tree = build_group_tree(&records, &["A", "B"]);
        let rows = flatten(&tree, 0, &[], &RenderOptions::default());
        assert_eq!(
            headers(&rows),
            vec![
                ("a".to_string(), 0, 7.0),
                ("x".to_string(), 1, 1.0),
                ("y".to_string(), 1, 6.0),
            ]
        );
    }

    #[test]
    fn test_shallow_aggregate_sums_direct_children_only() {
        let records = vec![
            Record::new().with("A", "a").with("B", "x").with("Amount", 1.0),
            Record::new().with("A", "a").with("B", "y").with("Amount", 2.0),
        ];
        let tree = build_group_tree(&records, &["A", "B"]);
        let options = RenderOptions {
            aggregate_mode: AggregateMode::Shallow,
            ..RenderOptions::default()
        };
        let rows = flatten(&tree, 0, &[], &options);
        assert_eq!(
            headers(&rows),
            vec![
                ("a".to_string(), 0, 0.0),
                ("x".to_string(), 1, 1.0),
                ("y".to_string(), 1, 2.0),
            ]
        );
    }

    #[test]
    fn test_indent_and_style_follow_level() {
        let records = vec![Record::new().with("A", "a").with("B", "b").with("C", "c")];
        let tree = build_group_tree(&records, &["A", "B", "C"]);
        let rows = flatten(&tree, 0, &[], &RenderOptions::default());

        let indents: Vec<&str> = rows
            .iter()
            .filter_map(DisplayRow::as_group_header)
            .map(|h| h.indent.as_str())
            .collect();
        assert_eq!(indents, vec!["", "-- ", "-- -- "]);

        let c = rows[2].as_group_header().unwrap();
        assert_eq!(c.style, LevelStyle::Nested);
        assert_eq!(c.path.as_slice(), &["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(rows[3].level(), 3);
    }

    #[test]
    fn test_flatten_respects_start_level() {
        let tree = build_group_tree(&create_test_records(), &["Region"]);
        let rows = flatten(&tree, 2, &[], &RenderOptions::default());
        let east = rows[0].as_group_header().unwrap();
        assert_eq!(east.level, 2);
        assert_eq!(east.indent, "-- -- ");
        assert_eq!(rows[1].level(), 3);
    }

    #[test]
    fn test_cells_follow_view_field_order() {
        let records = vec![Record::new().with("Title", "Invoice").with("Amount", 4.5)];
        let tree = build_group_tree::<&str>(&records, &[]);
        let fields = vec![
            ViewField::new("Amount", "Amount"),
            ViewField::new("Missing", "Missing"),
            ViewField::new("Title", "Title"),
        ];
        let rows = flatten(&tree, 0, &fields, &RenderOptions::default());
        let texts: Vec<&str> = rows[0]
            .as_data()
            .unwrap()
            .cells
            .iter()
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(texts, vec!["4.5", "", "Invoice"]);
    }

    #[test]
    fn test_date_cells_render_same_for_date_and_iso_text() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let records = vec![
            Record::new().with("Date", FieldValue::Date(date)),
            Record::new().with("Date", "2024-03-05T00:00:00Z"),
            Record::new().with("Date", "garbage"),
        ];
        let tree = build_group_tree::<&str>(&records, &[]);
        let fields = vec![ViewField::new("Date", "Date")];
        let rows = flatten(&tree, 0, &fields, &RenderOptions::default());

        let texts: Vec<String> = rows
            .iter()
            .map(|r| r.as_data().unwrap().cells[0].text.clone())
            .collect();
        assert_eq!(texts, vec!["3/5/2024", "3/5/2024", "garbage"]);
    }

    #[test]
    fn test_empty_tree_is_not_found() {
        let view = render_list_view(&[], &create_view_fields(), &RenderOptions::default());
        assert!(view.is_not_found());
        assert_eq!(view.rows().iter().filter(|r| r.is_data()).count(), 0);
    }

    #[test]
    fn test_calculate_list_view_sorted() {
        let resolved = ResolvedColumns {
            view_fields: create_view_fields(),
            group_by: vec![GroupByField { name: "Region".to_string(), sort_order: SortOrder::Descending }],
            ..ResolvedColumns::default()
        };
        let options = RenderOptions {
            grouping_order: GroupOrdering::Sorted,
            ..RenderOptions::default()
        };
        let view = calculate_list_view(&create_test_records(), &resolved, &options, None);
        let table = view.table().unwrap();

        let labels: Vec<&str> = table.group_headers().map(|h| h.label.as_str()).collect();
        assert_eq!(labels, vec!["West", "East"]);
        assert_eq!(table.record_count, 3);
        assert_eq!(table.header.len(), 2);
        assert_eq!(table.header[0].display_name, "Region");
    }
}

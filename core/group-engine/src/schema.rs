//! FILENAME: core/group-engine/src/schema.rs
//! Column schema and field resolution.
//!
//! The user picks columns by their display title; the data source speaks in
//! internal names. `ColumnSchema` is built once per load from the list's field
//! definitions and `resolve_columns` turns the user's selection into
//! everything the fetch and the renderer need.
//!
//! Resolution never fails: a title with no matching field is used verbatim as
//! its own internal name.

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::definition::{GroupByField, GroupKey, ViewField};

/// Field type kind of a lookup column.
pub const FIELD_TYPE_LOOKUP: i32 = 7;

/// Field type kind of a person/group column.
pub const FIELD_TYPE_USER: i32 = 20;

/// Sub-property read from a reference field for display.
pub const COMPLEX_DISPLAY_PROPERTY: &str = "Title";

// ============================================================================
// FIELD SCHEMA
// ============================================================================

/// One field definition as reported by the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "InternalName")]
    pub internal_name: String,

    #[serde(rename = "FieldTypeKind", default)]
    pub type_kind: i32,
}

impl FieldSchema {
    pub fn new(title: impl Into<String>, internal_name: impl Into<String>, type_kind: i32) -> Self {
        FieldSchema {
            title: title.into(),
            internal_name: internal_name.into(),
            type_kind,
        }
    }

    /// Reference fields are fetched as objects and must be dereferenced.
    pub fn is_complex(&self) -> bool {
        matches!(self.type_kind, FIELD_TYPE_LOOKUP | FIELD_TYPE_USER)
    }
}

/// Title -> internal name mapping for one list, plus the set of complex fields.
#[derive(Debug, Clone, Default)]
pub struct ColumnSchema {
    fields: Vec<FieldSchema>,
    title_to_internal: FxHashMap<String, String>,
}

impl ColumnSchema {
    /// Builds the schema. When two fields share a title the later one wins.
    pub fn from_fields(fields: Vec<FieldSchema>) -> Self {
        let title_to_internal = fields
            .iter()
            .map(|f| (f.title.clone(), f.internal_name.clone()))
            .collect();

        ColumnSchema {
            fields,
            title_to_internal,
        }
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Maps a display title to its internal name, falling back to the title.
    pub fn internal_name<'a>(&'a self, title: &'a str) -> &'a str {
        match self.title_to_internal.get(title) {
            Some(name) => name.as_str(),
            None => {
                debug!(target: "SCHEMA", "no field titled {:?}, using title as internal name", title);
                title
            }
        }
    }
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Everything derived from the schema for one load cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedColumns {
    /// Display columns in user order.
    pub view_fields: Vec<ViewField>,

    /// Group-by fields, outermost first.
    pub group_by: Vec<GroupByField>,

    /// Names passed to the fetch's select list. Complex fields carry the
    /// `/Title` suffix.
    pub select: Vec<String>,

    /// Complex fields that must be expanded by the fetch.
    pub expand: Vec<String>,

    /// Internal names of the complex fields, dereferenced by the normalizer.
    pub complex_fields: Vec<String>,
}

/// Resolves the user's column choices against the list schema.
///
/// `list_columns` are the selected titles; `ordered_columns` is the same set in
/// display order (falls back to `list_columns` when the host never ordered it).
pub fn resolve_columns(
    schema: &ColumnSchema,
    list_columns: &[String],
    ordered_columns: Option<&[String]>,
    group_by: &[GroupKey],
) -> ResolvedColumns {
    let ordered = ordered_columns.unwrap_or(list_columns);

    // A reference column is dereferenced when it is displayed or grouped on.
    let mut referenced: FxHashSet<&str> = ordered.iter().map(String::as_str).collect();
    referenced.extend(group_by.iter().map(|key| key.column.as_str()));
    let complex_fields: Vec<String> = schema
        .fields()
        .iter()
        .filter(|f| f.is_complex() && referenced.contains(f.title.as_str()))
        .map(|f| f.internal_name.clone())
        .collect();

    let mut select: Vec<String> = list_columns
        .iter()
        .map(|title| {
            let name = schema.internal_name(title);
            if complex_fields.iter().any(|c| c == name) {
                format!("{}/{}", name, COMPLEX_DISPLAY_PROPERTY)
            } else {
                name.to_string()
            }
        })
        .collect();

    let view_fields = ordered
        .iter()
        .map(|title| ViewField::new(schema.internal_name(title), title.clone()))
        .collect();

    let group_by = group_by
        .iter()
        .map(|key| GroupByField {
            name: schema.internal_name(&key.column).to_string(),
            sort_order: key.sort_order,
        })
        .collect::<Vec<GroupByField>>();

    // Grouping reads the raw value, so an undisplayed group column is still fetched.
    for field in &group_by {
        let selected = select
            .iter()
            .any(|s| s.split('/').next() == Some(field.name.as_str()));
        if selected {
            continue;
        }
        if complex_fields.contains(&field.name) {
            select.push(format!("{}/{}", field.name, COMPLEX_DISPLAY_PROPERTY));
        } else {
            select.push(field.name.clone());
        }
    }

    ResolvedColumns {
        view_fields,
        group_by,
        select,
        expand: complex_fields.clone(),
        complex_fields,
    }
}

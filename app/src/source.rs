//! FILENAME: app/src/source.rs
// PURPOSE: The data-source boundary and a file-backed implementation.
// CONTEXT: A data source answers two questions per load: which fields does
// the list define, and which items match a query. The JSON source serves
// lists from a document so the view can run without a live server.

use std::future::Future;
use std::path::Path;

use engine::parse_date;
use group_engine::{FieldSchema, ListQuery, RawRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LoadError;
use crate::log_debug;

/// Where list schemas and items come from.
pub trait ListDataSource: Send + Sync {
    /// Every field defined on the list.
    fn fields(&self, list_title: &str) -> impl Future<Output = Result<Vec<FieldSchema>, LoadError>> + Send;

    /// Items matching `query`, at most `query.top` of them.
    fn items(&self, query: &ListQuery) -> impl Future<Output = Result<Vec<RawRecord>, LoadError>> + Send;
}

// ============================================================================
// JSON SOURCE
// ============================================================================

/// One list of a JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListDocument {
    pub title: String,
    pub fields: Vec<FieldSchema>,
    #[serde(default)]
    pub items: Vec<RawRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SourceDocument {
    lists: Vec<ListDocument>,
}

/// Serves lists from an in-memory JSON document of the form
/// `{"lists": [{"title", "fields", "items"}]}`.
#[derive(Debug, Clone, Default)]
pub struct JsonListSource {
    lists: Vec<ListDocument>,
}

impl JsonListSource {
    pub fn new(lists: Vec<ListDocument>) -> Self {
        JsonListSource { lists }
    }

    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let doc: SourceDocument = serde_json::from_str(text)?;
        Ok(JsonListSource::new(doc.lists))
    }

    pub async fn from_path(path: &Path) -> Result<Self, LoadError> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_json(&text)
    }

    fn list(&self, title: &str) -> Result<&ListDocument, LoadError> {
        self.lists
            .iter()
            .find(|l| l.title == title)
            .ok_or_else(|| LoadError::ListNotFound(title.to_string()))
    }
}

impl ListDataSource for JsonListSource {
    async fn fields(&self, list_title: &str) -> Result<Vec<FieldSchema>, LoadError> {
        Ok(self.list(list_title)?.fields.clone())
    }

    async fn items(&self, query: &ListQuery) -> Result<Vec<RawRecord>, LoadError> {
        let list = self.list(&query.list_title)?;
        if let Some(filter) = query.filter_expression() {
            log_debug!("SOURCE", "list={} filter=[{}]", query.list_title, filter);
        }

        let items: Vec<RawRecord> = list
            .items
            .iter()
            .filter(|item| in_window(item, query))
            .take(query.top)
            .map(|item| project(item, &query.select))
            .collect();

        log_debug!("SOURCE", "list={} returned {} items", query.list_title, items.len());
        Ok(items)
    }
}

/// Items without a readable date never match a bounded window.
fn in_window(item: &RawRecord, query: &ListQuery) -> bool {
    if query.window.is_unbounded() {
        return true;
    }
    match item.get(&query.date_field) {
        Some(Value::String(s)) => parse_date(s).map_or(false, |d| query.window.contains(&d)),
        _ => false,
    }
}

/// Keeps only the selected fields. `Field/Title` selects the whole expanded
/// `Field` object.
fn project(item: &RawRecord, select: &[String]) -> RawRecord {
    let mut out = RawRecord::new();
    for name in select {
        let key = name.split('/').next().unwrap_or(name);
        if let Some(value) = item.get(key) {
            out.insert(key.to_string(), value.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use group_engine::{DateWindow, ResolvedColumns};

    const DOC: &str = r#"{
        "lists": [{
            "title": "Ledger",
            "fields": [
                { "Title": "Title", "InternalName": "Title", "FieldTypeKind": 2 },
                { "Title": "Owner", "InternalName": "AssignedTo", "FieldTypeKind": 20 }
            ],
            "items": [
                { "Title": "a", "Date": "2024-01-15T00:00:00Z", "AssignedTo": { "Title": "Ada" }, "Secret": 1 },
                { "Title": "b", "Date": "2024-02-15T00:00:00Z", "AssignedTo": { "Title": "Grace" } },
                { "Title": "c" }
            ]
        }]
    }"#;

    fn query(window: DateWindow, top: usize) -> ListQuery {
        let resolved = ResolvedColumns {
            select: vec!["Title".to_string(), "AssignedTo/Title".to_string()],
            expand: vec!["AssignedTo".to_string()],
            ..ResolvedColumns::default()
        };
        ListQuery::new("Ledger", &resolved, window, top)
    }

    #[tokio::test]
    async fn test_fields_of_known_and_unknown_list() {
        let source = JsonListSource::from_json(DOC).unwrap();
        assert_eq!(source.fields("Ledger").await.unwrap().len(), 2);
        assert!(matches!(
            source.fields("Nope").await,
            Err(LoadError::ListNotFound(title)) if title == "Nope"
        ));
    }

    #[tokio::test]
    async fn test_items_projection_and_cap() {
        let source = JsonListSource::from_json(DOC).unwrap();
        let items = source.items(&query(DateWindow::default(), 2)).await.unwrap();

        assert_eq!(items.len(), 2);
        assert!(items[0].contains_key("AssignedTo"));
        assert!(!items[0].contains_key("Secret"));
        assert!(!items[0].contains_key("Date"));
    }

    #[tokio::test]
    async fn test_items_date_window() {
        let source = JsonListSource::from_json(DOC).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let window = DateWindow { start: Some(feb), end: None };
        let items = source.items(&query(window, 100)).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["Title"], "b");
    }
}

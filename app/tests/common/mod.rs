//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for list view integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use app_lib::{JsonListSource, ListDataSource, ListRef, ListViewConfig, LoadError};
use group_engine::{FieldSchema, GroupKey, ListQuery, RawRecord, SortOrder};
use tokio::sync::Notify;

/// A ledger list with a renamed group column, a person column and a date.
pub const LEDGER_JSON: &str = r#"{
    "lists": [
        {
            "title": "Ledger",
            "fields": [
                { "Title": "Title", "InternalName": "Title", "FieldTypeKind": 2 },
                { "Title": "Sales Region", "InternalName": "Region", "FieldTypeKind": 2 },
                { "Title": "Owner", "InternalName": "AssignedTo", "FieldTypeKind": 20 },
                { "Title": "Amount", "InternalName": "Amount", "FieldTypeKind": 9 },
                { "Title": "Credit", "InternalName": "Credit", "FieldTypeKind": 9 },
                { "Title": "Date", "InternalName": "Date", "FieldTypeKind": 4 }
            ],
            "items": [
                { "Title": "Invoice 1", "Region": "East", "AssignedTo": { "Title": "Ada" },
                  "Amount": 10, "Credit": 0, "Date": "2024-01-15T00:00:00Z" },
                { "Title": "Invoice 2", "Region": "West", "AssignedTo": { "Title": "Grace" },
                  "Amount": 5, "Credit": null, "Date": "2024-02-10T00:00:00Z" },
                { "Title": "Invoice 3", "Region": "East", "AssignedTo": null,
                  "Amount": 3, "Credit": 2, "Date": "2024-03-05T00:00:00Z" },
                { "Title": "Invoice 4", "Region": "North", "AssignedTo": { "Title": "Ada" },
                  "Amount": 0, "Credit": 0, "Date": "2024-06-20T00:00:00Z" }
            ]
        },
        {
            "title": "Archive",
            "fields": [
                { "Title": "Title", "InternalName": "Title", "FieldTypeKind": 2 }
            ],
            "items": []
        },
        {
            "title": "Broken",
            "fields": [
                { "Title": "Title", "InternalName": "Title", "FieldTypeKind": 2 },
                { "Title": "Owner", "InternalName": "AssignedTo", "FieldTypeKind": 20 }
            ],
            "items": [
                { "Title": "ok", "AssignedTo": { "Title": "Ada" } },
                { "Title": "bad", "AssignedTo": 42 }
            ]
        }
    ]
}"#;

pub fn ledger_source() -> JsonListSource {
    JsonListSource::from_json(LEDGER_JSON).unwrap()
}

fn titles(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Ledger grouped by region, showing every column.
pub fn ledger_config() -> ListViewConfig {
    ListViewConfig {
        list: Some(ListRef {
            id: "ledger".to_string(),
            title: "Ledger".to_string(),
            url: None,
        }),
        list_columns: titles(&["Title", "Owner", "Amount", "Credit", "Date"]),
        group_by_fields: vec![GroupKey::new("Sales Region", SortOrder::Ascending)],
        ..ListViewConfig::default()
    }
}

/// Same columns as the ledger, pointed at another list.
pub fn config_for(list_title: &str) -> ListViewConfig {
    let mut config = ledger_config();
    if let Some(list) = config.list.as_mut() {
        list.title = list_title.to_string();
    }
    config
}

// ============================================================================
// GATED SOURCE
// ============================================================================

/// Wraps a source so the item fetch blocks until the test releases it.
/// `started` fires as soon as the fetch begins.
pub struct GatedSource {
    pub inner: JsonListSource,
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl GatedSource {
    pub fn new(inner: JsonListSource) -> Self {
        GatedSource {
            inner,
            started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }
}

impl ListDataSource for GatedSource {
    async fn fields(&self, list_title: &str) -> Result<Vec<FieldSchema>, LoadError> {
        self.inner.fields(list_title).await
    }

    async fn items(&self, query: &ListQuery) -> Result<Vec<RawRecord>, LoadError> {
        self.started.notify_one();
        self.release.notified().await;
        self.inner.items(query).await
    }
}

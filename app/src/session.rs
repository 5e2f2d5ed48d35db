//! FILENAME: app/src/session.rs
// PURPOSE: Load cycle of one list view: resolve, fetch, normalize, group, render.
// CONTEXT: Every reload gets a generation number. A reload that finishes after
// a newer one has started is discarded, so a slow fetch can never overwrite
// the result of a later configuration change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use group_engine::{
    calculate_list_view, normalize_records, resolve_columns, ColumnSchema, DateWindow, GroupTable,
    ListQuery, ListView, NormalizeIssue,
};
use serde::Serialize;

use crate::config::ListViewConfig;
use crate::error::LoadError;
use crate::source::ListDataSource;
use crate::{log_debug, log_enter, log_exit, log_info, log_warn};

/// What the display surface shows for a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ListViewState {
    /// No list or no columns selected yet.
    NotConfigured,
    Loading,
    /// The load succeeded with zero items.
    NotFound,
    Ready(GroupTable),
    /// The load failed; distinct from an empty result.
    Failed(String),
}

/// Result of one reload call.
#[derive(Debug, Clone, PartialEq)]
pub enum ReloadOutcome {
    Applied(ListViewState),
    /// A newer reload started while this one was fetching.
    Stale { generation: u64 },
}

/// Output of a successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedView {
    pub view: ListView,
    pub query: ListQuery,
    pub issues: Vec<NormalizeIssue>,
}

/// Runs the full pipeline for a configuration whose date bounds are already
/// coerced into `window`.
pub async fn load_list_view<S: ListDataSource>(
    source: &S,
    config: &ListViewConfig,
    window: DateWindow,
) -> Result<LoadedView, LoadError> {
    let list_title = config
        .list_title()
        .ok_or_else(|| LoadError::Usage("no list selected".to_string()))?;

    let fields = source.fields(list_title).await?;
    let schema = ColumnSchema::from_fields(fields);
    let resolved = resolve_columns(
        &schema,
        &config.list_columns,
        config.ordered_list_columns.as_deref(),
        &config.group_by_fields,
    );

    let query = ListQuery::new(list_title, &resolved, window, config.options.max_rows)
        .with_date_field(config.options.date_field.clone());
    let raw = source.items(&query).await?;

    let normalized = normalize_records(raw, &resolved.complex_fields, &config.options.date_field);
    let shown_window = if config.show_filter { Some(window) } else { None };
    let view = calculate_list_view(&normalized.records, &resolved, &config.options, shown_window);

    Ok(LoadedView {
        view,
        query,
        issues: normalized.issues,
    })
}

// ============================================================================
// SESSION
// ============================================================================

/// Holds the configuration and current state of one view.
pub struct ListViewSession {
    config: Mutex<ListViewConfig>,
    generation: AtomicU64,
    state: Mutex<ListViewState>,
    issues: Mutex<Vec<NormalizeIssue>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ListViewSession {
    pub fn new(config: ListViewConfig) -> Self {
        ListViewSession {
            config: Mutex::new(config),
            generation: AtomicU64::new(0),
            state: Mutex::new(ListViewState::NotConfigured),
            issues: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> ListViewConfig {
        lock(&self.config).clone()
    }

    /// Replaces the configuration wholesale. Call `reload` afterwards.
    pub fn update_config(&self, config: ListViewConfig) {
        *lock(&self.config) = config;
    }

    pub fn state(&self) -> ListViewState {
        lock(&self.state).clone()
    }

    /// Normalization problems of the last applied load.
    pub fn issues(&self) -> Vec<NormalizeIssue> {
        lock(&self.issues).clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Stores `state`, and `issues` when given, only if `generation` is still
    /// the latest reload. Both are written under the state lock so a
    /// superseded reload can never pair its issues with a newer state.
    fn apply(
        &self,
        generation: u64,
        state: ListViewState,
        issues: Option<Vec<NormalizeIssue>>,
    ) -> bool {
        let mut guard = lock(&self.state);
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        *guard = state;
        if let Some(issues) = issues {
            *lock(&self.issues) = issues;
        }
        true
    }

    /// Reloads the view from `source` with the current configuration.
    pub async fn reload<S: ListDataSource>(&self, source: &S) -> ReloadOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        log_enter!("SESSION", "reload", "generation={}", generation);

        // Date bounds are coerced in the stored configuration itself.
        let prepared = {
            let mut config = lock(&self.config);
            if !config.is_configured() {
                None
            } else {
                Some(config.coerce_date_bounds().map(|window| (config.clone(), window)))
            }
        };

        let (config, window) = match prepared {
            None => {
                log_debug!("SESSION", "view not configured");
                return self.finish(generation, ListViewState::NotConfigured, Vec::new());
            }
            Some(Err(e)) => {
                log_warn!("SESSION", "generation={} invalid configuration: {}", generation, e);
                return self.finish(generation, ListViewState::Failed(e.to_string()), Vec::new());
            }
            Some(Ok(prepared)) => prepared,
        };

        self.apply(generation, ListViewState::Loading, None);

        let (state, issues) = match load_list_view(source, &config, window).await {
            Ok(loaded) => {
                let state = match loaded.view {
                    ListView::NotFound => ListViewState::NotFound,
                    ListView::Table(table) => ListViewState::Ready(table),
                };
                (state, loaded.issues)
            }
            Err(e) => {
                log_warn!("SESSION", "generation={} load failed: {}", generation, e);
                (ListViewState::Failed(e.to_string()), Vec::new())
            }
        };

        self.finish(generation, state, issues)
    }

    fn finish(
        &self,
        generation: u64,
        state: ListViewState,
        issues: Vec<NormalizeIssue>,
    ) -> ReloadOutcome {
        let issue_count = issues.len();
        if !self.apply(generation, state.clone(), Some(issues)) {
            log_info!("SESSION", "discarding stale generation={}", generation);
            return ReloadOutcome::Stale { generation };
        }

        log_exit!("SESSION", "reload", "generation={} issues={}", generation, issue_count);
        ReloadOutcome::Applied(state)
    }
}

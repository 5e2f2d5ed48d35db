//! FILENAME: app/src/lib.rs
// PURPOSE: Main library entry point for the list view host.
// CONTEXT: Wires configuration, the data source, the load session and the
// text renderer together. The grouping itself lives in `group-engine`.

use std::path::{Path, PathBuf};

pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod source;
pub mod table;

pub use config::{ListRef, ListViewConfig};
pub use error::LoadError;
pub use logging::{init_log_file, init_logger, get_log_path, next_seq, write_log};
pub use session::{load_list_view, ListViewSession, ListViewState, LoadedView, ReloadOutcome};
pub use source::{JsonListSource, ListDataSource, ListDocument};
pub use table::{render_state_text, render_table_text};

/// Command-line entry: `list-view <config.json> <lists.json>`.
/// Prints the rendered view to stdout.
pub fn run() -> Result<(), LoadError> {
    init_logger(log::LevelFilter::Info);
    if let Ok(path) = std::env::var(logging::LOG_FILE_ENV) {
        if let Err(e) = init_log_file(&PathBuf::from(path)) {
            eprintln!("[LOG_INIT] {}", e);
        }
    }

    let mut args = std::env::args().skip(1);
    let (config_path, data_path) = match (args.next(), args.next()) {
        (Some(c), Some(d)) => (PathBuf::from(c), PathBuf::from(d)),
        _ => {
            return Err(LoadError::Usage(
                "list-view <config.json> <lists.json>".to_string(),
            ))
        }
    };

    let config = ListViewConfig::load(&config_path)?;
    log_info!(
        "APP",
        "config={:?} list={:?} columns={}",
        config_path,
        config.list_title(),
        config.list_columns.len()
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let state = runtime.block_on(load_once(config, &data_path))?;

    println!("{}", render_state_text(&state));

    match state {
        ListViewState::Failed(message) => Err(LoadError::Source(message)),
        _ => Ok(()),
    }
}

/// Loads the view once from a JSON document of lists.
async fn load_once(config: ListViewConfig, data_path: &Path) -> Result<ListViewState, LoadError> {
    let source = JsonListSource::from_path(data_path).await?;
    let session = ListViewSession::new(config);
    Ok(match session.reload(&source).await {
        ReloadOutcome::Applied(state) => state,
        ReloadOutcome::Stale { .. } => session.state(),
    })
}

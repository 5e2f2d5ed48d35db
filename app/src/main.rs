//! FILENAME: app/src/main.rs
// PURPOSE: Command-line entry point.
// FORMAT: seq|level|category|message (logs on stderr or LIST_VIEW_LOG_FILE)

use std::process::ExitCode;

fn main() -> ExitCode {
    match app_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use std::path::Path;

use crate::commands::AppState;
use crate::error::AppResult;

const DB_FILE: &str = "habitloop.sqlite";

/// Builds the application state rooted at `data_dir`: creates the
/// directory, initializes logging, opens the storage pool and wires
/// the services. The returned state is what a shell drives commands
/// through.
pub fn bootstrap(data_dir: &Path) -> AppResult<AppState> {
    std::fs::create_dir_all(data_dir)?;
    utils::logger::init_logging(&data_dir.join("logs"))?;

    let pool = db::DbPool::new(data_dir.join(DB_FILE))?;
    Ok(AppState::new(pool))
}

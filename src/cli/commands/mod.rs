pub mod career;
pub mod config;
pub mod db;
pub mod import;
pub mod init;
pub mod instructor;
pub mod lab;
pub mod log;
pub mod period;
pub mod record;
pub mod report;

use crate::config::Config;
use crate::db::initialize::open_ready;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::warning;
use std::io::{self, Write};

/// Open the configured database with schema and catalogue up to date.
pub(crate) fn open_db(cfg: &Config) -> AppResult<DbPool> {
    open_ready(&cfg.database)
}

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

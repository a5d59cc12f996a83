use crate::cli::commands::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::filter::RecordQuery;
use crate::core::report::{ReportLogic, ReportOptions};
use crate::errors::AppResult;
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report {
        file,
        filters,
        no_open,
        force,
    } = cmd
    {
        let path = expand_tilde(file);
        let pool = open_db(cfg)?;

        let opts = ReportOptions {
            force: *force,
            open: cfg.open_after_export && !*no_open,
        };

        ReportLogic::generate(&pool.conn, &RecordQuery::from(filters), cfg, &path, opts)?;
    }

    Ok(())
}

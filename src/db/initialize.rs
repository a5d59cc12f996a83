use crate::db::log::log_quietly;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::seed::seed_catalog;
use crate::errors::AppResult;
use crate::ui::messages::info;
use rusqlite::Connection;

/// Initialize the database.
/// Delegates all schema creation / upgrades to the migration engine.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;
    Ok(())
}

/// Open the database, bring the schema up to date and reconcile the
/// career/laboratory catalogue. Every command goes through here.
pub fn open_ready(path: &str) -> AppResult<DbPool> {
    let mut pool = DbPool::new(path)?;
    init_db(&pool.conn)?;

    let report = seed_catalog(&mut pool.conn)?;
    if report.changed() {
        let msg = format!(
            "Seeded {} career(s) and {} laboratory(ies)",
            report.careers_created, report.laboratories_created
        );
        info(&msg);
        log_quietly(&pool.conn, "seed", "catalog", &msg);
    }

    Ok(pool)
}

use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension};

/// Ensure that the `log` table exists. Applied migrations are recorded there.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20240301_0001_catalog",
        description: "Created careers, laboratories and instructors tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS careers (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS laboratories (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT NOT NULL,
            career_id  INTEGER NOT NULL REFERENCES careers(id)
        );
        CREATE INDEX IF NOT EXISTS idx_laboratories_career ON laboratories(career_id);

        CREATE TABLE IF NOT EXISTS instructors (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name  TEXT NOT NULL,
            last_name   TEXT NOT NULL,
            career_id   INTEGER NOT NULL REFERENCES careers(id)
        );
        CREATE INDEX IF NOT EXISTS idx_instructors_career ON instructors(career_id);

        CREATE TABLE IF NOT EXISTS instructor_laboratories (
            instructor_id  INTEGER NOT NULL REFERENCES instructors(id) ON DELETE CASCADE,
            laboratory_id  INTEGER NOT NULL REFERENCES laboratories(id) ON DELETE CASCADE,
            PRIMARY KEY (instructor_id, laboratory_id)
        );
        "#,
    },
    Migration {
        version: "20240301_0002_periods",
        description: "Created academic_periods table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS academic_periods (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE,
            start_date  TEXT NOT NULL,
            end_date    TEXT NOT NULL,
            CHECK (start_date <= end_date)
        );
        "#,
    },
    Migration {
        version: "20240301_0003_usage_records",
        description: "Created usage_records table",
        // Foreign keys are checked at COMMIT so a bad batch rolls back whole.
        sql: r#"
        CREATE TABLE IF NOT EXISTS usage_records (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            date           TEXT NOT NULL,
            entry_time     TEXT NOT NULL,
            exit_time      TEXT NOT NULL,
            activity       TEXT NOT NULL DEFAULT '',
            instructor_id  INTEGER NOT NULL
                REFERENCES instructors(id) DEFERRABLE INITIALLY DEFERRED,
            laboratory_id  INTEGER NOT NULL
                REFERENCES laboratories(id) DEFERRABLE INITIALLY DEFERRED,
            period_id      INTEGER NOT NULL
                REFERENCES academic_periods(id) DEFERRABLE INITIALLY DEFERRED
        );

        CREATE INDEX IF NOT EXISTS idx_usage_records_date_time ON usage_records(date, entry_time);
        CREATE INDEX IF NOT EXISTS idx_usage_records_laboratory ON usage_records(laboratory_id);
        CREATE INDEX IF NOT EXISTS idx_usage_records_instructor ON usage_records(instructor_id);
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {e}", m.version)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()?;
    Ok(())
}

/// Versions not yet recorded in the journal.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations, oldest first.
/// Returns how many were applied.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        success(format!("Migration applied: {} → {}", m.version, m.description));
        applied += 1;
    }

    Ok(applied)
}

use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::date;
use rusqlite::OptionalExtension;
use std::fs;

#[derive(Debug, Default)]
pub struct DbStats {
    pub file_size: u64,
    pub careers: i64,
    pub laboratories: i64,
    pub instructors: i64,
    pub periods: i64,
    pub records: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

fn count(pool: &DbPool, table: &str) -> AppResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    Ok(pool.conn.query_row(&sql, [], |row| row.get(0))?)
}

pub fn collect_stats(pool: &DbPool, db_path: &str) -> AppResult<DbStats> {
    let (first_date, last_date): (Option<String>, Option<String>) = pool
        .conn
        .query_row("SELECT MIN(date), MAX(date) FROM usage_records", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .optional()?
        .unwrap_or((None, None));

    Ok(DbStats {
        file_size: fs::metadata(db_path).map(|m| m.len()).unwrap_or(0),
        careers: count(pool, "careers")?,
        laboratories: count(pool, "laboratories")?,
        instructors: count(pool, "instructors")?,
        periods: count(pool, "academic_periods")?,
        records: count(pool, "usage_records")?,
        first_date,
        last_date,
    })
}

fn shown_date(d: &Option<String>) -> String {
    match d.as_deref().map(date::from_db) {
        Some(Ok(d)) => date::display(&d),
        Some(Err(_)) | None => format!("{GREY}--{RESET}"),
    }
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    let s = collect_stats(pool, db_path)?;
    let file_mb = (s.file_size as f64) / (1024.0 * 1024.0);

    println!();
    println!("{CYAN}• File:{RESET} {YELLOW}{db_path}{RESET}");
    println!("{CYAN}• Size:{RESET} {file_mb:.2} MB");
    println!("{CYAN}• Careers:{RESET} {GREEN}{}{RESET}", s.careers);
    println!("{CYAN}• Laboratories:{RESET} {GREEN}{}{RESET}", s.laboratories);
    println!("{CYAN}• Instructors:{RESET} {GREEN}{}{RESET}", s.instructors);
    println!("{CYAN}• Academic periods:{RESET} {GREEN}{}{RESET}", s.periods);
    println!("{CYAN}• Usage records:{RESET} {GREEN}{}{RESET}", s.records);
    println!("{CYAN}• Date range:{RESET}");
    println!("    from: {}", shown_date(&s.first_date));
    println!("    to:   {}", shown_date(&s.last_date));
    println!();

    Ok(())
}

use crate::errors::{AppError, AppResult};
use crate::models::laboratory::NewLaboratory;
use crate::models::{AcademicPeriod, Career, Instructor, Laboratory, UsageRecord};
use crate::utils::{date, time};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

pub(crate) fn get_date(row: &Row, idx: usize) -> Result<NaiveDate> {
    let s: String = row.get(idx)?;
    NaiveDate::parse_from_str(&s, date::DB_FORMAT)
        .map_err(|_| conversion_error(idx, AppError::InvalidDate(s.clone())))
}

pub(crate) fn get_time(row: &Row, idx: usize) -> Result<NaiveTime> {
    let s: String = row.get(idx)?;
    time::parse_time(&s).ok_or_else(|| conversion_error(idx, AppError::InvalidTime(s.clone())))
}

fn collect<T>(rows: impl Iterator<Item = Result<T>>) -> AppResult<Vec<T>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Careers
// ---------------------------

fn map_career(row: &Row) -> Result<Career> {
    Ok(Career {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

pub fn list_careers(conn: &Connection) -> AppResult<Vec<Career>> {
    let mut stmt = conn.prepare("SELECT id, name FROM careers ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_career)?;
    collect(rows)
}

pub fn get_career(conn: &Connection, id: i64) -> AppResult<Option<Career>> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM careers WHERE id = ?1",
            [id],
            map_career,
        )
        .optional()?)
}

pub fn count_careers(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM careers", [], |r| r.get(0))?)
}

pub fn insert_career(conn: &Connection, name: &str) -> AppResult<i64> {
    conn.execute("INSERT INTO careers (name) VALUES (?1)", [name])?;
    Ok(conn.last_insert_rowid())
}

// ---------------------------
// Laboratories
// ---------------------------

fn map_laboratory(row: &Row) -> Result<Laboratory> {
    Ok(Laboratory {
        id: row.get(0)?,
        name: row.get(1)?,
        career_id: row.get(2)?,
    })
}

pub fn list_laboratories(conn: &Connection) -> AppResult<Vec<Laboratory>> {
    let mut stmt = conn.prepare("SELECT id, name, career_id FROM laboratories ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_laboratory)?;
    collect(rows)
}

pub fn laboratories_by_career(conn: &Connection, career_id: i64) -> AppResult<Vec<Laboratory>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, career_id FROM laboratories
         WHERE career_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([career_id], map_laboratory)?;
    collect(rows)
}

pub fn get_laboratory(conn: &Connection, id: i64) -> AppResult<Option<Laboratory>> {
    Ok(conn
        .query_row(
            "SELECT id, name, career_id FROM laboratories WHERE id = ?1",
            [id],
            map_laboratory,
        )
        .optional()?)
}

pub fn insert_laboratory(conn: &Connection, lab: &NewLaboratory) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO laboratories (name, career_id) VALUES (?1, ?2)",
        params![lab.name, lab.career_id],
    )?;
    Ok(conn.last_insert_rowid())
}

// ---------------------------
// Instructors
// ---------------------------

fn map_instructor(row: &Row) -> Result<Instructor> {
    Ok(Instructor {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        career_id: row.get(3)?,
    })
}

pub fn list_instructors(conn: &Connection, career_id: Option<i64>) -> AppResult<Vec<Instructor>> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, career_id FROM instructors
         WHERE ?1 IS NULL OR career_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([career_id], map_instructor)?;
    collect(rows)
}

pub fn get_instructor(conn: &Connection, id: i64) -> AppResult<Option<Instructor>> {
    Ok(conn
        .query_row(
            "SELECT id, first_name, last_name, career_id FROM instructors WHERE id = ?1",
            [id],
            map_instructor,
        )
        .optional()?)
}

/// Instructors whose home career is `career_id` and who are assigned to `laboratory_id`.
pub fn instructors_assigned(
    conn: &Connection,
    career_id: i64,
    laboratory_id: i64,
) -> AppResult<Vec<Instructor>> {
    let mut stmt = conn.prepare(
        "SELECT i.id, i.first_name, i.last_name, i.career_id
         FROM instructors i
         JOIN instructor_laboratories il ON il.instructor_id = i.id
         WHERE i.career_id = ?1 AND il.laboratory_id = ?2
         ORDER BY i.id ASC",
    )?;
    let rows = stmt.query_map(params![career_id, laboratory_id], map_instructor)?;
    collect(rows)
}

pub fn insert_instructor(
    conn: &Connection,
    first_name: &str,
    last_name: &str,
    career_id: i64,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO instructors (first_name, last_name, career_id) VALUES (?1, ?2, ?3)",
        params![first_name, last_name, career_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn assign_laboratory(conn: &Connection, instructor_id: i64, laboratory_id: i64) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO instructor_laboratories (instructor_id, laboratory_id)
         VALUES (?1, ?2)",
        params![instructor_id, laboratory_id],
    )?;
    Ok(())
}

pub fn laboratories_of_instructor(conn: &Connection, instructor_id: i64) -> AppResult<Vec<Laboratory>> {
    let mut stmt = conn.prepare(
        "SELECT l.id, l.name, l.career_id
         FROM laboratories l
         JOIN instructor_laboratories il ON il.laboratory_id = l.id
         WHERE il.instructor_id = ?1
         ORDER BY l.id ASC",
    )?;
    let rows = stmt.query_map([instructor_id], map_laboratory)?;
    collect(rows)
}

// ---------------------------
// Academic periods
// ---------------------------

fn map_period(row: &Row) -> Result<AcademicPeriod> {
    Ok(AcademicPeriod {
        id: row.get(0)?,
        name: row.get(1)?,
        start_date: get_date(row, 2)?,
        end_date: get_date(row, 3)?,
    })
}

pub fn list_periods(conn: &Connection) -> AppResult<Vec<AcademicPeriod>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, start_date, end_date FROM academic_periods
         ORDER BY start_date ASC, id ASC",
    )?;
    let rows = stmt.query_map([], map_period)?;
    collect(rows)
}

pub fn get_period(conn: &Connection, id: i64) -> AppResult<Option<AcademicPeriod>> {
    Ok(conn
        .query_row(
            "SELECT id, name, start_date, end_date FROM academic_periods WHERE id = ?1",
            [id],
            map_period,
        )
        .optional()?)
}

pub fn insert_period(conn: &Connection, name: &str, start: &NaiveDate, end: &NaiveDate) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO academic_periods (name, start_date, end_date) VALUES (?1, ?2, ?3)",
        params![name, date::to_db(start), date::to_db(end)],
    )?;
    Ok(conn.last_insert_rowid())
}

// ---------------------------
// Usage records
// ---------------------------

fn map_usage_record(row: &Row) -> Result<UsageRecord> {
    Ok(UsageRecord {
        id: row.get(0)?,
        date: get_date(row, 1)?,
        entry_time: get_time(row, 2)?,
        exit_time: get_time(row, 3)?,
        activity: row.get(4)?,
        instructor_id: row.get(5)?,
        laboratory_id: row.get(6)?,
        period_id: row.get(7)?,
    })
}

/// Insert a record; `rec.id` is ignored and the new id returned.
pub fn insert_usage_record(conn: &Connection, rec: &UsageRecord) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO usage_records
            (date, entry_time, exit_time, activity, instructor_id, laboratory_id, period_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    stmt.execute(params![
        date::to_db(&rec.date),
        time::format_time(&rec.entry_time),
        time::format_time(&rec.exit_time),
        rec.activity,
        rec.instructor_id,
        rec.laboratory_id,
        rec.period_id,
    ])?;
    Ok(conn.last_insert_rowid())
}

pub fn get_usage_record(conn: &Connection, id: i64) -> AppResult<Option<UsageRecord>> {
    Ok(conn
        .query_row(
            "SELECT id, date, entry_time, exit_time, activity, instructor_id, laboratory_id, period_id
             FROM usage_records WHERE id = ?1",
            [id],
            map_usage_record,
        )
        .optional()?)
}

pub fn count_usage_records(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM usage_records", [], |r| r.get(0))?)
}

/// Returns the number of rows removed (0 when the id no longer exists).
pub fn delete_usage_record(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM usage_records WHERE id = ?1", [id])?)
}

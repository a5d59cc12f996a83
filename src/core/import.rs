//! Bulk import of usage records from a CSV file.
//!
//! Expected layout, header line first:
//!
//! ```text
//! activity,date,entry_time,exit_time
//! Repair,15/03/2024,09:00,11:00
//! ```
//!
//! Rows that cannot be read are skipped and only counted. The staged rows
//! go in with a single transaction. Unlike manual entry, an imported row is
//! not checked against its period range nor for entry < exit.

use crate::db::log::log_quietly;
use crate::db::queries::{get_instructor, get_laboratory, get_period, insert_usage_record};
use crate::errors::{AppError, AppResult};
use crate::models::UsageRecord;
use crate::utils::{date, time};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Data rows shown before importing.
pub const PREVIEW_ROWS: usize = 10;

const FIELDS: usize = 4;

/// Period, laboratory and instructor every imported row is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportTarget {
    pub period_id: i64,
    pub laboratory_id: i64,
    pub instructor_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedRow {
    pub activity: String,
    pub date: NaiveDate,
    pub entry_time: NaiveTime,
    pub exit_time: NaiveTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Staging {
    pub rows: Vec<StagedRow>,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Header and first data rows, as read (no conversion).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvPreview {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input)
}

fn stage_record(record: &csv::StringRecord) -> Option<StagedRow> {
    if record.len() != FIELDS {
        return None;
    }

    let date = date::parse_display(&record[1])?;
    let entry_time = time::parse_time(&record[2])?;
    let exit_time = time::parse_time(&record[3])?;

    Some(StagedRow {
        activity: record[0].trim().to_string(),
        date,
        entry_time,
        exit_time,
    })
}

/// Parse every data row. Malformed rows (wrong field count, bad date or
/// time, undecodable text) are counted in `skipped`; only an I/O failure
/// stops the read.
pub fn parse_csv_rows<R: Read>(input: R) -> AppResult<Staging> {
    let mut rdr = reader(input);
    let mut staging = Staging::default();

    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(_) => {
                staging.skipped += 1;
                continue;
            }
        };

        match stage_record(&record) {
            Some(row) => staging.rows.push(row),
            None => staging.skipped += 1,
        }
    }

    Ok(staging)
}

pub fn preview_reader<R: Read>(input: R) -> AppResult<CsvPreview> {
    let mut rdr = reader(input);

    let header = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();

    for result in rdr.records().take(PREVIEW_ROWS) {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(CsvPreview { header, rows })
}

pub fn preview_csv(path: &Path) -> AppResult<CsvPreview> {
    preview_reader(File::open(path)?)
}

/// Fail early when one of the target ids does not exist.
pub fn check_target(conn: &Connection, target: &ImportTarget) -> AppResult<()> {
    if get_period(conn, target.period_id)?.is_none() {
        return Err(AppError::not_found("period", target.period_id));
    }
    if get_laboratory(conn, target.laboratory_id)?.is_none() {
        return Err(AppError::not_found("laboratory", target.laboratory_id));
    }
    if get_instructor(conn, target.instructor_id)?.is_none() {
        return Err(AppError::not_found("instructor", target.instructor_id));
    }
    Ok(())
}

/// Insert all staged rows in one transaction. On error nothing is kept:
/// the transaction is rolled back when dropped uncommitted.
pub fn insert_staged(
    conn: &mut Connection,
    target: &ImportTarget,
    rows: &[StagedRow],
) -> AppResult<usize> {
    let tx = conn.transaction()?;

    for row in rows {
        let rec = UsageRecord {
            id: 0,
            date: row.date,
            entry_time: row.entry_time,
            exit_time: row.exit_time,
            activity: row.activity.clone(),
            instructor_id: target.instructor_id,
            laboratory_id: target.laboratory_id,
            period_id: target.period_id,
        };
        insert_usage_record(&tx, &rec)?;
    }

    tx.commit()?;
    Ok(rows.len())
}

pub fn import_csv(conn: &mut Connection, path: &Path, target: &ImportTarget) -> AppResult<ImportSummary> {
    check_target(conn, target)?;

    let staging = parse_csv_rows(File::open(path)?)?;
    let imported = insert_staged(conn, target, &staging.rows)?;

    log_quietly(
        conn,
        "import",
        &path.display().to_string(),
        &format!(
            "Imported {imported} record(s), skipped {} row(s)",
            staging.skipped
        ),
    );

    Ok(ImportSummary {
        imported,
        skipped: staging.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impossible_date_is_skipped() {
        let data = "activity,date,entry_time,exit_time\n\
                    Cleaning,31/02/2024,08:00,10:00\n\
                    Repair,15/03/2024,09:00,11:00\n";
        let staging = parse_csv_rows(data.as_bytes()).unwrap();

        assert_eq!(staging.rows.len(), 1);
        assert_eq!(staging.skipped, 1);
        assert_eq!(staging.rows[0].activity, "Repair");
        assert_eq!(
            staging.rows[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn short_long_and_bad_time_rows_are_skipped() {
        let data = "a,b,c,d\n\
                    Only,15/03/2024,09:00\n\
                    Extra,15/03/2024,09:00,11:00,x\n\
                    Late,15/03/2024,9h,11:00\n\
                    \" Calibration \", 16/03/2024 , 10:00 , 12:30 \n";
        let staging = parse_csv_rows(data.as_bytes()).unwrap();

        assert_eq!(staging.skipped, 3);
        assert_eq!(staging.rows.len(), 1);
        assert_eq!(staging.rows[0].activity, "Calibration");
        assert_eq!(
            staging.rows[0].exit_time,
            NaiveTime::from_hms_opt(12, 30, 0).unwrap()
        );
    }

    #[test]
    fn import_keeps_reversed_times() {
        let data = "h1,h2,h3,h4\nNight,15/03/2024,18:00,08:00\n";
        let staging = parse_csv_rows(data.as_bytes()).unwrap();
        assert_eq!(staging.rows.len(), 1);
    }

    #[test]
    fn header_only_file_stages_nothing() {
        let staging = parse_csv_rows("activity,date,entry_time,exit_time\n".as_bytes()).unwrap();
        assert_eq!(staging, Staging::default());
    }

    #[test]
    fn preview_is_verbatim_and_bounded() {
        let mut data = String::from("activity,date,entry_time,exit_time\n");
        for i in 0..15 {
            data.push_str(&format!("Task {i},99/99/9999,08:00,10:00\n"));
        }
        let preview = preview_reader(data.as_bytes()).unwrap();

        assert_eq!(preview.header[0], "activity");
        assert_eq!(preview.rows.len(), PREVIEW_ROWS);
        assert_eq!(preview.rows[3][1], "99/99/9999");
    }
}

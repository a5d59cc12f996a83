//! Usage-record query engine behind the visualization screen.
//!
//! Filters combine as follows:
//! - a laboratory id restricts to that laboratory, whatever the career;
//! - otherwise a career id restricts to the career's laboratories, and is
//!   dropped when the career owns none;
//! - a period id restricts `date` to the period's inclusive range;
//! - an instructor id restricts to that instructor.

use crate::db::log::log_quietly;
use crate::db::queries::{
    delete_usage_record, get_date, get_period, get_time, laboratories_by_career,
};
use crate::errors::AppResult;
use crate::models::instructor::full_name;
use crate::utils::date;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::Value;
use rusqlite::{Connection, Row, params_from_iter};
use serde::Serialize;

/// Most recent rows returned by one query.
pub const MAX_ROWS: usize = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub instructor_id: Option<i64>,
    pub career_id: Option<i64>,
    pub laboratory_id: Option<i64>,
    pub period_id: Option<i64>,
}

/// A usage record enriched for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRow {
    pub id: i64,
    pub date: NaiveDate,
    pub entry_time: NaiveTime,
    pub exit_time: NaiveTime,
    pub activity: String,
    pub instructor_id: i64,
    pub instructor_name: String,
    pub laboratory_id: i64,
    pub laboratory_name: String,
}

fn map_record_row(row: &Row) -> rusqlite::Result<RecordRow> {
    let first: String = row.get(6)?;
    let last: String = row.get(7)?;
    Ok(RecordRow {
        id: row.get(0)?,
        date: get_date(row, 1)?,
        entry_time: get_time(row, 2)?,
        exit_time: get_time(row, 3)?,
        activity: row.get(4)?,
        instructor_id: row.get(5)?,
        instructor_name: full_name(&first, &last),
        laboratory_id: row.get(8)?,
        laboratory_name: row.get(9)?,
    })
}

impl RecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// WHERE clause and its parameters.
    fn conditions(&self, conn: &Connection) -> AppResult<(Vec<String>, Vec<Value>)> {
        let mut clauses = Vec::new();
        let mut params = Vec::new();

        if let Some(id) = self.instructor_id {
            clauses.push("r.instructor_id = ?".to_string());
            params.push(Value::Integer(id));
        }

        if let Some(id) = self.laboratory_id {
            clauses.push("r.laboratory_id = ?".to_string());
            params.push(Value::Integer(id));
        } else if let Some(career_id) = self.career_id {
            let lab_ids: Vec<i64> = laboratories_by_career(conn, career_id)?
                .into_iter()
                .map(|l| l.id)
                .collect();

            if !lab_ids.is_empty() {
                let marks = vec!["?"; lab_ids.len()].join(", ");
                clauses.push(format!("r.laboratory_id IN ({marks})"));
                params.extend(lab_ids.into_iter().map(Value::Integer));
            }
        }

        if let Some(id) = self.period_id {
            if let Some(period) = get_period(conn, id)? {
                clauses.push("r.date BETWEEN ? AND ?".to_string());
                params.push(Value::Text(date::to_db(&period.start_date)));
                params.push(Value::Text(date::to_db(&period.end_date)));
            }
        }

        Ok((clauses, params))
    }

    /// Run the query: newest first, at most [`MAX_ROWS`] rows.
    pub fn run(&self, conn: &Connection) -> AppResult<FilteredView> {
        let (clauses, params) = self.conditions(conn)?;

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        // One extra row tells "exactly 1000" apart from "more than 1000".
        let sql = format!(
            "SELECT r.id, r.date, r.entry_time, r.exit_time, r.activity,
                    r.instructor_id, i.first_name, i.last_name,
                    r.laboratory_id, l.name
             FROM usage_records r
             JOIN instructors i ON i.id = r.instructor_id
             JOIN laboratories l ON l.id = r.laboratory_id
             {where_sql}
             ORDER BY r.date DESC, r.entry_time DESC, r.id DESC
             LIMIT {}",
            MAX_ROWS + 1
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), map_record_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }

        let truncated = out.len() > MAX_ROWS;
        out.truncate(MAX_ROWS);

        Ok(FilteredView {
            rows: out,
            truncated,
        })
    }
}

/// Result of a query as shown in the results table. Row `n` of the table
/// is `rows[n]`, which is how a selection maps back to record ids.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilteredView {
    pub rows: Vec<RecordRow>,
    pub truncated: bool,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn status_line(&self) -> String {
        if self.truncated {
            format!("More than {MAX_ROWS} records found. Showing the {MAX_ROWS} most recent.")
        } else {
            format!("{} record(s) found.", self.rows.len())
        }
    }

    /// Distinct record ids behind the selected (0-based) rows, in
    /// selection order. Indices past the end are ignored.
    pub fn ids_for_rows(&self, rows: &[usize]) -> Vec<i64> {
        let mut ids: Vec<i64> = Vec::new();
        for &r in rows {
            if let Some(row) = self.rows.get(r) {
                if !ids.contains(&row.id) {
                    ids.push(row.id);
                }
            }
        }
        ids
    }

    /// Delete the records behind the selected rows. See [`delete_records`].
    pub fn delete_rows(&self, conn: &mut Connection, rows: &[usize]) -> AppResult<usize> {
        delete_records(conn, &self.ids_for_rows(rows))
    }
}

/// Delete the given records in one transaction and return how many
/// existed. Any failure rolls the whole batch back.
pub fn delete_records(conn: &mut Connection, ids: &[i64]) -> AppResult<usize> {
    let tx = conn.transaction()?;
    let mut deleted = 0;

    for &id in ids {
        deleted += delete_usage_record(&tx, id)?;
    }

    tx.commit()?;

    log_quietly(
        conn,
        "del",
        "usage_records",
        &format!("Deleted {deleted} record(s): {ids:?}"),
    );

    Ok(deleted)
}

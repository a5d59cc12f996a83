use crate::core::selector::{Cascade, InstructorOptions, LabSelection};
use crate::db::log::log_quietly;
use crate::db::queries::{
    assign_laboratory, get_career, get_instructor, get_laboratory, get_period, insert_instructor,
    insert_period, insert_usage_record,
};
use crate::errors::{AppError, AppResult};
use crate::models::instructor::full_name;
use crate::models::{AcademicPeriod, NewUsageRecord, UsageRecord};
use crate::utils::date;
use chrono::NaiveDate;
use rusqlite::Connection;

/// Create an academic period. The name is trimmed; a duplicate name is
/// rejected by the storage layer.
pub fn create_period(
    conn: &Connection,
    name: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<AcademicPeriod> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Please enter the period name."));
    }
    if start > end {
        return Err(AppError::validation(
            "The start date must be before the end date.",
        ));
    }

    let id = insert_period(conn, name, &start, &end)?;

    log_quietly(
        conn,
        "add",
        "academic_periods",
        &format!(
            "Period '{name}' ({} - {})",
            date::display(&start),
            date::display(&end)
        ),
    );

    Ok(AcademicPeriod {
        id,
        name: name.to_string(),
        start_date: start,
        end_date: end,
    })
}

/// Create an instructor and its laboratory assignments in one transaction.
pub fn create_instructor(
    conn: &mut Connection,
    first_name: &str,
    last_name: &str,
    career_id: i64,
    labs: &LabSelection,
) -> AppResult<i64> {
    let first = first_name.trim();
    let last = last_name.trim();

    if first.is_empty() || last.is_empty() {
        return Err(AppError::validation(
            "Please enter the instructor's first and last name.",
        ));
    }
    if labs.is_empty() {
        return Err(AppError::validation("Please select at least one laboratory."));
    }
    if get_career(conn, career_id)?.is_none() {
        return Err(AppError::not_found("career", career_id));
    }
    if let Some(lab) = labs.labs().iter().find(|l| l.career_id != career_id) {
        return Err(AppError::validation(format!(
            "The laboratory '{}' does not belong to the selected career.",
            lab.name
        )));
    }

    let tx = conn.transaction()?;
    let id = insert_instructor(&tx, first, last, career_id)?;
    for lab_id in labs.ids() {
        assign_laboratory(&tx, id, lab_id)?;
    }
    tx.commit()?;

    log_quietly(
        conn,
        "add",
        "instructors",
        &format!(
            "Instructor {} assigned to {} laboratory(ies)",
            full_name(first, last),
            labs.len()
        ),
    );

    Ok(id)
}

/// Check a manually entered record, in the order the form asks for its
/// fields, and return the record ready to insert.
pub fn validate_usage_record(conn: &Connection, rec: &NewUsageRecord) -> AppResult<UsageRecord> {
    let Some(period_id) = rec.period_id else {
        return Err(AppError::validation("Please select an academic period."));
    };
    let period = get_period(conn, period_id)?.ok_or(AppError::not_found("period", period_id))?;

    if !period.contains(rec.date) {
        return Err(AppError::validation(format!(
            "The selected date ({}) is not within the academic period '{}' ({} - {}).",
            date::display(&rec.date),
            period.name,
            date::display(&period.start_date),
            date::display(&period.end_date)
        )));
    }

    let Some(career_id) = rec.career_id else {
        return Err(AppError::validation("Please select a career."));
    };
    let Some(laboratory_id) = rec.laboratory_id else {
        return Err(AppError::validation("Please select a laboratory."));
    };
    let Some(instructor_id) = rec.instructor_id else {
        return Err(AppError::validation("Please select an instructor."));
    };

    let activity = rec.activity.trim();
    if activity.is_empty() {
        return Err(AppError::validation("Please enter the activity performed."));
    }
    if rec.entry_time >= rec.exit_time {
        return Err(AppError::validation(
            "The entry time must be before the exit time.",
        ));
    }

    if get_laboratory(conn, laboratory_id)?.is_none() {
        return Err(AppError::not_found("laboratory", laboratory_id));
    }
    if get_instructor(conn, instructor_id)?.is_none() {
        return Err(AppError::not_found("instructor", instructor_id));
    }

    // The same chain the registration form offers: career, its
    // laboratories, then the instructors assigned there.
    let mut cascade = Cascade::new();
    cascade.select_career(conn, Some(career_id))?;
    if cascade.select_laboratory(conn, Some(laboratory_id)).is_err() {
        return Err(AppError::validation(
            "The selected laboratory does not belong to the selected career.",
        ));
    }
    match cascade.instructors() {
        InstructorOptions::LoadFailed => {
            return Err(AppError::validation("Error loading instructors."));
        }
        options if !options.instructors().iter().any(|i| i.id == instructor_id) => {
            return Err(AppError::validation(
                "The selected instructor is not assigned to this laboratory.",
            ));
        }
        _ => {}
    }

    Ok(UsageRecord {
        id: 0,
        date: rec.date,
        entry_time: rec.entry_time,
        exit_time: rec.exit_time,
        activity: activity.to_string(),
        instructor_id,
        laboratory_id,
        period_id,
    })
}

/// Validate and store a single record. Nothing is written when
/// validation fails.
pub fn create_usage_record(conn: &mut Connection, rec: &NewUsageRecord) -> AppResult<i64> {
    let record = validate_usage_record(conn, rec)?;

    let tx = conn.transaction()?;
    let id = insert_usage_record(&tx, &record)?;
    tx.commit()?;

    log_quietly(
        conn,
        "add",
        "usage_records",
        &format!(
            "Record #{id} on {} for laboratory #{}",
            date::display(&record.date),
            record.laboratory_id
        ),
    );

    Ok(id)
}

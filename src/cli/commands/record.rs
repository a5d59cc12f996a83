use crate::cli::commands::{ask_confirmation, open_db};
use crate::cli::parser::{Commands, FilterArgs, RecordAction};
use crate::config::Config;
use crate::core::catalog::create_usage_record;
use crate::core::filter::{FilteredView, RecordQuery};
use crate::core::report::resolve_header;
use crate::errors::{AppError, AppResult};
use crate::models::NewUsageRecord;
use crate::ui::messages::{error, info, success, warning};
use crate::utils::colors::colorize_optional;
use crate::utils::table::Table;
use crate::utils::{date, time};
use regex::Regex;
use rusqlite::Connection;
use std::collections::BTreeSet;

/// Parse a 1-based row list such as `1,3,5-7` into sorted 0-based indices.
/// Rows past `listed` are dropped before any range is expanded.
pub(crate) fn parse_row_spec(spec: &str, listed: usize) -> AppResult<Vec<usize>> {
    let re = Regex::new(r"^\s*(\d+)\s*(?:-\s*(\d+)\s*)?$")
        .map_err(|e| AppError::Other(e.to_string()))?;
    let invalid = || AppError::validation(format!("Invalid row list: '{spec}'"));

    let mut rows = BTreeSet::new();
    for part in spec.split(',') {
        let caps = re.captures(part).ok_or_else(invalid)?;
        let from: usize = caps[1].parse().map_err(|_| invalid())?;
        let to: usize = match caps.get(2) {
            Some(m) => m.as_str().parse().map_err(|_| invalid())?,
            None => from,
        };
        if from == 0 || to < from {
            return Err(invalid());
        }
        rows.extend((from..=to.min(listed)).map(|r| r - 1));
    }

    Ok(rows.into_iter().collect())
}

fn print_filters(conn: &Connection, query: &RecordQuery, cfg: &Config) -> AppResult<()> {
    let h = resolve_header(conn, query, cfg)?;
    println!(
        "Period: {} | Instructor: {} | Career: {} | {}",
        colorize_optional(&h.period),
        colorize_optional(&h.instructor),
        colorize_optional(&h.career),
        h.laboratory_line
    );
    Ok(())
}

fn print_view(view: &FilteredView) {
    let mut table = Table::new([
        "#",
        "Date",
        "In",
        "Out",
        "Instructor",
        "Laboratory",
        "Activity",
    ]);

    for (i, r) in view.rows.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            date::display(&r.date),
            time::format_time(&r.entry_time),
            time::format_time(&r.exit_time),
            r.instructor_name.clone(),
            r.laboratory_name.clone(),
            r.activity.clone(),
        ]);
    }

    if !table.is_empty() {
        print!("{}", table.render());
    }
}

fn add(conn: &mut Connection, action: &RecordAction) -> AppResult<()> {
    let RecordAction::Add {
        period,
        career,
        lab,
        instructor,
        date: date_arg,
        entry,
        exit,
        activity,
    } = action
    else {
        return Ok(());
    };

    let rec = NewUsageRecord {
        period_id: *period,
        career_id: *career,
        laboratory_id: *lab,
        instructor_id: *instructor,
        date: match date_arg {
            Some(d) => date::parse_date_arg(d)?,
            None => date::today(),
        },
        entry_time: time::parse_time_arg(entry)?,
        exit_time: time::parse_time_arg(exit)?,
        activity: activity.clone(),
    };

    let id = create_usage_record(conn, &rec)?;
    success(format!("Record #{id} saved."));
    Ok(())
}

fn delete(
    conn: &mut Connection,
    filters: &FilterArgs,
    rows: &str,
    yes: bool,
) -> AppResult<()> {
    let view = RecordQuery::from(filters).run(conn)?;
    let selected = parse_row_spec(rows, view.len())?;

    let ids = view.ids_for_rows(&selected);
    if ids.is_empty() {
        info("No records selected for deletion.");
        return Ok(());
    }

    let prompt = format!(
        "Delete {} record(s) {:?}? This action is irreversible.",
        ids.len(),
        ids
    );
    if !yes && !ask_confirmation(&prompt) {
        info("Operation cancelled.");
        return Ok(());
    }

    match view.delete_rows(conn, &selected) {
        Ok(n) => {
            success(format!("{n} record(s) deleted."));
            Ok(())
        }
        Err(e) => {
            error("0 record(s) deleted.");
            Err(e)
        }
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Record { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_db(cfg)?;

    match action {
        RecordAction::Add { .. } => add(&mut pool.conn, action)?,
        RecordAction::List { filters, json } => {
            let query = RecordQuery::from(filters);
            let view = query.run(&pool.conn)?;

            if *json {
                let out = serde_json::to_string_pretty(&view)
                    .map_err(|e| AppError::Export(e.to_string()))?;
                println!("{out}");
                return Ok(());
            }

            print_filters(&pool.conn, &query, cfg)?;
            print_view(&view);
            if view.truncated {
                warning(view.status_line());
            } else {
                info(view.status_line());
            }
        }
        RecordAction::Del {
            filters,
            rows,
            yes,
        } => delete(&mut pool.conn, filters, rows, *yes)?,
    }

    Ok(())
}

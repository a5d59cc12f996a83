use crate::cli::commands::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::import::{ImportTarget, check_target, import_csv, preview_csv};
use crate::core::selector::import_instructor_options;
use crate::db::queries::get_laboratory;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::path::expand_tilde;
use crate::utils::table::Table;
use rusqlite::Connection;

/// The import screen offers the instructors of the laboratory's career.
fn warn_foreign_instructor(conn: &Connection, target: &ImportTarget) -> AppResult<()> {
    let Some(lab) = get_laboratory(conn, target.laboratory_id)? else {
        return Ok(());
    };
    let offered = import_instructor_options(conn, Some(lab.career_id))?;
    if !offered.iter().any(|i| i.id == target.instructor_id) {
        warning(format!(
            "Instructor #{} does not belong to the career of laboratory '{}'.",
            target.instructor_id, lab.name
        ));
    }
    Ok(())
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import {
        file,
        period,
        lab,
        instructor,
        preview,
    } = cmd
    {
        let path = expand_tilde(file);
        let target = ImportTarget {
            period_id: *period,
            laboratory_id: *lab,
            instructor_id: *instructor,
        };

        let mut pool = open_db(cfg)?;
        check_target(&pool.conn, &target)?;
        warn_foreign_instructor(&pool.conn, &target)?;

        if *preview {
            let p = preview_csv(&path)?;

            let mut table = Table::new(p.header);
            for row in p.rows {
                table.add_row(row);
            }

            header(format!("Preview of {}", path.display()));
            print!("{}", table.render());
            info("Nothing imported (preview only).");
            return Ok(());
        }

        let summary = import_csv(&mut pool.conn, &path, &target)?;

        success(format!(
            "{} record(s) imported successfully.",
            summary.imported
        ));
        if summary.skipped > 0 {
            info(format!("{} row(s) skipped.", summary.skipped));
        }
    }

    Ok(())
}

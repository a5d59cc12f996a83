use crate::cli::commands::open_db;
use crate::cli::parser::{Commands, InstructorAction};
use crate::config::Config;
use crate::core::catalog::create_instructor;
use crate::core::selector::{InstructorOptions, LabSelection, instructors_for};
use crate::db::queries::{get_laboratory, laboratories_of_instructor, list_instructors};
use crate::errors::{AppError, AppResult};
use crate::models::Instructor;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::table::Table;
use rusqlite::Connection;

fn print_instructors(conn: &Connection, list: &[Instructor]) -> AppResult<()> {
    let mut table = Table::new(["ID", "Name", "Career", "Laboratories"]);
    for i in list {
        let labs: Vec<String> = laboratories_of_instructor(conn, i.id)?
            .into_iter()
            .map(|l| l.name)
            .collect();
        table.add_row(vec![
            i.id.to_string(),
            i.display_name(),
            i.career_id.to_string(),
            labs.join(", "),
        ]);
    }

    header("Instructors");
    print!("{}", table.render());
    Ok(())
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Instructor { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_db(cfg)?;

    match action {
        InstructorAction::Add {
            first,
            last,
            career,
            labs,
        } => {
            let mut selection = LabSelection::new();
            for id in labs {
                let lab = get_laboratory(&pool.conn, *id)?
                    .ok_or(AppError::not_found("laboratory", *id))?;
                let name = lab.name.clone();
                if !selection.add(lab) {
                    info(format!("Laboratory '{name}' is already in the list."));
                }
            }

            let id = create_instructor(&mut pool.conn, first, last, *career, &selection)?;
            success(format!(
                "Instructor #{id} {} {} saved with {} laboratory(ies).",
                first.trim(),
                last.trim(),
                selection.len()
            ));
        }
        InstructorAction::List { career, lab } => {
            if lab.is_some() {
                // Same lookup as the registration form's instructor dropdown.
                match instructors_for(&pool.conn, *career, *lab) {
                    InstructorOptions::Found(list) => print_instructors(&pool.conn, &list)?,
                    other => {
                        for (_, text) in other.labels() {
                            warning(text);
                        }
                    }
                }
                return Ok(());
            }

            let list = list_instructors(&pool.conn, *career)?;
            if list.is_empty() {
                info("No instructors found.");
            } else {
                print_instructors(&pool.conn, &list)?;
            }
        }
    }

    Ok(())
}

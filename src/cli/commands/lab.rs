use crate::cli::commands::open_db;
use crate::cli::parser::{Commands, LabAction};
use crate::config::Config;
use crate::core::selector::{laboratories_for, report_laboratory_options};
use crate::db::queries::{get_career, list_careers, list_laboratories};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info};
use crate::utils::table::Table;
use std::collections::HashMap;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Lab {
        action: LabAction::List { career, distinct },
    } = cmd
    {
        let pool = open_db(cfg)?;
        let conn = &pool.conn;

        if let Some(id) = career {
            if get_career(conn, *id)?.is_none() {
                return Err(AppError::not_found("career", *id));
            }
        }

        let labs = match (*career, *distinct) {
            (_, true) => report_laboratory_options(conn, *career)?,
            (Some(id), false) => laboratories_for(conn, Some(id))?,
            (None, false) => list_laboratories(conn)?,
        };

        if labs.is_empty() {
            info("No laboratories found.");
            return Ok(());
        }

        let careers: HashMap<i64, String> = list_careers(conn)?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut table = Table::new(["ID", "Laboratory", "Career"]);
        for l in labs {
            let owner = careers.get(&l.career_id).cloned().unwrap_or_default();
            table.add_row(vec![l.id.to_string(), l.name, owner]);
        }

        header("Laboratories");
        print!("{}", table.render());
    }

    Ok(())
}

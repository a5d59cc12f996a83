use crate::cli::commands::open_db;
use crate::cli::parser::{Commands, PeriodAction};
use crate::config::Config;
use crate::core::catalog::create_period;
use crate::db::queries::list_periods;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success};
use crate::utils::date;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Period { action } = cmd else {
        return Ok(());
    };

    let pool = open_db(cfg)?;

    match action {
        PeriodAction::Add { name, start, end } => {
            let start = date::parse_date_arg(start)?;
            let end = date::parse_date_arg(end)?;

            let p = create_period(&pool.conn, name, start, end)?;
            success(format!(
                "Academic period #{} '{}' saved ({} - {}).",
                p.id,
                p.name,
                date::display(&p.start_date),
                date::display(&p.end_date)
            ));
        }
        PeriodAction::List => {
            let periods = list_periods(&pool.conn)?;
            if periods.is_empty() {
                info("No academic periods yet.");
                return Ok(());
            }

            let mut table = Table::new(["ID", "Name", "Start", "End"]);
            for p in periods {
                table.add_row(vec![
                    p.id.to_string(),
                    p.name,
                    date::display(&p.start_date),
                    date::display(&p.end_date),
                ]);
            }

            header("Academic periods");
            print!("{}", table.render());
        }
    }

    Ok(())
}

use crate::cli::commands::open_db;
use crate::cli::parser::{CareerAction, Commands};
use crate::config::Config;
use crate::db::queries::{laboratories_by_career, list_careers};
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Career {
        action: CareerAction::List,
    } = cmd
    {
        let pool = open_db(cfg)?;

        let mut table = Table::new(["ID", "Career", "Laboratories"]);
        for c in list_careers(&pool.conn)? {
            let labs = laboratories_by_career(&pool.conn, c.id)?.len();
            table.add_row(vec![c.id.to_string(), c.name, labs.to_string()]);
        }

        header("Careers");
        print!("{}", table.render());
    }

    Ok(())
}

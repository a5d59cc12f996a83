use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::open_ready;
use crate::db::log::log_quietly;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database, with all pending migrations
///  - the career / laboratory catalogue
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;
    let db = db_path.to_string_lossy().to_string();

    println!("⚙️  Initializing labregister…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {db}");

    let pool = open_ready(&db)?;

    success(format!("Database initialized at {db}"));
    log_quietly(
        &pool.conn,
        "init",
        "database",
        &format!("Database initialized at {db}"),
    );

    println!("🎉 labregister initialization completed!");
    Ok(())
}

use crate::core::filter::RecordQuery;
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for labregister
/// Laboratory usage register backed by SQLite
#[derive(Parser)]
#[command(
    name = "labregister",
    version = env!("CARGO_PKG_VERSION"),
    about = "Laboratory usage register: periods, instructors, usage records, CSV import and PDF reports",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Record filters shared by `record list`, `record del` and `report`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long, help = "Only records of this instructor id")]
    pub instructor: Option<i64>,

    #[arg(long, help = "Only records in the laboratories of this career id")]
    pub career: Option<i64>,

    #[arg(long, help = "Only records of this laboratory id (overrides --career)")]
    pub lab: Option<i64>,

    #[arg(long, help = "Only records inside this academic period id")]
    pub period: Option<i64>,
}

impl From<&FilterArgs> for RecordQuery {
    fn from(f: &FilterArgs) -> Self {
        RecordQuery {
            instructor_id: f.instructor,
            career_id: f.career,
            laboratory_id: f.lab,
            period_id: f.period,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Careers (seeded automatically)
    Career {
        #[command(subcommand)]
        action: CareerAction,
    },

    /// Laboratories (four per career, seeded automatically)
    Lab {
        #[command(subcommand)]
        action: LabAction,
    },

    /// Academic periods
    Period {
        #[command(subcommand)]
        action: PeriodAction,
    },

    /// Instructors and their laboratory assignments
    Instructor {
        #[command(subcommand)]
        action: InstructorAction,
    },

    /// Usage records: register, list, delete
    Record {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Import usage records from a CSV file (activity,date,entry_time,exit_time)
    Import {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Academic period id")]
        period: i64,

        #[arg(long, help = "Laboratory id")]
        lab: i64,

        #[arg(long, help = "Instructor id")]
        instructor: i64,

        #[arg(long, help = "Only show the header and the first 10 rows")]
        preview: bool,
    },

    /// Generate the PDF usage report
    Report {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long = "no-open", help = "Do not open the report once written")]
        no_open: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing file without asking")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum CareerAction {
    /// List careers
    List,
}

#[derive(Subcommand)]
pub enum LabAction {
    /// List laboratories, optionally of one career
    List {
        #[arg(long)]
        career: Option<i64>,

        #[arg(long, help = "One entry per laboratory name, as offered by the report filter")]
        distinct: bool,
    },
}

#[derive(Subcommand)]
pub enum PeriodAction {
    /// Create an academic period
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, help = "Start date (DD/MM/YYYY or YYYY-MM-DD)")]
        start: String,

        #[arg(long, help = "End date (DD/MM/YYYY or YYYY-MM-DD)")]
        end: String,
    },

    /// List academic periods
    List,
}

#[derive(Subcommand)]
pub enum InstructorAction {
    /// Create an instructor assigned to one or more laboratories
    Add {
        #[arg(long)]
        first: String,

        #[arg(long)]
        last: String,

        #[arg(long, help = "Home career id")]
        career: i64,

        #[arg(long = "lab", help = "Laboratory id (repeatable)")]
        labs: Vec<i64>,
    },

    /// List instructors; with --career and --lab, those assigned to the laboratory
    List {
        #[arg(long)]
        career: Option<i64>,

        #[arg(long, requires = "career")]
        lab: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum RecordAction {
    /// Register a usage record
    Add {
        #[arg(long)]
        period: Option<i64>,

        #[arg(long)]
        career: Option<i64>,

        #[arg(long)]
        lab: Option<i64>,

        #[arg(long)]
        instructor: Option<i64>,

        #[arg(long, help = "Date (DD/MM/YYYY or YYYY-MM-DD, default: today)")]
        date: Option<String>,

        #[arg(long = "in", help = "Entry time (HH:MM)")]
        entry: String,

        #[arg(long = "out", help = "Exit time (HH:MM)")]
        exit: String,

        #[arg(long, default_value = "")]
        activity: String,
    },

    /// List records, newest first (at most 1000)
    List {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, help = "Print the rows as JSON")]
        json: bool,
    },

    /// Delete records by their row number in `record list` with the same filters
    Del {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, value_name = "ROWS", help = "Row numbers, e.g. 1,3,5-7")]
        rows: String,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}

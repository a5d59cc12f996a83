#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveTime};
use labregister::db::initialize::open_ready;
use labregister::db::pool::DbPool;
use labregister::db::queries::{
    assign_laboratory, insert_instructor, insert_period, insert_usage_record,
    laboratories_by_career, list_careers,
};
use labregister::models::UsageRecord;
use std::env;
use std::fs;
use std::path::PathBuf;

/// The binary with HOME pointed at a scratch directory, so no real
/// configuration file is read or written.
pub fn lab(home: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("labregister");
    cmd.env("HOME", home);
    cmd
}

/// Scratch HOME for CLI tests, emptied first.
pub fn setup_home(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{name}_labregister_home"));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).ok();
    path.to_string_lossy().to_string()
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{name}_labregister.sqlite"));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{name}_out.{ext}"));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

/// Ids created by [`seeded`].
pub struct Fixture {
    pub pool: DbPool,
    /// First two seeded careers.
    pub careers: [i64; 2],
    /// Laboratories of career 0, in seed order.
    pub labs_a: Vec<i64>,
    /// Laboratories of career 1, in seed order.
    pub labs_b: Vec<i64>,
    /// Period 01/03/2024 - 31/07/2024.
    pub period: i64,
    /// Instructor of career 0, assigned to `labs_a[0]`.
    pub instructor_a: i64,
    /// Instructor of career 1, assigned to `labs_b[0]`.
    pub instructor_b: i64,
}

/// Fresh database with the seeded catalogue, one period and two instructors.
pub fn seeded(name: &str) -> Fixture {
    let db_path = setup_test_db(name);
    let pool = open_ready(&db_path).expect("open db");
    let conn = &pool.conn;

    let careers = list_careers(conn).expect("careers");
    let careers = [careers[0].id, careers[1].id];

    let ids = |career: i64| -> Vec<i64> {
        laboratories_by_career(conn, career)
            .expect("labs")
            .into_iter()
            .map(|l| l.id)
            .collect()
    };
    let labs_a = ids(careers[0]);
    let labs_b = ids(careers[1]);

    let period = insert_period(conn, "2024-1", &ymd(2024, 3, 1), &ymd(2024, 7, 31)).expect("period");

    let instructor_a = insert_instructor(conn, "Ana", "Paz", careers[0]).expect("instructor");
    assign_laboratory(conn, instructor_a, labs_a[0]).expect("assign");
    let instructor_b = insert_instructor(conn, "Luis", "Mora", careers[1]).expect("instructor");
    assign_laboratory(conn, instructor_b, labs_b[0]).expect("assign");

    Fixture {
        pool,
        careers,
        labs_a,
        labs_b,
        period,
        instructor_a,
        instructor_b,
    }
}

pub fn record(
    date: NaiveDate,
    entry: NaiveTime,
    instructor_id: i64,
    laboratory_id: i64,
    period_id: i64,
) -> UsageRecord {
    UsageRecord {
        id: 0,
        date,
        entry_time: entry,
        exit_time: entry + chrono::Duration::hours(1),
        activity: "Practice".to_string(),
        instructor_id,
        laboratory_id,
        period_id,
    }
}

/// Insert a record directly and return its id.
pub fn add_record(
    fx: &Fixture,
    date: NaiveDate,
    entry: NaiveTime,
    instructor_id: i64,
    laboratory_id: i64,
) -> i64 {
    insert_usage_record(
        &fx.pool.conn,
        &record(date, entry, instructor_id, laboratory_id, fx.period),
    )
    .expect("insert record")
}

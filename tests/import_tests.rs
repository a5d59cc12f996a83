use labregister::core::import::{
    ImportTarget, StagedRow, import_csv, insert_staged, parse_csv_rows, preview_csv,
};
use labregister::db::queries::count_usage_records;
use labregister::errors::AppError;
use std::fs;

mod common;
use common::{hm, seeded, temp_out, ymd};

fn write_csv(name: &str, body: &str) -> std::path::PathBuf {
    let path = std::path::PathBuf::from(temp_out(name, "csv"));
    fs::write(&path, body).unwrap();
    path
}

fn target(fx: &common::Fixture) -> ImportTarget {
    ImportTarget {
        period_id: fx.period,
        laboratory_id: fx.labs_a[0],
        instructor_id: fx.instructor_a,
    }
}

#[test]
fn invalid_date_row_is_skipped_and_valid_one_imported() {
    let mut fx = seeded("import_one_of_two");
    let path = write_csv(
        "import_one_of_two",
        "activity,date,entry_time,exit_time\n\
         Cleaning,31/02/2024,08:00,10:00\n\
         Repair,15/03/2024,09:00,11:00\n",
    );

    let tgt = target(&fx);
    let summary = import_csv(&mut fx.pool.conn, &path, &tgt).unwrap();
    assert_eq!(summary.imported, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(count_usage_records(&fx.pool.conn).unwrap(), 1);
}

#[test]
fn imported_rows_skip_manual_entry_checks() {
    let mut fx = seeded("import_no_cross_checks");
    // Outside the period, and exit before entry.
    let path = write_csv(
        "import_no_cross_checks",
        "activity,date,entry_time,exit_time\n\
         Overtime,02/01/2030,18:00,07:00\n",
    );

    let tgt = target(&fx);
    let summary = import_csv(&mut fx.pool.conn, &path, &tgt).unwrap();
    assert_eq!(summary.imported, 1);
}

#[test]
fn commit_failure_keeps_nothing() {
    let mut fx = seeded("import_commit_failure");
    let staged: Vec<StagedRow> = (1..=5)
        .map(|d| StagedRow {
            activity: format!("Row {d}"),
            date: ymd(2024, 3, d),
            entry_time: hm(8, 0),
            exit_time: hm(9, 0),
        })
        .collect();

    // Foreign keys are checked at COMMIT: an unknown instructor fails the batch there.
    let bad = ImportTarget {
        instructor_id: 9999,
        ..target(&fx)
    };
    assert!(insert_staged(&mut fx.pool.conn, &bad, &staged).is_err());
    assert_eq!(count_usage_records(&fx.pool.conn).unwrap(), 0);

    let tgt = target(&fx);
    assert_eq!(insert_staged(&mut fx.pool.conn, &tgt, &staged).unwrap(), 5);
    assert_eq!(count_usage_records(&fx.pool.conn).unwrap(), 5);
}

#[test]
fn unknown_target_is_rejected_before_reading() {
    let mut fx = seeded("import_unknown_target");
    let bad = ImportTarget {
        laboratory_id: 4242,
        ..target(&fx)
    };
    let missing_file = std::path::Path::new("/nonexistent/records.csv");

    let err = import_csv(&mut fx.pool.conn, missing_file, &bad).unwrap_err();
    assert!(matches!(
        err,
        AppError::NotFound {
            kind: "laboratory",
            id: 4242
        }
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let mut fx = seeded("import_missing_file");
    let tgt = target(&fx);
    let err = import_csv(
        &mut fx.pool.conn,
        std::path::Path::new("/nonexistent/records.csv"),
        &tgt,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
}

#[test]
fn preview_reads_the_file_verbatim() {
    let path = write_csv(
        "import_preview",
        "actividad,fecha,entrada,salida\nRepair,15/03/2024,09:00,11:00\n",
    );
    let preview = preview_csv(&path).unwrap();
    assert_eq!(preview.header, ["actividad", "fecha", "entrada", "salida"]);
    assert_eq!(preview.rows, vec![vec!["Repair", "15/03/2024", "09:00", "11:00"]]);

    let staging = parse_csv_rows(fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(staging.rows.len(), 1);
}

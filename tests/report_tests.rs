use labregister::config::Config;
use labregister::core::filter::RecordQuery;
use labregister::core::report::{ReportLogic, ReportOptions, resolve_header};
use labregister::export::pdf::partial_path;
use std::fs;
use std::path::{Path, PathBuf};

mod common;
use common::{add_record, hm, seeded, temp_out, ymd};

const QUIET: ReportOptions = ReportOptions {
    force: true,
    open: false,
};

fn test_config() -> Config {
    let mut cfg: Config = serde_yaml::from_str("database: unused.sqlite\n").unwrap();
    cfg.signer_name = "Ing. Test Signer".into();
    cfg
}

#[test]
fn header_defaults_to_na() {
    let fx = seeded("report_header_na");
    let h = resolve_header(&fx.pool.conn, &RecordQuery::new(), &test_config()).unwrap();

    assert_eq!(h.laboratory_line, "LABORATORY OF N/A");
    assert_eq!(h.period, "N/A");
    assert_eq!(h.instructor, "N/A");
    assert_eq!(h.career, "N/A");
    assert_eq!(h.signer_name, "Ing. Test Signer");
}

#[test]
fn header_uses_filter_names() {
    let fx = seeded("report_header_names");
    let q = RecordQuery {
        instructor_id: Some(fx.instructor_a),
        career_id: Some(fx.careers[0]),
        laboratory_id: Some(fx.labs_a[2]),
        period_id: Some(fx.period),
    };
    let h = resolve_header(&fx.pool.conn, &q, &test_config()).unwrap();

    assert_eq!(h.laboratory_line, "LABORATORY OF METROLOGY");
    assert_eq!(h.period, "2024-1");
    assert_eq!(h.instructor, "Ing. Ana Paz");
    assert_eq!(h.career, "Mechanics");
}

#[test]
fn ten_records_make_two_pages() {
    let fx = seeded("report_two_pages");
    for day in 1..=10 {
        add_record(&fx, ymd(2024, 3, day), hm(8, 0), fx.instructor_a, fx.labs_a[0]);
    }
    let out = PathBuf::from(temp_out("report_two_pages", "pdf"));

    let outcome =
        ReportLogic::generate(&fx.pool.conn, &RecordQuery::new(), &test_config(), &out, QUIET)
            .unwrap();

    assert_eq!(outcome.rows, 10);
    assert_eq!(outcome.pages, 2);

    let bytes = fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(!partial_path(&out).exists());
}

#[test]
fn empty_report_is_one_page() {
    let fx = seeded("report_empty");
    let out = PathBuf::from(temp_out("report_empty", "pdf"));

    let q = RecordQuery {
        laboratory_id: Some(fx.labs_b[3]),
        ..RecordQuery::new()
    };
    let outcome = ReportLogic::generate(&fx.pool.conn, &q, &test_config(), &out, QUIET).unwrap();

    assert_eq!(outcome.rows, 0);
    assert_eq!(outcome.pages, 1);
    assert!(out.exists());
}

#[test]
fn unwritable_target_leaves_no_file() {
    let fx = seeded("report_unwritable");
    let out = Path::new("/nonexistent-dir/labregister/report.pdf");

    let res = ReportLogic::generate(&fx.pool.conn, &RecordQuery::new(), &test_config(), out, QUIET);

    assert!(res.is_err());
    assert!(!out.exists());
    assert!(!partial_path(out).exists());
}

use labregister::core::filter::{MAX_ROWS, RecordQuery, delete_records};
use labregister::db::queries::{
    count_usage_records, get_usage_record, insert_career, insert_period, insert_usage_record,
};

mod common;
use common::{add_record, hm, record, seeded, ymd};

fn ids(view: &labregister::core::filter::FilteredView) -> Vec<i64> {
    let mut v: Vec<i64> = view.rows.iter().map(|r| r.id).collect();
    v.sort();
    v
}

#[test]
fn laboratory_filter_beats_career_filter() {
    let fx = seeded("filter_lab_wins");
    let in_a = add_record(&fx, ymd(2024, 3, 5), hm(8, 0), fx.instructor_a, fx.labs_a[0]);
    let _other_a = add_record(&fx, ymd(2024, 3, 6), hm(8, 0), fx.instructor_a, fx.labs_a[1]);
    let in_b = add_record(&fx, ymd(2024, 3, 7), hm(8, 0), fx.instructor_b, fx.labs_b[0]);

    // Laboratory of career B with career A selected: only that laboratory.
    let q = RecordQuery {
        career_id: Some(fx.careers[0]),
        laboratory_id: Some(fx.labs_b[0]),
        ..RecordQuery::new()
    };
    assert_eq!(ids(&q.run(&fx.pool.conn).unwrap()), vec![in_b]);

    let q = RecordQuery {
        laboratory_id: Some(fx.labs_a[0]),
        ..RecordQuery::new()
    };
    assert_eq!(ids(&q.run(&fx.pool.conn).unwrap()), vec![in_a]);
}

#[test]
fn career_filter_uses_the_career_laboratories() {
    let fx = seeded("filter_career");
    let a1 = add_record(&fx, ymd(2024, 3, 5), hm(8, 0), fx.instructor_a, fx.labs_a[0]);
    let a2 = add_record(&fx, ymd(2024, 3, 6), hm(8, 0), fx.instructor_a, fx.labs_a[3]);
    let _b = add_record(&fx, ymd(2024, 3, 7), hm(8, 0), fx.instructor_b, fx.labs_b[0]);

    let q = RecordQuery {
        career_id: Some(fx.careers[0]),
        ..RecordQuery::new()
    };
    assert_eq!(ids(&q.run(&fx.pool.conn).unwrap()), vec![a1, a2]);
}

#[test]
fn career_without_laboratories_does_not_restrict() {
    let fx = seeded("filter_career_empty");
    add_record(&fx, ymd(2024, 3, 5), hm(8, 0), fx.instructor_a, fx.labs_a[0]);
    add_record(&fx, ymd(2024, 3, 7), hm(8, 0), fx.instructor_b, fx.labs_b[0]);

    let bare = insert_career(&fx.pool.conn, "Electronics").unwrap();
    let q = RecordQuery {
        career_id: Some(bare),
        ..RecordQuery::new()
    };
    assert_eq!(q.run(&fx.pool.conn).unwrap().len(), 2);
}

#[test]
fn period_filter_excludes_dates_outside_range() {
    let fx = seeded("filter_period");
    let conn = &fx.pool.conn;
    let narrow = insert_period(conn, "March", &ymd(2024, 3, 1), &ymd(2024, 3, 31)).unwrap();

    let first = add_record(&fx, ymd(2024, 3, 1), hm(8, 0), fx.instructor_a, fx.labs_a[0]);
    let last = add_record(&fx, ymd(2024, 3, 31), hm(8, 0), fx.instructor_a, fx.labs_a[0]);
    let _april = add_record(&fx, ymd(2024, 4, 1), hm(8, 0), fx.instructor_a, fx.labs_a[0]);

    let q = RecordQuery {
        period_id: Some(narrow),
        laboratory_id: Some(fx.labs_a[0]),
        instructor_id: Some(fx.instructor_a),
        ..RecordQuery::new()
    };
    assert_eq!(ids(&q.run(conn).unwrap()), vec![first, last]);

    // Unknown period: no date restriction.
    let q = RecordQuery {
        period_id: Some(9999),
        ..RecordQuery::new()
    };
    assert_eq!(q.run(conn).unwrap().len(), 3);
}

#[test]
fn instructor_filter_and_display_names() {
    let fx = seeded("filter_instructor");
    add_record(&fx, ymd(2024, 3, 5), hm(8, 0), fx.instructor_a, fx.labs_a[0]);
    let b = add_record(&fx, ymd(2024, 3, 7), hm(8, 0), fx.instructor_b, fx.labs_b[0]);

    let q = RecordQuery {
        instructor_id: Some(fx.instructor_b),
        ..RecordQuery::new()
    };
    let view = q.run(&fx.pool.conn).unwrap();
    assert_eq!(ids(&view), vec![b]);
    assert_eq!(view.rows[0].instructor_name, "Luis Mora");
    assert_eq!(view.status_line(), "1 record(s) found.");
}

#[test]
fn results_are_capped_newest_first() {
    let fx = seeded("filter_cap");
    let mut conn = rusqlite::Connection::open(fx.pool.conn.path().unwrap()).unwrap();

    let tx = conn.transaction().unwrap();
    for i in 0..1500u32 {
        let date = ymd(2024, 3, 1) + chrono::Duration::days(i64::from(i % 150));
        let entry = hm(7 + (i / 150) % 10, 0);
        let rec = record(date, entry, fx.instructor_a, fx.labs_a[0], fx.period);
        insert_usage_record(&tx, &rec).unwrap();
    }
    tx.commit().unwrap();

    let view = RecordQuery::new().run(&fx.pool.conn).unwrap();
    assert_eq!(view.len(), MAX_ROWS);
    assert!(view.truncated);
    assert!(view.status_line().starts_with("More than 1000"));

    assert_eq!(view.rows[0].date, ymd(2024, 7, 28));
    assert_eq!(view.rows[0].entry_time, hm(16, 0));
    for pair in view.rows.windows(2) {
        let newer = (pair[0].date, pair[0].entry_time);
        let older = (pair[1].date, pair[1].entry_time);
        assert!(newer >= older);
    }
}

#[test]
fn exactly_the_limit_is_not_truncated() {
    let fx = seeded("filter_exact_cap");
    let mut conn = rusqlite::Connection::open(fx.pool.conn.path().unwrap()).unwrap();

    let tx = conn.transaction().unwrap();
    for i in 0..MAX_ROWS as u32 {
        let date = ymd(2024, 3, 1) + chrono::Duration::days(i64::from(i % 100));
        let rec = record(date, hm(8, 0), fx.instructor_a, fx.labs_a[0], fx.period);
        insert_usage_record(&tx, &rec).unwrap();
    }
    tx.commit().unwrap();

    let view = RecordQuery::new().run(&fx.pool.conn).unwrap();
    assert_eq!(view.len(), MAX_ROWS);
    assert!(!view.truncated);
}

#[test]
fn deleting_three_rows_removes_exactly_three_records() {
    let mut fx = seeded("filter_delete_three");
    let mut all = Vec::new();
    for day in 1..=6 {
        all.push(add_record(&fx, ymd(2024, 3, day), hm(8, 0), fx.instructor_a, fx.labs_a[0]));
    }

    let view = RecordQuery::new().run(&fx.pool.conn).unwrap();
    // Newest first: rows 0, 2, 4 are days 6, 4, 2.
    let selected = [0, 2, 4];
    let doomed = view.ids_for_rows(&selected);
    assert_eq!(doomed.len(), 3);

    let n = view.delete_rows(&mut fx.pool.conn, &selected).unwrap();
    assert_eq!(n, 3);
    assert_eq!(count_usage_records(&fx.pool.conn).unwrap(), 3);

    for id in all {
        let exists = get_usage_record(&fx.pool.conn, id).unwrap().is_some();
        assert_eq!(exists, !doomed.contains(&id));
    }
}

#[test]
fn failed_delete_rolls_back_the_batch() {
    let mut fx = seeded("filter_delete_rollback");
    let a = add_record(&fx, ymd(2024, 3, 1), hm(8, 0), fx.instructor_a, fx.labs_a[0]);
    let locked = add_record(&fx, ymd(2024, 3, 2), hm(8, 0), fx.instructor_a, fx.labs_a[0]);
    let c = add_record(&fx, ymd(2024, 3, 3), hm(8, 0), fx.instructor_a, fx.labs_a[0]);

    fx.pool
        .conn
        .execute_batch(&format!(
            "CREATE TRIGGER keep_locked BEFORE DELETE ON usage_records
             WHEN OLD.id = {locked}
             BEGIN SELECT RAISE(ABORT, 'record is locked'); END;"
        ))
        .unwrap();

    assert!(delete_records(&mut fx.pool.conn, &[a, locked, c]).is_err());
    assert_eq!(count_usage_records(&fx.pool.conn).unwrap(), 3);

    // Ids that no longer exist are not counted.
    assert_eq!(delete_records(&mut fx.pool.conn, &[a, a, 4242]).unwrap(), 1);
}

use crate::core::filter::RecordRow;
use crate::utils::{date, time};
use serde::Serialize;

/// One printed table row, already formatted.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ReportRow {
    pub instructor_name: String,
    pub activity: String,
    pub date: String,
    pub entry_time: String,
    pub exit_time: String,
}

impl From<&RecordRow> for ReportRow {
    fn from(r: &RecordRow) -> Self {
        Self {
            instructor_name: r.instructor_name.clone(),
            activity: r.activity.clone(),
            date: date::display(&r.date),
            entry_time: time::format_time(&r.entry_time),
            exit_time: time::format_time(&r.exit_time),
        }
    }
}

/// Text repeated at the top and bottom of every page.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ReportHeader {
    pub institution: String,
    pub faculty: String,
    /// "LABORATORY OF <NAME>", or "LABORATORY OF N/A" with no laboratory filter.
    pub laboratory_line: String,
    pub period: String,
    pub instructor: String,
    pub career: String,
    pub signer_name: String,
    pub signer_title: String,
}

/// Rows in print order: oldest date first. The sort is stable, so rows of
/// the same day keep the listing order (latest entry first).
pub(crate) fn report_rows(rows: &[RecordRow]) -> Vec<ReportRow> {
    let mut sorted: Vec<&RecordRow> = rows.iter().collect();
    sorted.sort_by_key(|r| r.date);
    sorted.into_iter().map(ReportRow::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn rec(id: i64, day: u32, hour: u32) -> RecordRow {
        RecordRow {
            id,
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            entry_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            exit_time: NaiveTime::from_hms_opt(hour + 1, 30, 0).unwrap(),
            activity: format!("Task {id}"),
            instructor_id: 1,
            instructor_name: "Ana Paz".into(),
            laboratory_id: 1,
            laboratory_name: "Metrology".into(),
        }
    }

    #[test]
    fn rows_print_oldest_day_first() {
        // As returned by the query: newest first.
        let rows = vec![rec(3, 20, 9), rec(2, 5, 14), rec(1, 5, 8)];
        let printed = report_rows(&rows);

        let activities: Vec<&str> = printed.iter().map(|r| r.activity.as_str()).collect();
        assert_eq!(activities, ["Task 2", "Task 1", "Task 3"]);
        assert_eq!(printed[0].date, "05/03/2024");
        assert_eq!(printed[0].exit_time, "15:30");
    }
}

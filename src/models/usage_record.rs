use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// One logged session of laboratory use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub entry_time: NaiveTime,
    pub exit_time: NaiveTime,
    pub activity: String,
    pub instructor_id: i64,
    pub laboratory_id: i64,
    pub period_id: i64,
}

/// A record as staged by the registration form or the CSV importer.
///
/// Selection fields are optional because the form may be submitted with
/// an empty dropdown; validation turns that into a user-facing message.
#[derive(Debug, Clone)]
pub struct NewUsageRecord {
    pub period_id: Option<i64>,
    pub career_id: Option<i64>,
    pub laboratory_id: Option<i64>,
    pub instructor_id: Option<i64>,
    pub date: NaiveDate,
    pub entry_time: NaiveTime,
    pub exit_time: NaiveTime,
    pub activity: String,
}

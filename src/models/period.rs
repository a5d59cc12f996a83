use chrono::NaiveDate;
use serde::Serialize;

/// A named date range (e.g. a semester). `start_date <= end_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcademicPeriod {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl AcademicPeriod {
    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let p = AcademicPeriod {
            id: 1,
            name: "S1".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 7, 31).unwrap(),
        };
        assert!(p.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(p.contains(NaiveDate::from_ymd_opt(2024, 7, 31).unwrap()));
        assert!(!p.contains(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()));
    }
}

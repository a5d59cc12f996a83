use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instructor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub career_id: i64,
}

impl Instructor {
    /// "First Last", or just the first name when the last name is blank.
    pub fn display_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

pub fn full_name(first: &str, last: &str) -> String {
    if last.trim().is_empty() {
        first.to_string()
    } else {
        format!("{first} {last}")
    }
}

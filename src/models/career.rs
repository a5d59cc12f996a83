use serde::Serialize;

/// An academic major. Owns laboratories and instructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Career {
    pub id: i64,
    pub name: String,
}

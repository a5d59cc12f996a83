use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Laboratory {
    pub id: i64,
    pub name: String,
    pub career_id: i64,
}

/// A laboratory row not yet persisted (produced by catalogue reconciliation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLaboratory {
    pub name: String,
    pub career_id: i64,
}

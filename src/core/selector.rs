//! Dependent option lists: career → laboratory → instructor.
//!
//! These are plain functions over explicit ids. A screen keeps a
//! [`Cascade`] value and calls `select_*` from its change handlers; nothing
//! here touches persistence beyond reading.

use crate::db::log::log_quietly;
use crate::db::queries::{
    instructors_assigned, laboratories_by_career, list_instructors, list_laboratories,
};
use crate::errors::{AppError, AppResult};
use crate::models::{Instructor, Laboratory};
use crate::ui::messages::warning;
use rusqlite::Connection;
use std::collections::HashSet;

pub const NO_INSTRUCTORS_LABEL: &str = "No instructors assigned to this laboratory";
pub const LOAD_ERROR_LABEL: &str = "Error loading instructors";

/// Laboratories owned by `career_id`, in creation order. Empty when no
/// career is selected.
pub fn laboratories_for(conn: &Connection, career_id: Option<i64>) -> AppResult<Vec<Laboratory>> {
    match career_id {
        Some(id) => laboratories_by_career(conn, id),
        None => Ok(Vec::new()),
    }
}

/// Content of the instructor dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructorOptions {
    /// Career or laboratory not chosen yet: the list stays empty.
    Unselected,
    Found(Vec<Instructor>),
    NoneAssigned,
    LoadFailed,
}

impl InstructorOptions {
    pub fn instructors(&self) -> &[Instructor] {
        match self {
            InstructorOptions::Found(list) => list,
            _ => &[],
        }
    }

    /// `(value, text)` pairs as a dropdown shows them. Placeholders carry no id.
    pub fn labels(&self) -> Vec<(Option<i64>, String)> {
        match self {
            InstructorOptions::Unselected => Vec::new(),
            InstructorOptions::Found(list) => list
                .iter()
                .map(|i| (Some(i.id), i.display_name()))
                .collect(),
            InstructorOptions::NoneAssigned => vec![(None, NO_INSTRUCTORS_LABEL.to_string())],
            InstructorOptions::LoadFailed => vec![(None, LOAD_ERROR_LABEL.to_string())],
        }
    }
}

/// Instructors of `career_id` assigned to `laboratory_id`.
///
/// A failing lookup is logged and turned into [`InstructorOptions::LoadFailed`].
pub fn instructors_for(
    conn: &Connection,
    career_id: Option<i64>,
    laboratory_id: Option<i64>,
) -> InstructorOptions {
    let (Some(career_id), Some(laboratory_id)) = (career_id, laboratory_id) else {
        return InstructorOptions::Unselected;
    };

    match instructors_assigned(conn, career_id, laboratory_id) {
        Ok(list) if list.is_empty() => InstructorOptions::NoneAssigned,
        Ok(list) => InstructorOptions::Found(list),
        Err(e) => {
            let msg = format!(
                "Instructor lookup failed for career #{career_id}, laboratory #{laboratory_id}: {e}"
            );
            warning(&msg);
            log_quietly(conn, "selector_error", "instructors", &msg);
            InstructorOptions::LoadFailed
        }
    }
}

/// Laboratory filter options of the report screen: every laboratory (or
/// the career's), one entry per name, first id kept.
pub fn report_laboratory_options(
    conn: &Connection,
    career_id: Option<i64>,
) -> AppResult<Vec<Laboratory>> {
    let labs = match career_id {
        Some(id) => laboratories_by_career(conn, id)?,
        None => list_laboratories(conn)?,
    };

    let mut seen = HashSet::new();
    Ok(labs
        .into_iter()
        .filter(|l| seen.insert(l.name.clone()))
        .collect())
}

/// Instructor options of the CSV import screen: the whole career, no
/// laboratory join.
pub fn import_instructor_options(
    conn: &Connection,
    career_id: Option<i64>,
) -> AppResult<Vec<Instructor>> {
    match career_id {
        Some(_) => list_instructors(conn, career_id),
        None => Ok(Vec::new()),
    }
}

/// Current choices of a registration form and the option lists derived
/// from them. Choosing a career reloads both levels; choosing a
/// laboratory reloads the instructors.
#[derive(Debug, Clone)]
pub struct Cascade {
    career_id: Option<i64>,
    laboratory_id: Option<i64>,
    laboratories: Vec<Laboratory>,
    instructors: InstructorOptions,
}

impl Default for Cascade {
    fn default() -> Self {
        Self::new()
    }
}

impl Cascade {
    pub fn new() -> Self {
        Self {
            career_id: None,
            laboratory_id: None,
            laboratories: Vec::new(),
            instructors: InstructorOptions::Unselected,
        }
    }

    /// Replace the career; the laboratory list is rebuilt and its first
    /// entry becomes the current laboratory, as a freshly filled dropdown does.
    pub fn select_career(&mut self, conn: &Connection, career_id: Option<i64>) -> AppResult<()> {
        self.career_id = career_id;
        self.laboratories = laboratories_for(conn, career_id)?;
        self.laboratory_id = self.laboratories.first().map(|l| l.id);
        self.instructors = instructors_for(conn, self.career_id, self.laboratory_id);
        Ok(())
    }

    /// The laboratory must be one of the current options.
    pub fn select_laboratory(&mut self, conn: &Connection, laboratory_id: Option<i64>) -> AppResult<()> {
        if let Some(id) = laboratory_id {
            if !self.laboratories.iter().any(|l| l.id == id) {
                return Err(AppError::not_found("laboratory", id));
            }
        }
        self.laboratory_id = laboratory_id;
        self.instructors = instructors_for(conn, self.career_id, self.laboratory_id);
        Ok(())
    }

    pub fn laboratory_id(&self) -> Option<i64> {
        self.laboratory_id
    }

    pub fn laboratories(&self) -> &[Laboratory] {
        &self.laboratories
    }

    pub fn instructors(&self) -> &InstructorOptions {
        &self.instructors
    }
}

/// Laboratories picked for a new instructor: ordered, no duplicates.
#[derive(Debug, Clone, Default)]
pub struct LabSelection {
    labs: Vec<Laboratory>,
}

impl LabSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` (list unchanged) when the laboratory is already selected.
    pub fn add(&mut self, lab: Laboratory) -> bool {
        if self.contains(lab.id) {
            return false;
        }
        self.labs.push(lab);
        true
    }

    pub fn remove(&mut self, laboratory_id: i64) -> bool {
        let before = self.labs.len();
        self.labs.retain(|l| l.id != laboratory_id);
        self.labs.len() != before
    }

    pub fn contains(&self, laboratory_id: i64) -> bool {
        self.labs.iter().any(|l| l.id == laboratory_id)
    }

    pub fn clear(&mut self) {
        self.labs.clear();
    }

    pub fn ids(&self) -> Vec<i64> {
        self.labs.iter().map(|l| l.id).collect()
    }

    pub fn labs(&self) -> &[Laboratory] {
        &self.labs
    }

    pub fn len(&self) -> usize {
        self.labs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labs.is_empty()
    }
}

//! Career / laboratory catalogue seeding and repair.
//!
//! Every career must own the four canonical laboratories. The plan is
//! computed from the current rows and only ever adds what is missing, so
//! running it again is a no-op.

use crate::db::queries::{
    count_careers, insert_career, insert_laboratory, list_careers, list_laboratories,
};
use crate::errors::AppResult;
use crate::models::laboratory::NewLaboratory;
use crate::models::{Career, Laboratory};
use rusqlite::Connection;
use std::collections::HashSet;

pub const CANONICAL_CAREERS: [&str; 4] = [
    "Mechanics",
    "Industrial",
    "Automotive",
    "Industrial Maintenance",
];

pub const CANONICAL_LABORATORIES: [&str; 4] = [
    "Materials Resistance",
    "Turbomachinery & Hydraulics",
    "Metrology",
    "Instrumentation & Control",
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub careers_created: usize,
    pub laboratories_created: usize,
}

impl SeedReport {
    pub fn changed(&self) -> bool {
        self.careers_created > 0 || self.laboratories_created > 0
    }
}

/// Laboratories to create so that each career owns every canonical name.
/// Output order follows `careers`, then the canonical order.
pub fn plan_missing_laboratories(careers: &[Career], laboratories: &[Laboratory]) -> Vec<NewLaboratory> {
    let existing: HashSet<(i64, &str)> = laboratories
        .iter()
        .map(|l| (l.career_id, l.name.as_str()))
        .collect();

    careers
        .iter()
        .flat_map(|c| {
            CANONICAL_LABORATORIES
                .iter()
                .filter(|name| !existing.contains(&(c.id, **name)))
                .map(|name| NewLaboratory {
                    name: (*name).to_string(),
                    career_id: c.id,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Seed the canonical careers on first run, then add any missing
/// laboratory. Everything happens in one transaction.
pub fn seed_catalog(conn: &mut Connection) -> AppResult<SeedReport> {
    let tx = conn.transaction()?;
    let mut report = SeedReport::default();

    if count_careers(&tx)? == 0 {
        for name in CANONICAL_CAREERS {
            insert_career(&tx, name)?;
            report.careers_created += 1;
        }
    }

    let plan = plan_missing_laboratories(&list_careers(&tx)?, &list_laboratories(&tx)?);
    for lab in &plan {
        insert_laboratory(&tx, lab)?;
    }
    report.laboratories_created = plan.len();

    tx.commit()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn career(id: i64) -> Career {
        Career {
            id,
            name: format!("C{id}"),
        }
    }

    fn lab(id: i64, name: &str, career_id: i64) -> Laboratory {
        Laboratory {
            id,
            name: name.to_string(),
            career_id,
        }
    }

    #[test]
    fn empty_catalog_gets_four_per_career() {
        let plan = plan_missing_laboratories(&[career(1), career(2)], &[]);
        assert_eq!(plan.len(), 8);
        assert_eq!(plan[0].name, "Materials Resistance");
        assert_eq!(plan[4].career_id, 2);
    }

    #[test]
    fn only_missing_names_are_planned() {
        let labs = vec![lab(1, "Metrology", 1), lab(2, "Materials Resistance", 1)];
        let plan = plan_missing_laboratories(&[career(1)], &labs);
        let names: Vec<&str> = plan.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Turbomachinery & Hydraulics", "Instrumentation & Control"]);
    }

    #[test]
    fn same_name_in_another_career_does_not_count() {
        let labs = vec![lab(1, "Metrology", 2)];
        let plan = plan_missing_laboratories(&[career(1)], &labs);
        assert_eq!(plan.len(), 4);
    }

    #[test]
    fn complete_catalog_plans_nothing() {
        let labs: Vec<Laboratory> = CANONICAL_LABORATORIES
            .iter()
            .enumerate()
            .map(|(i, n)| lab(i as i64 + 1, n, 1))
            .collect();
        assert!(plan_missing_laboratories(&[career(1)], &labs).is_empty());
    }
}

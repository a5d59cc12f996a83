use crate::config::Config;
use crate::core::filter::RecordQuery;
use crate::db::log::log_quietly;
use crate::db::queries::{get_career, get_instructor, get_laboratory, get_period};
use crate::errors::AppResult;
use crate::export::{
    PdfReport, ReportHeader, ensure_writable, layout, notify_report_success, report_rows,
};
use crate::ui::messages::{info, warning};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub const NOT_AVAILABLE: &str = "N/A";

/// Page header text for the active filters; an unset or unknown filter
/// prints as `N/A`.
pub fn resolve_header(conn: &Connection, query: &RecordQuery, cfg: &Config) -> AppResult<ReportHeader> {
    let lab_name = match query.laboratory_id {
        Some(id) => get_laboratory(conn, id)?.map(|l| l.name.to_uppercase()),
        None => None,
    };

    let period = match query.period_id {
        Some(id) => get_period(conn, id)?.map(|p| p.name),
        None => None,
    };

    let instructor = match query.instructor_id {
        Some(id) => get_instructor(conn, id)?.map(|i| {
            let prefix = cfg.instructor_prefix.trim();
            if prefix.is_empty() {
                i.display_name()
            } else {
                format!("{prefix} {}", i.display_name())
            }
        }),
        None => None,
    };

    let career = match query.career_id {
        Some(id) => get_career(conn, id)?.map(|c| c.name),
        None => None,
    };

    let or_na = |v: Option<String>| v.unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Ok(ReportHeader {
        institution: cfg.institution.clone(),
        faculty: cfg.faculty.clone(),
        laboratory_line: format!("LABORATORY OF {}", or_na(lab_name)),
        period: or_na(period),
        instructor: or_na(instructor),
        career: or_na(career),
        signer_name: cfg.signer_name.clone(),
        signer_title: cfg.signer_title.clone(),
    })
}

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub force: bool,
    pub open: bool,
}

#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub path: PathBuf,
    pub rows: usize,
    pub pages: usize,
}

pub struct ReportLogic;

impl ReportLogic {
    /// Render the filtered records to a PDF at `path`.
    pub fn generate(
        conn: &Connection,
        query: &RecordQuery,
        cfg: &Config,
        path: &Path,
        opts: ReportOptions,
    ) -> AppResult<ReportOutcome> {
        ensure_writable(path, opts.force)?;

        let view = query.run(conn)?;
        if view.truncated {
            warning(view.status_line());
        }

        let rows = report_rows(&view.rows);
        let header = resolve_header(conn, query, cfg)?;

        info(format!("Writing report: {}", path.display()));

        let mut pdf = PdfReport::new();
        pdf.write_report(&header, &rows);
        let pages = pdf.page_total();
        pdf.save(path)?;

        debug_assert_eq!(pages, layout::page_count(rows.len()));

        notify_report_success(pages, path);
        log_quietly(
            conn,
            "report",
            &path.display().to_string(),
            &format!("{} record(s) in {pages} page(s)", rows.len()),
        );

        if opts.open {
            if let Err(e) = open::that(path) {
                warning(format!("Could not open '{}': {e}", path.display()));
            }
        }

        Ok(ReportOutcome {
            path: path.to_path_buf(),
            rows: rows.len(),
            pages,
        })
    }
}

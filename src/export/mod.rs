// src/export/mod.rs

mod fs_utils;
pub mod layout;
pub mod model;
pub mod pdf;

pub(crate) use fs_utils::ensure_writable;
pub(crate) use model::report_rows;
pub use model::{ReportHeader, ReportRow};
pub use pdf::PdfReport;

use crate::ui::messages::success;
use std::path::Path;

pub(crate) fn notify_report_success(pages: usize, path: &Path) {
    success(format!(
        "Report generated in {pages} page(s): {}",
        path.display()
    ));
}

//! Page arithmetic of the usage report: A4 landscape, fixed rows per page,
//! proportional columns. Everything here is pure and unit tested; drawing
//! lives in `pdf.rs`.

use std::borrow::Cow;

pub const ROWS_PER_PAGE: usize = 9;

// A4 landscape, in points.
pub const PAGE_WIDTH: f32 = 842.0;
pub const PAGE_HEIGHT: f32 = 595.0;
pub const MARGIN: f32 = 40.0;

pub const TITLE_Y: [f32; 3] = [545.0, 525.0, 507.0];
pub const TITLE_SIZES: [f32; 3] = [14.0, 13.0, 12.0];

pub const META_X: f32 = 110.0;
pub const META_Y: [f32; 3] = [478.0, 462.0, 446.0];
pub const META_SIZE: f32 = 11.0;

pub const TABLE_TOP: f32 = 425.0;
pub const HEADER_ROW_HEIGHT: f32 = 24.0;
pub const DATA_ROW_HEIGHT: f32 = 34.0;
pub const HEADER_FONT_SIZE: f32 = 10.0;
pub const DATA_FONT_SIZE: f32 = 9.0;
pub const CELL_PADDING: f32 = 6.0;
pub const LINE_HEIGHT: f32 = 11.0;

pub const FOOTER_NAME_Y: f32 = 58.0;
pub const FOOTER_TITLE_Y: f32 = 44.0;
pub const FOOTER_SIZE: f32 = 11.0;

pub const COLUMN_HEADERS: [&str; 5] = ["Activities", "Date", "Entry Time", "Exit Time", "Signature"];
pub const COLUMN_RATIOS: [f32; 5] = [0.35, 0.15, 0.15, 0.15, 0.20];

/// Activity lines that fit in one data row.
pub const MAX_ACTIVITY_LINES: usize = 2;

// Mean Helvetica advance for mixed text, as a fraction of the font size.
const AVG_CHAR_EM: f32 = 0.5;

/// Pages needed for `rows` data rows; an empty report still has one page.
pub fn page_count(rows: usize) -> usize {
    rows.div_ceil(ROWS_PER_PAGE).max(1)
}

/// Split rows into pages. The result always has at least one (possibly
/// empty) page.
pub fn paginate<T>(rows: &[T]) -> Vec<&[T]> {
    if rows.is_empty() {
        return vec![&rows[..0]];
    }
    rows.chunks(ROWS_PER_PAGE).collect()
}

pub fn table_width() -> f32 {
    PAGE_WIDTH - 2.0 * MARGIN
}

pub fn column_widths(total: f32) -> [f32; 5] {
    COLUMN_RATIOS.map(|r| total * r)
}

/// Data rows drawn on a page: an empty page still shows one blank row.
pub fn drawn_rows(on_page: usize) -> usize {
    on_page.max(1)
}

pub fn table_height(drawn_rows: usize) -> f32 {
    HEADER_ROW_HEIGHT + DATA_ROW_HEIGHT * drawn_rows as f32
}

/// Word-wrap an activity to the first column, at most
/// [`MAX_ACTIVITY_LINES`] lines; cut text ends with "...".
pub fn wrap_activity(text: &str, width: f32, font_size: f32) -> Vec<String> {
    let usable = (width - 2.0 * CELL_PADDING).max(font_size);
    let cols = ((usable / (font_size * AVG_CHAR_EM)).floor() as usize).max(4);

    let mut lines: Vec<String> = textwrap::wrap(text.trim(), cols)
        .into_iter()
        .map(Cow::into_owned)
        .collect();

    if lines.len() > MAX_ACTIVITY_LINES {
        lines.truncate(MAX_ACTIVITY_LINES);
        if let Some(last) = lines.last_mut() {
            let keep: String = last.chars().take(cols.saturating_sub(3)).collect();
            *last = format!("{}...", keep.trim_end());
        }
    }

    lines
}

// Helvetica advance widths (1/1000 em) for ' '..='~'.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// Accented Latin letters measure like their base letter.
fn base_letter(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'Á' | 'À' | 'Ä' | 'Â' => 'A',
        'É' | 'È' | 'Ë' | 'Ê' => 'E',
        'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
        'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
        'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
        'Ñ' => 'N',
        other => other,
    }
}

/// Width in points of `text` set in Helvetica (or Helvetica-Bold).
/// Oblique faces share the upright metrics.
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    let units: u32 = text
        .chars()
        .map(|c| {
            let c = base_letter(c);
            match c {
                ' '..='~' => u32::from(table[c as usize - 0x20]),
                _ => 556,
            }
        })
        .sum();
    units as f32 * size / 1000.0
}

/// X that centres `text` between `left` and `left + width`.
pub fn centred_x(text: &str, size: f32, bold: bool, left: f32, width: f32) -> f32 {
    left + (width - text_width(text, size, bold)) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_counts() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(9), 1);
        assert_eq!(page_count(10), 2);
        assert_eq!(page_count(27), 3);
        assert_eq!(page_count(28), 4);
    }

    #[test]
    fn pagination_splits_nine_then_rest() {
        let rows: Vec<u32> = (0..10).collect();
        let pages = paginate(&rows);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 9);
        assert_eq!(pages[1], &[9]);
    }

    #[test]
    fn empty_report_has_one_blank_row() {
        let rows: Vec<u32> = Vec::new();
        let pages = paginate(&rows);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
        assert_eq!(drawn_rows(pages[0].len()), 1);
    }

    #[test]
    fn columns_fill_the_table() {
        let widths = column_widths(table_width());
        let sum: f32 = widths.iter().sum();
        assert!((sum - table_width()).abs() < 0.01);
        assert!((widths[0] / widths[4] - 1.75).abs() < 0.001);
    }

    #[test]
    fn full_table_stays_above_footer() {
        let bottom = TABLE_TOP - table_height(ROWS_PER_PAGE);
        assert!(bottom > FOOTER_NAME_Y + FOOTER_SIZE);
    }

    #[test]
    fn long_activity_is_cut_to_two_lines() {
        let text = "Calibration of pressure gauges ".repeat(20);
        let lines = wrap_activity(&text, 120.0, DATA_FONT_SIZE);
        assert_eq!(lines.len(), MAX_ACTIVITY_LINES);
        assert!(lines[1].ends_with("..."));

        let short = wrap_activity("Tensile test", 266.0, DATA_FONT_SIZE);
        assert_eq!(short, vec!["Tensile test".to_string()]);
    }

    #[test]
    fn helvetica_metrics() {
        // "Hi" = 722 + 222
        assert!((text_width("Hi", 10.0, false) - 9.44).abs() < 0.001);
        assert_eq!(text_width("É", 10.0, true), text_width("E", 10.0, true));
    }
}

use crate::errors::{AppError, AppResult};
use crate::export::layout::{self, COLUMN_HEADERS};
use crate::export::model::{ReportHeader, ReportRow};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");
const OBLIQUE: Name<'static> = Name(b"F3");
const BOLD_OBLIQUE: Name<'static> = Name(b"F4");

const FONT_FACES: [(Name<'static>, &[u8]); 4] = [
    (REGULAR, b"Helvetica"),
    (BOLD, b"Helvetica-Bold"),
    (OBLIQUE, b"Helvetica-Oblique"),
    (BOLD_OBLIQUE, b"Helvetica-BoldOblique"),
];

/// Encode text for a WinAnsi simple font. Characters outside the code
/// page become '?'.
pub fn winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

/// Path the document is written to before being renamed into place.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(".part");
    PathBuf::from(s)
}

pub struct PdfReport {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    current_content_id: Option<Ref>,
    font_ids: [Ref; 4],
    next_id: i32,
}

impl Default for PdfReport {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfReport {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_ids = [Ref::new(3), Ref::new(4), Ref::new(5), Ref::new(6)];

        for (id, (_, face)) in font_ids.iter().zip(FONT_FACES) {
            pdf.type1_font(*id)
                .base_font(Name(face))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            current_content_id: None,
            font_ids,
            next_id: 7,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    fn new_page(&mut self) -> Content {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();

        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, layout::PAGE_WIDTH, layout::PAGE_HEIGHT))
            .contents(content_id);

        {
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            for (id, (name, _)) in self.font_ids.iter().zip(FONT_FACES) {
                fonts.pair(name, *id);
            }
        }

        self.current_content_id = Some(content_id);

        Content::new()
    }

    fn finalize_page(&mut self, content: Content) {
        if let Some(id) = self.current_content_id.take() {
            self.pdf.stream(id, &content.finish());
        }
    }

    fn build_pages_tree(&mut self) {
        let mut pages = self.pdf.pages(self.pages_id);
        pages.count(self.page_refs.len() as i32);
        pages.kids(self.page_refs.clone());
    }

    pub fn page_total(&self) -> usize {
        self.page_refs.len()
    }

    fn draw_text(content: &mut Content, font: Name, size: f32, x: f32, y: f32, text: &str) {
        content.begin_text();
        content.set_font(font, size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&winansi(text)));
        content.end_text();
    }

    fn draw_centred(content: &mut Content, bold: bool, size: f32, y: f32, text: &str) {
        let x = layout::centred_x(text, size, bold, 0.0, layout::PAGE_WIDTH);
        let font = if bold { BOLD } else { REGULAR };
        Self::draw_text(content, font, size, x, y, text);
    }

    fn draw_titles(content: &mut Content, header: &ReportHeader) {
        let lines = [
            header.institution.as_str(),
            header.faculty.as_str(),
            header.laboratory_line.as_str(),
        ];
        for ((text, y), size) in lines.iter().zip(layout::TITLE_Y).zip(layout::TITLE_SIZES) {
            Self::draw_centred(content, true, size, y, text);
        }
    }

    /// "LABEL:" in bold oblique, two spaces, value in oblique.
    fn draw_metadata(content: &mut Content, header: &ReportHeader) {
        let size = layout::META_SIZE;
        let gap = layout::text_width("  ", size, false);
        let entries = [
            ("PERIOD:", header.period.as_str()),
            ("INSTRUCTOR:", header.instructor.as_str()),
            ("CAREER:", header.career.as_str()),
        ];

        for ((label, value), y) in entries.iter().zip(layout::META_Y) {
            Self::draw_text(content, BOLD_OBLIQUE, size, layout::META_X, y, label);
            let x = layout::META_X + layout::text_width(label, size, true) + gap;
            Self::draw_text(content, OBLIQUE, size, x, y, value);
        }
    }

    fn draw_table(content: &mut Content, rows: &[ReportRow]) {
        let left = layout::MARGIN;
        let total = layout::table_width();
        let widths = layout::column_widths(total);
        let drawn = layout::drawn_rows(rows.len());
        let top = layout::TABLE_TOP;
        let bottom = top - layout::table_height(drawn);

        // Header band
        let header_y = top - layout::HEADER_ROW_HEIGHT;
        content.save_state();
        content.set_fill_rgb(0.83, 0.83, 0.83);
        content.rect(left, header_y, total, layout::HEADER_ROW_HEIGHT);
        content.fill_nonzero();
        content.restore_state();

        let mut x = left;
        for (title, w) in COLUMN_HEADERS.iter().zip(widths) {
            let size = layout::HEADER_FONT_SIZE;
            let tx = layout::centred_x(title, size, true, x, w);
            let ty = header_y + (layout::HEADER_ROW_HEIGHT - size) / 2.0 + 2.0;
            Self::draw_text(content, BOLD, size, tx, ty, title);
            x += w;
        }

        // Data rows
        let size = layout::DATA_FONT_SIZE;
        for (i, row) in rows.iter().enumerate() {
            let row_top = header_y - layout::DATA_ROW_HEIGHT * i as f32;
            let mid = row_top - layout::DATA_ROW_HEIGHT / 2.0 - size / 3.0;

            let lines = layout::wrap_activity(&row.activity, widths[0], size);
            let block = layout::LINE_HEIGHT * lines.len().saturating_sub(1) as f32;
            let mut ly = mid + block / 2.0;
            for line in &lines {
                Self::draw_text(content, REGULAR, size, left + layout::CELL_PADDING, ly, line);
                ly -= layout::LINE_HEIGHT;
            }

            let mut cx = left + widths[0];
            for (text, w) in [&row.date, &row.entry_time, &row.exit_time]
                .into_iter()
                .zip(&widths[1..4])
            {
                let tx = layout::centred_x(text, size, false, cx, *w);
                Self::draw_text(content, REGULAR, size, tx, mid, text);
                cx += w;
            }
        }

        // Grid
        content.save_state();
        content.set_stroke_rgb(0.0, 0.0, 0.0);
        content.set_line_width(0.6);
        for r in 0..=drawn {
            let y = header_y - layout::DATA_ROW_HEIGHT * r as f32;
            content.move_to(left, y);
            content.line_to(left + total, y);
        }
        let mut x = left;
        for w in &widths[..4] {
            x += w;
            content.move_to(x, top);
            content.line_to(x, bottom);
        }
        content.stroke();

        content.set_line_width(1.5);
        content.rect(left, bottom, total, top - bottom);
        content.stroke();
        content.restore_state();
    }

    fn draw_footer(content: &mut Content, header: &ReportHeader) {
        let size = layout::FOOTER_SIZE;
        Self::draw_centred(content, true, size, layout::FOOTER_NAME_Y, &header.signer_name);
        Self::draw_centred(content, false, size, layout::FOOTER_TITLE_Y, &header.signer_title);
    }

    /// One page per [`layout::ROWS_PER_PAGE`] rows, at least one.
    pub fn write_report(&mut self, header: &ReportHeader, rows: &[ReportRow]) {
        for page_rows in layout::paginate(rows) {
            let mut content = self.new_page();
            Self::draw_titles(&mut content, header);
            Self::draw_metadata(&mut content, header);
            Self::draw_table(&mut content, page_rows);
            Self::draw_footer(&mut content, header);
            self.finalize_page(content);
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.build_pages_tree();
        self.pdf.finish()
    }

    /// Write to `<path>.part`, then rename over `path`. The partial file
    /// is removed on any failure.
    pub fn save(self, path: &Path) -> AppResult<()> {
        let bytes = self.finish();
        let part = partial_path(path);

        let written = File::create(&part)
            .and_then(|mut f| {
                f.write_all(&bytes)?;
                f.sync_all()
            })
            .and_then(|_| fs::rename(&part, path));

        if let Err(e) = written {
            let _ = fs::remove_file(&part);
            return Err(AppError::Export(format!(
                "cannot write '{}': {e}",
                path.display()
            )));
        }

        Ok(())
    }
}

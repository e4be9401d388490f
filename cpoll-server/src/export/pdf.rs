//! PDF export: A4 landscape table of the filtered records
//!
//! Text-only layout with built-in Helvetica. The first page carries the title
//! and generation timestamp; every page repeats the column header and ends
//! with a footer of timestamp and page number. Cell text wraps within its
//! column, so a row is as tall as its longest cell and pages break on height.

use cpoll_common::ResponseRecord;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use std::ops::Range;
use tracing::warn;

use super::{row_cells, ExportError, COLUMNS};

pub const TITLE: &str = "Admin Dashboard: Polling Responses";

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 10.0;
/// Height of a single-line row; each extra wrapped line adds `LINE_HEIGHT`
const ROW_HEIGHT: f32 = 5.0;
const LINE_HEIGHT: f32 = 3.0;
const FOOTER_Y: f32 = 7.0;
const TABLE_BOTTOM: f32 = 15.0;
const FIRST_HEADER_Y: f32 = 180.0;
const HEADER_Y: f32 = 195.0;

const TITLE_SIZE: f32 = 14.0;
const META_SIZE: f32 = 9.0;
const CELL_SIZE: f32 = 7.0;

/// Approximate Helvetica advance at `CELL_SIZE`, in mm
const CELL_CHAR_WIDTH: f32 = 1.25;

/// Nominal column widths in mm, scaled down to the printable width
pub const COLUMN_WIDTHS: [f32; 16] = [
    15.0, 15.0, 30.0, 20.0, 30.0, 20.0, 20.0, 20.0, 15.0, 15.0, 20.0, 20.0, 20.0, 20.0, 40.0, 20.0,
];

/// Column widths fitted to the page between margins
pub fn scaled_widths() -> [f32; 16] {
    let nominal: f32 = COLUMN_WIDTHS.iter().sum();
    let printable = PAGE_WIDTH - 2.0 * MARGIN;
    let scale = (printable / nominal).min(1.0);
    COLUMN_WIDTHS.map(|w| w * scale)
}

/// Break `text` into lines no wider than `width_mm`
///
/// Words stay whole where they fit; a word longer than the column is split.
/// Always returns at least one (possibly empty) line.
pub fn wrap_cell(text: &str, width_mm: f32) -> Vec<String> {
    let max_chars = ((width_mm / CELL_CHAR_WIDTH).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(max_chars);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }

        let word_len = chars.len();
        if current_len == 0 {
            current = chars.into_iter().collect();
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.extend(chars);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::replace(&mut current, chars.into_iter().collect()));
            current_len = word_len;
        }
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrapped lines for every cell of a row
fn wrap_row(cells: &[String], widths: &[f32; 16]) -> Vec<Vec<String>> {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| wrap_cell(cell, *width))
        .collect()
}

fn line_count(wrapped: &[Vec<String>]) -> usize {
    wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1)
}

/// Height in mm of a row whose tallest cell has `lines` lines
pub fn row_height(lines: usize) -> f32 {
    ROW_HEIGHT + lines.saturating_sub(1) as f32 * LINE_HEIGHT
}

/// Vertical space below the column header on a page
fn table_space(first: bool, header_lines: usize) -> f32 {
    let header_y = if first { FIRST_HEADER_Y } else { HEADER_Y };
    header_y - (header_lines.saturating_sub(1) as f32 * LINE_HEIGHT) - TABLE_BOTTOM
}

/// Row index ranges for each page, filling pages by row height
///
/// Every page takes at least one row; an empty set still gets one page.
pub fn page_ranges(row_heights: &[f32], header_lines: usize) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    loop {
        let space = table_space(ranges.is_empty(), header_lines);
        let mut used = 0.0;
        let mut end = start;
        while end < row_heights.len() && (end == start || used + row_heights[end] <= space) {
            used += row_heights[end];
            end += 1;
        }
        ranges.push(start..end);
        if end >= row_heights.len() {
            return ranges;
        }
        start = end;
    }
}

/// Characters Helvetica's WinAnsi encoding cannot show
fn unencodable_chars(text: &str) -> usize {
    text.chars().filter(|c| *c as u32 > 0xFF).count()
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Draw a wrapped row whose first baseline is at `y`
fn draw_row(
    layer: &PdfLayerReference,
    wrapped: &[Vec<String>],
    y: f32,
    widths: &[f32; 16],
    font: &IndirectFontRef,
) {
    let mut x = MARGIN;
    for (lines, width) in wrapped.iter().zip(widths) {
        for (index, line) in lines.iter().enumerate() {
            let baseline = y - index as f32 * LINE_HEIGHT;
            layer.use_text(line.as_str(), CELL_SIZE, Mm(x), Mm(baseline), font);
        }
        x += width;
    }
}

/// Render `records` as a PDF document
pub fn render_pdf(records: &[&ResponseRecord], generated_on: &str) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(e.to_string()))?,
    };

    let widths = scaled_widths();
    let header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
    let header = wrap_row(&header, &widths);
    let header_lines = line_count(&header);

    let rows: Vec<Vec<Vec<String>>> = records
        .iter()
        .enumerate()
        .map(|(index, record)| wrap_row(&row_cells(index + 1, record), &widths))
        .collect();
    let heights: Vec<f32> = rows.iter().map(|r| row_height(line_count(r))).collect();

    let dropped: usize = rows.iter().flatten().flatten().map(|l| unencodable_chars(l)).sum();
    if dropped > 0 {
        warn!(
            characters = dropped,
            "PDF export contains characters outside the built-in font encoding; they will not render"
        );
    }

    let ranges = page_ranges(&heights, header_lines);
    let page_count = ranges.len();

    for (page_index, range) in ranges.into_iter().enumerate() {
        let layer = if page_index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };

        let header_y = if page_index == 0 {
            layer.use_text(TITLE, TITLE_SIZE, Mm(MARGIN), Mm(195.0), &fonts.bold);
            layer.use_text(
                format!("Generated on: {}", generated_on),
                META_SIZE,
                Mm(MARGIN),
                Mm(188.0),
                &fonts.regular,
            );
            FIRST_HEADER_Y
        } else {
            HEADER_Y
        };

        draw_row(&layer, &header, header_y, &widths, &fonts.bold);

        // Cursor tracks the baseline of the previous row's last line
        let mut y = header_y - (header_lines - 1) as f32 * LINE_HEIGHT;
        for index in range {
            draw_row(&layer, &rows[index], y - ROW_HEIGHT, &widths, &fonts.regular);
            y -= heights[index];
        }

        layer.use_text(
            format!("Generated on: {}", generated_on),
            META_SIZE,
            Mm(MARGIN),
            Mm(FOOTER_Y),
            &fonts.regular,
        );
        layer.use_text(
            format!("Page {} of {}", page_index + 1, page_count),
            META_SIZE,
            Mm(PAGE_WIDTH - MARGIN - 25.0),
            Mm(FOOTER_Y),
            &fonts.regular,
        );
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

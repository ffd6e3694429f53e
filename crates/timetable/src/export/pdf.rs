//! Single-page PDF rendering of a grid snapshot.
//!
//! The snapshot is painted as a vector table (Helvetica text, filled and
//! stroked rectangles) onto one landscape A4 page, scaled so every row fits.
//! The output is a visual export only: layout may differ from the HTML view
//! and nothing here is meant to be byte-stable across versions.

use std::io::{self, Write};

use super::ExportError;
use crate::render::{Shade, Snapshot, SnapshotCell};

const PAGE_WIDTH: f32 = 841.89;
const PAGE_HEIGHT: f32 = 595.28;
const MARGIN: f32 = 28.0;

/// Width of a row-label column relative to a data column.
const LABEL_WEIGHT: f32 = 0.8;
const MAX_ROW_HEIGHT: f32 = 60.0;
const MIN_FONT_SIZE: f32 = 3.5;
const MAX_FONT_SIZE: f32 = 9.0;
const LINE_SPACING: f32 = 1.15;
const CELL_PADDING: f32 = 2.0;

/// Renders `snapshot` and returns the PDF bytes.
pub fn export_pdf(snapshot: &Snapshot) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    render_pdf(snapshot, &mut buf)?;
    Ok(buf)
}

/// Writes `snapshot` as a PDF document to `out`.
pub fn render_pdf<W: Write>(snapshot: &Snapshot, out: &mut W) -> io::Result<()> {
    let content = page_content(snapshot);
    write_document(&content, out)
}

struct Layout {
    xs: Vec<f32>,
    widths: Vec<f32>,
    top: f32,
    row_height: f32,
    font_size: f32,
}

fn page_content(snapshot: &Snapshot) -> String {
    let mut ops = String::new();

    let mut y = PAGE_HEIGHT - MARGIN - 14.0;
    push_text(&mut ops, "F2", 14.0, MARGIN, y, &snapshot.title);
    y -= 14.0;
    push_text(&mut ops, "F1", 10.0, MARGIN, y, &snapshot.caption);
    y -= 10.0;

    let columns = snapshot.column_count().max(1);
    let label_columns = snapshot.label_columns.min(columns);
    let units = label_columns as f32 * LABEL_WEIGHT + (columns - label_columns) as f32;
    let unit = (PAGE_WIDTH - 2.0 * MARGIN) / units;

    let widths: Vec<f32> = (0..columns)
        .map(|c| if c < label_columns { unit * LABEL_WEIGHT } else { unit })
        .collect();
    let xs: Vec<f32> = widths
        .iter()
        .scan(MARGIN, |x, w| {
            let start = *x;
            *x += w;
            Some(start)
        })
        .collect();

    let row_count = snapshot.body.len() + 1;
    let row_height = ((y - MARGIN) / row_count as f32).min(MAX_ROW_HEIGHT);
    let lines = snapshot.max_lines() as f32;
    let font_size = (row_height / (lines * LINE_SPACING + 0.5)).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);

    let layout = Layout {
        xs,
        widths,
        top: y,
        row_height,
        font_size,
    };

    push_row(&mut ops, &layout, 0, &snapshot.header);
    for (r, row) in snapshot.body.iter().enumerate() {
        push_row(&mut ops, &layout, r + 1, row);
    }

    ops
}

fn push_row(ops: &mut String, layout: &Layout, row_index: usize, cells: &[SnapshotCell]) {
    for (c, cell) in cells.iter().enumerate().take(layout.xs.len()) {
        if cell.is_covered() {
            continue;
        }

        let x = layout.xs[c];
        let width = layout.widths[c];
        let top = layout.top - layout.row_height * row_index as f32;
        let height = layout.row_height * cell.row_span as f32;
        let bottom = top - height;

        if let Some(gray) = fill_gray(cell.shade) {
            ops.push_str(&format!(
                "{gray:.2} g {x:.2} {bottom:.2} {width:.2} {height:.2} re f\n"
            ));
        }
        ops.push_str(&format!(
            "0 G 0.5 w {x:.2} {bottom:.2} {width:.2} {height:.2} re S\n"
        ));

        for (i, line) in cell.lines.iter().enumerate() {
            let baseline =
                top - CELL_PADDING - layout.font_size * (i as f32 * LINE_SPACING + 1.0);
            if baseline < bottom + CELL_PADDING {
                break;
            }
            let font = if i == 0 { "F2" } else { "F1" };
            let text = fit(line, width - 2.0 * CELL_PADDING, layout.font_size);
            push_text(ops, font, layout.font_size, x + CELL_PADDING, baseline, &text);
        }
    }
}

fn fill_gray(shade: Shade) -> Option<f32> {
    match shade {
        Shade::Header => Some(0.92),
        Shade::Group => Some(0.85),
        Shade::Filled => Some(0.97),
        Shade::Break => Some(0.75),
        Shade::Empty => None,
    }
}

fn push_text(ops: &mut String, font: &str, size: f32, x: f32, y: f32, text: &str) {
    ops.push_str(&format!(
        "BT 0 g /{font} {size:.2} Tf {x:.2} {y:.2} Td ({}) Tj ET\n",
        escape_text(text)
    ));
}

/// Truncates `text` to the characters that fit in `width` at `size`,
/// using an average Helvetica glyph width of half the font size.
fn fit(text: &str, width: f32, size: f32) -> String {
    let max_chars = (width / (size * 0.5)).floor().max(0.0) as usize;
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    if max_chars < 4 {
        return text.chars().take(max_chars).collect();
    }
    let mut out: String = text.chars().take(max_chars - 3).collect();
    out.push_str("...");
    out
}

/// Escapes a PDF literal string for the WinAnsiEncoding fonts.
///
/// Characters outside ASCII are written as octal byte escapes when the
/// encoding has a glyph for them. Anything else becomes `?`.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c => match win_ansi_byte(c) {
                Some(byte) => out.push_str(&format!("\\{byte:03o}")),
                None => out.push('?'),
            },
        }
    }
    out
}

/// WinAnsiEncoding code for a non-ASCII character, if it has one.
fn win_ansi_byte(ch: char) -> Option<u8> {
    match ch {
        // Latin-1 block, identical in WinAnsiEncoding
        '\u{a0}'..='\u{ff}' => Some(ch as u32 as u8),
        '€' => Some(0x80),
        '…' => Some(0x85),
        '‘' => Some(0x91),
        '’' => Some(0x92),
        '“' => Some(0x93),
        '”' => Some(0x94),
        '•' => Some(0x95),
        '–' => Some(0x96),
        '—' => Some(0x97),
        _ => None,
    }
}

fn write_document<W: Write>(content: &str, out: &mut W) -> io::Result<()> {
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.2} {PAGE_HEIGHT:.2}] \
             /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>"
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ),
    ];

    let mut buf: Vec<u8> = Vec::with_capacity(content.len() + 1024);
    buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(buf.len());
        write!(buf, "{} 0 obj\n{}\nendobj\n", i + 1, body)?;
    }

    let xref_offset = buf.len();
    write!(buf, "xref\n0 {}\n", objects.len() + 1)?;
    buf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        write!(buf, "{offset:010} 00000 n \n")?;
    }
    write!(
        buf,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    )?;

    out.write_all(&buf)
}

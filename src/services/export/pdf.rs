//! PDF export: an A4 landscape table with each signature drawn into its row.
//!
//! The document is assembled directly with `lopdf`. Text uses the standard
//! Helvetica fonts (`WinAnsiEncoding`), so nothing is embedded apart from the
//! signature images. Each signature becomes an RGB image `XObject` with its
//! alpha channel as a soft mask, scaled to fit the TTD cell with its aspect
//! ratio kept.
//!
//! Layout works in millimetres from the top-left corner and converts to PDF
//! points (bottom-left origin) only when emitting operators.

#[cfg(test)]
#[path = "pdf_test.rs"]
mod pdf_test;

use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use signature::artifact::SignatureArtifact;
use time::UtcOffset;
use tracing::warn;

use super::{COLUMNS, ExportError, SIGNATURE_COLUMN, row_cells};
use crate::config::ExportHeading;
use crate::services::attendance::Attendance;

/// Points per millimetre.
const PT_PER_MM: f64 = 72.0 / 25.4;

const PAGE_WIDTH_MM: f64 = 297.0;
const PAGE_HEIGHT_MM: f64 = 210.0;
const MARGIN_MM: f64 = 14.0;

/// Baselines of the three heading lines.
const HEADING_BASELINES_MM: [f64; 3] = [15.0, 22.0, 29.0];
const TITLE_SIZE_PT: f64 = 16.0;
const SUBTITLE_SIZE_PT: f64 = 12.0;
const TABLE_TOP_MM: f64 = 40.0;

const BODY_SIZE_PT: f64 = 8.0;
const LINE_HEIGHT_FACTOR: f64 = 1.15;
const CELL_PADDING_MM: f64 = 2.0;
const SIGNATURE_INSET_MM: f64 = 2.0;
/// Rows carrying a signature are at least this tall so the image is legible.
const SIGNATURE_ROW_MIN_MM: f64 = 15.0;

pub const COLUMN_WIDTHS_MM: [f64; 9] = [10.0, 30.0, 20.0, 25.0, 25.0, 25.0, 25.0, 30.0, 20.0];

const HEADER_FILL: [u8; 3] = [41, 50, 65];
const WHITE: [u8; 3] = [255, 255, 255];
const BLACK: [u8; 3] = [0, 0, 0];
const GRID: [u8; 3] = [200, 200, 200];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

/// A signature image registered in the shared page resources.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EmbeddedImage {
    name: String,
    width: u32,
    height: u32,
}

/// Render the attendance table and return the PDF bytes.
///
/// # Errors
///
/// Returns [`ExportError`] if a timestamp cannot be formatted or the document
/// cannot be serialized.
pub fn render(records: &[Attendance], heading: &ExportHeading, offset: UtcOffset) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut xobjects = Dictionary::new();
    let images: Vec<Option<EmbeddedImage>> = records
        .iter()
        .enumerate()
        .map(|(index, record)| embed_signature(&mut doc, &mut xobjects, index, record))
        .collect();

    let bottom = PAGE_HEIGHT_MM - MARGIN_MM;
    let header_height = row_height(&header_lines(), false);
    let mut pages = Vec::new();
    let mut page = PageContent::default();
    page.heading(heading);
    let mut y = TABLE_TOP_MM;
    y += page.header_row(y);

    for (index, record) in records.iter().enumerate() {
        let cells = row_cells(index, record, offset)?;
        let mut lines: Vec<Vec<String>> = cells
            .iter()
            .zip(COLUMN_WIDTHS_MM)
            .map(|(text, width)| wrap_text(text, width - 2.0 * CELL_PADDING_MM, BODY_SIZE_PT))
            .collect();
        let mut image = images[index].as_ref();

        // Rows that fit on a fresh page move there whole; taller rows are
        // split line by line, the signature staying with the first part.
        loop {
            let height = row_height(&lines, image.is_some());
            let fresh_page = y <= MARGIN_MM + header_height;
            if y + height <= bottom {
                page.body_row(y, height, &lines, image);
                y += height;
                break;
            }
            let room = bottom - y;
            let capacity = lines_fitting(room);
            let moves_whole = !fresh_page && height <= bottom - MARGIN_MM - header_height;
            let signature_cramped = image.is_some() && room < SIGNATURE_ROW_MIN_MM;
            if moves_whole || (!fresh_page && (capacity == 0 || signature_cramped)) {
                pages.push(std::mem::take(&mut page));
                y = MARGIN_MM;
                y += page.header_row(y);
                continue;
            }
            let rest = split_lines(&mut lines, capacity.max(1));
            let height = row_height(&lines, image.is_some()).min(room);
            page.body_row(y, height, &lines, image);
            lines = rest;
            image = None;
            pages.push(std::mem::take(&mut page));
            y = MARGIN_MM;
            y += page.header_row(y);
        }
    }
    pages.push(page);

    let regular_id = doc.add_object(font_dictionary("Helvetica"));
    let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource() => regular_id,
            Font::Bold.resource() => bold_id,
        },
        "XObject" => xobjects,
    });

    let mut kids = Vec::with_capacity(pages.len());
    for content in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.ops));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 842.into(), 595.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn font_dictionary(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Decode a record's signature and add it as an image `XObject`. Empty or
/// undecodable signatures leave the cell blank.
fn embed_signature(
    doc: &mut Document,
    xobjects: &mut Dictionary,
    index: usize,
    record: &Attendance,
) -> Option<EmbeddedImage> {
    if record.signature.is_empty() {
        return None;
    }
    let image = match SignatureArtifact::decode(&record.signature) {
        Ok(image) => image,
        Err(e) => {
            warn!(id = %record.id, error = %e, "skipping undecodable signature in PDF export");
            return None;
        }
    };

    let (width, height) = (image.width(), image.height());
    let mut rgb = Vec::with_capacity(image.pixels().len() * 3);
    let mut alpha = Vec::with_capacity(image.pixels().len());
    for pixel in image.pixels() {
        let c = pixel.demultiply();
        rgb.extend_from_slice(&[c.red(), c.green(), c.blue()]);
        alpha.push(c.alpha());
    }

    let smask_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        alpha,
    ));
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "SMask" => smask_id,
        },
        rgb,
    ));

    let name = format!("Sig{index}");
    xobjects.set(name.clone(), image_id);
    Some(EmbeddedImage { name, width, height })
}

// =============================================================================
// LAYOUT
// =============================================================================

fn line_height_mm(size_pt: f64) -> f64 {
    size_pt * LINE_HEIGHT_FACTOR / PT_PER_MM
}

#[allow(clippy::cast_precision_loss)]
fn row_height(lines: &[Vec<String>], has_signature: bool) -> f64 {
    let max_lines = lines.iter().map(Vec::len).max().unwrap_or(1).max(1);
    let text = max_lines as f64 * line_height_mm(BODY_SIZE_PT) + 2.0 * CELL_PADDING_MM;
    if has_signature { text.max(SIGNATURE_ROW_MIN_MM) } else { text }
}

/// Number of body text lines that fit in a row of `height_mm`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lines_fitting(height_mm: f64) -> usize {
    let text = height_mm - 2.0 * CELL_PADDING_MM;
    if text <= 0.0 { 0 } else { (text / line_height_mm(BODY_SIZE_PT)).floor() as usize }
}

/// Keep the first `keep` lines of every cell and return the remainder.
fn split_lines(lines: &mut [Vec<String>], keep: usize) -> Vec<Vec<String>> {
    lines
        .iter_mut()
        .map(|cell| if cell.len() > keep { cell.split_off(keep) } else { Vec::new() })
        .collect()
}

fn header_lines() -> Vec<Vec<String>> {
    COLUMNS
        .iter()
        .zip(COLUMN_WIDTHS_MM)
        .map(|(title, width)| wrap_text(title, width - 2.0 * CELL_PADDING_MM, BODY_SIZE_PT))
        .collect()
}

/// Helvetica advance widths (per 1000 em) for printable ASCII.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' .. '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0' .. '?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@' .. 'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P' .. '_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`' .. 'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p' .. '~'
];

/// Approximate rendered width of `text` in millimetres.
fn text_width_mm(text: &str, size_pt: f64) -> f64 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as usize;
            if (32..127).contains(&code) { u32::from(HELVETICA_WIDTHS[code - 32]) } else { 556 }
        })
        .sum();
    f64::from(units) / 1000.0 * size_pt / PT_PER_MM
}

/// Greedy word wrap to `max_mm`. Words wider than a line are split by
/// character. Always returns at least one line.
fn wrap_text(text: &str, max_mm: f64, size_pt: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() { word.to_owned() } else { format!("{current} {word}") };
        if text_width_mm(&candidate, size_pt) <= max_mm {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        for c in word.chars() {
            current.push(c);
            if text_width_mm(&current, size_pt) > max_mm && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::replace(&mut current, c.to_string()));
            }
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

// =============================================================================
// CONTENT STREAM
// =============================================================================

/// Operators for one page, in top-left millimetre coordinates.
#[derive(Debug, Default)]
struct PageContent {
    ops: Vec<u8>,
}

impl PageContent {
    fn push(&mut self, op: &str) {
        self.ops.extend_from_slice(op.as_bytes());
        self.ops.push(b'\n');
    }

    fn fill_rect(&mut self, x: f64, top: f64, width: f64, height: f64, color: [u8; 3]) {
        let [r, g, b] = rgb(color);
        self.push(&format!(
            "{r:.3} {g:.3} {b:.3} rg {:.2} {:.2} {:.2} {:.2} re f",
            x * PT_PER_MM,
            pdf_y(top + height),
            width * PT_PER_MM,
            height * PT_PER_MM
        ));
    }

    fn stroke_rect(&mut self, x: f64, top: f64, width: f64, height: f64) {
        let [r, g, b] = rgb(GRID);
        self.push(&format!(
            "{r:.3} {g:.3} {b:.3} RG 0.3 w {:.2} {:.2} {:.2} {:.2} re S",
            x * PT_PER_MM,
            pdf_y(top + height),
            width * PT_PER_MM,
            height * PT_PER_MM
        ));
    }

    fn text(&mut self, font: Font, size_pt: f64, x: f64, baseline: f64, text: &str, color: [u8; 3]) {
        let [r, g, b] = rgb(color);
        self.push(&format!(
            "BT /{} {size_pt:.1} Tf {r:.3} {g:.3} {b:.3} rg {:.2} {:.2} Td",
            font.resource(),
            x * PT_PER_MM,
            pdf_y(baseline)
        ));
        self.ops.extend_from_slice(&pdf_string(text));
        self.push(" Tj ET");
    }

    fn image(&mut self, name: &str, x: f64, top: f64, width: f64, height: f64) {
        self.push(&format!(
            "q {:.2} 0 0 {:.2} {:.2} {:.2} cm /{name} Do Q",
            width * PT_PER_MM,
            height * PT_PER_MM,
            x * PT_PER_MM,
            pdf_y(top + height)
        ));
    }

    fn centered(&mut self, font: Font, size_pt: f64, baseline: f64, text: &str) {
        let x = (PAGE_WIDTH_MM - text_width_mm(text, size_pt)) / 2.0;
        self.text(font, size_pt, x.max(0.0), baseline, text, BLACK);
    }

    fn heading(&mut self, heading: &ExportHeading) {
        let [title, organization, region] = HEADING_BASELINES_MM;
        self.centered(Font::Bold, TITLE_SIZE_PT, title, &heading.title);
        self.centered(Font::Regular, SUBTITLE_SIZE_PT, organization, &heading.organization);
        self.centered(Font::Regular, SUBTITLE_SIZE_PT, region, &heading.region);
    }

    /// Draw the column header row at `top`; returns its height.
    fn header_row(&mut self, top: f64) -> f64 {
        let lines = header_lines();
        let height = row_height(&lines, false);
        let table_width: f64 = COLUMN_WIDTHS_MM.iter().sum();
        self.fill_rect(MARGIN_MM, top, table_width, height, HEADER_FILL);
        self.cells(top, &lines, Font::Bold, WHITE);
        height
    }

    fn body_row(&mut self, top: f64, height: f64, lines: &[Vec<String>], image: Option<&EmbeddedImage>) {
        let mut x = MARGIN_MM;
        for (col, width) in COLUMN_WIDTHS_MM.into_iter().enumerate() {
            self.stroke_rect(x, top, width, height);
            if col == SIGNATURE_COLUMN {
                if let Some(image) = image {
                    self.fit_image(image, x, top, width, height);
                }
            }
            x += width;
        }
        self.cells(top, lines, Font::Regular, BLACK);
    }

    fn cells(&mut self, top: f64, lines: &[Vec<String>], font: Font, color: [u8; 3]) {
        let line_height = line_height_mm(BODY_SIZE_PT);
        let ascent = BODY_SIZE_PT * 0.8 / PT_PER_MM;
        let mut x = MARGIN_MM;
        for (cell, width) in lines.iter().zip(COLUMN_WIDTHS_MM) {
            let mut baseline = top + CELL_PADDING_MM + ascent;
            for line in cell.iter().filter(|l| !l.is_empty()) {
                self.text(font, BODY_SIZE_PT, x + CELL_PADDING_MM, baseline, line, color);
                baseline += line_height;
            }
            x += width;
        }
    }

    /// Scale `image` into the cell minus the inset, keeping its aspect ratio,
    /// and center it.
    fn fit_image(&mut self, image: &EmbeddedImage, x: f64, top: f64, width: f64, height: f64) {
        let box_w = width - 2.0 * SIGNATURE_INSET_MM;
        let box_h = height - 2.0 * SIGNATURE_INSET_MM;
        if box_w <= 0.0 || box_h <= 0.0 || image.width == 0 || image.height == 0 {
            return;
        }
        let (img_w, img_h) = (f64::from(image.width), f64::from(image.height));
        let scale = (box_w / img_w).min(box_h / img_h);
        let (draw_w, draw_h) = (img_w * scale, img_h * scale);
        let left = x + SIGNATURE_INSET_MM + (box_w - draw_w) / 2.0;
        let upper = top + SIGNATURE_INSET_MM + (box_h - draw_h) / 2.0;
        self.image(&image.name, left, upper, draw_w, draw_h);
    }
}

fn pdf_y(top_mm: f64) -> f64 {
    (PAGE_HEIGHT_MM - top_mm) * PT_PER_MM
}

fn rgb(color: [u8; 3]) -> [f64; 3] {
    color.map(|c| f64::from(c) / 255.0)
}

/// Encode `text` as a literal PDF string in `WinAnsiEncoding`. Characters
/// outside Latin-1 become `?`.
fn pdf_string(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 2);
    out.push(b'(');
    for c in text.chars() {
        let byte = u8::try_from(u32::from(c)).unwrap_or(b'?');
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out.push(b')');
    out
}

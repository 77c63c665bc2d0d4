use time::macros::datetime;

use super::*;
use crate::services::test_helpers::{sample_signature, stored_attendance};

fn image_streams(doc: &Document) -> usize {
    doc.objects
        .values()
        .filter(|obj| match obj {
            Object::Stream(stream) => {
                matches!(stream.dict.get(b"Subtype"), Ok(Object::Name(name)) if name.as_slice() == b"Image")
            }
            _ => false,
        })
        .count()
}

fn records(n: usize) -> Vec<Attendance> {
    (0..n)
        .map(|i| stored_attendance(&format!("Peserta {i}"), datetime!(2025-01-02 03:04 UTC)))
        .collect()
}

// =============================================================
// Document
// =============================================================

#[test]
fn renders_loadable_single_page() {
    let bytes = render(&records(3), &ExportHeading::default(), UtcOffset::UTC).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.5"));

    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn empty_list_renders_heading_page() {
    let bytes = render(&[], &ExportHeading::default(), UtcOffset::UTC).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
    assert_eq!(image_streams(&doc), 0);
}

#[test]
fn long_lists_paginate() {
    let bytes = render(&records(40), &ExportHeading::default(), UtcOffset::UTC).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    assert!(doc.get_pages().len() >= 2);
}

/// (page index, x, y) of every text position, in page order.
fn text_positions(doc: &Document) -> Vec<(usize, f32, f32)> {
    let mut out = Vec::new();
    for (page, (_, id)) in doc.get_pages().into_iter().enumerate() {
        let content = doc.get_and_decode_page_content(id).unwrap();
        for op in content.operations.iter().filter(|op| op.operator == "Td") {
            out.push((page, op.operands[0].as_float().unwrap(), op.operands[1].as_float().unwrap()));
        }
    }
    out
}

#[test]
fn row_taller_than_a_page_is_split_across_pages() {
    let mut list = records(1);
    list[0].institution = "Dinas Pekerjaan Umum ".repeat(120);
    let bytes = render(&list, &ExportHeading::default(), UtcOffset::UTC).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let pages = doc.get_pages().len();
    assert!(pages >= 3);

    let positions = text_positions(&doc);
    let lowest = MARGIN_MM * PT_PER_MM;
    for (page, _, y) in &positions {
        assert!(f64::from(*y) >= lowest - 0.01, "text below the margin on page {page}: {y}");
    }
    // Heading (3) and column headers (9) alone would leave page 1 with 12.
    let first_page = positions.iter().filter(|(page, _, _)| *page == 0).count();
    assert!(first_page > 12 + 8);

    // Every wrapped line of the institution cell is drawn exactly once, plus
    // its column header on each page.
    let column_x = (MARGIN_MM + COLUMN_WIDTHS_MM[..4].iter().sum::<f64>() + CELL_PADDING_MM) * PT_PER_MM;
    let in_column = positions
        .iter()
        .filter(|(_, x, _)| (f64::from(*x) - column_x).abs() < 0.02)
        .count();
    let wrapped = wrap_text(&list[0].institution, COLUMN_WIDTHS_MM[4] - 2.0 * CELL_PADDING_MM, BODY_SIZE_PT);
    assert_eq!(in_column, wrapped.len() + pages);
}

#[test]
fn signature_stays_with_first_part_of_split_row() {
    let mut list = records(1);
    list[0].institution = "Dinas Pekerjaan Umum ".repeat(120);
    let bytes = render(&list, &ExportHeading::default(), UtcOffset::UTC).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();

    let draws: Vec<usize> = doc
        .get_pages()
        .into_values()
        .map(|id| {
            let content = doc.get_and_decode_page_content(id).unwrap();
            content.operations.iter().filter(|op| op.operator == "Do").count()
        })
        .collect();
    assert_eq!(draws[0], 1);
    assert_eq!(draws.iter().sum::<usize>(), 1);
}

#[test]
fn split_lines_keeps_head_and_returns_rest() {
    let mut lines = vec![vec!["x".to_owned()]; 9];
    lines[1] = vec!["y".to_owned(); 30];
    let rest = split_lines(&mut lines, 10);
    assert_eq!(lines[1].len(), 10);
    assert_eq!(rest[1].len(), 20);
    assert_eq!(lines[0].len(), 1);
    assert!(rest[0].is_empty());
}

#[test]
fn lines_fitting_respects_padding() {
    assert_eq!(lines_fitting(2.0 * CELL_PADDING_MM), 0);
    assert_eq!(lines_fitting(0.0), 0);
    let one = 2.0 * CELL_PADDING_MM + line_height_mm(BODY_SIZE_PT);
    assert_eq!(lines_fitting(one + 0.01), 1);
    assert!(row_height(&[vec![String::new(); lines_fitting(100.0)]], false) <= 100.0);
}

#[test]
fn each_signature_embeds_image_and_soft_mask() {
    let bytes = render(&records(2), &ExportHeading::default(), UtcOffset::UTC).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(image_streams(&doc), 4);
}

#[test]
fn undecodable_signature_leaves_cell_blank() {
    let mut list = records(2);
    list[0].signature = SignatureArtifact::from_stored("data:image/png;base64,AAAA");
    list[1].signature = SignatureArtifact::empty();

    let bytes = render(&list, &ExportHeading::default(), UtcOffset::UTC).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(image_streams(&doc), 0);
}

#[test]
fn embedded_image_matches_signature_size() {
    let mut doc = Document::with_version("1.5");
    let mut xobjects = Dictionary::new();
    let record = stored_attendance("Budi", datetime!(2025-01-02 03:04 UTC));

    let image = embed_signature(&mut doc, &mut xobjects, 3, &record).unwrap();
    let pixmap = sample_signature().decode().unwrap();
    assert_eq!(image.name, "Sig3");
    assert_eq!((image.width, image.height), (pixmap.width(), pixmap.height()));
    assert!(xobjects.has(b"Sig3"));
}

// =============================================================
// Layout helpers
// =============================================================

#[test]
fn short_text_stays_on_one_line() {
    assert_eq!(wrap_text("Budi", 26.0, BODY_SIZE_PT), vec!["Budi"]);
    assert_eq!(wrap_text("", 26.0, BODY_SIZE_PT), vec![""]);
}

#[test]
fn long_text_wraps_within_width() {
    let text = "Dinas Pekerjaan Umum Penataan Ruang dan Perumahan Rakyat";
    let lines = wrap_text(text, 21.0, BODY_SIZE_PT);
    assert!(lines.len() > 1);
    for line in &lines {
        assert!(text_width_mm(line, BODY_SIZE_PT) <= 21.0, "{line} too wide");
    }
    assert_eq!(lines.join(" "), text);
}

#[test]
fn unbreakable_word_is_split() {
    let lines = wrap_text("198703122010011002198703122010011002", 16.0, BODY_SIZE_PT);
    assert!(lines.len() > 1);
    assert_eq!(lines.concat(), "198703122010011002198703122010011002");
}

#[test]
fn signature_rows_have_minimum_height() {
    let lines = vec![vec!["x".to_owned()]; 9];
    assert!((row_height(&lines, true) - SIGNATURE_ROW_MIN_MM).abs() < f64::EPSILON);
    assert!(row_height(&lines, false) < SIGNATURE_ROW_MIN_MM);
}

#[test]
fn pdf_string_escapes_delimiters_and_maps_latin1() {
    assert_eq!(pdf_string("a(b)\\"), b"(a\\(b\\)\\\\)".to_vec());
    assert_eq!(pdf_string("é"), vec![b'(', 0xE9, b')']);
    assert_eq!(pdf_string("日"), b"(?)".to_vec());
}

#[test]
fn column_widths_cover_every_column() {
    assert_eq!(COLUMN_WIDTHS_MM.len(), COLUMNS.len());
    let total: f64 = COLUMN_WIDTHS_MM.iter().sum();
    assert!(total + 2.0 * MARGIN_MM <= PAGE_WIDTH_MM);
}

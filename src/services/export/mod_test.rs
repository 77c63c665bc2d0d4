use time::macros::{datetime, offset};

use super::*;
use crate::services::test_helpers::stored_attendance;

#[test]
fn filename_uses_display_offset() {
    let now = datetime!(2025-03-14 17:05:09 UTC);
    assert_eq!(filename(ExportFormat::Pdf, now, offset!(+7)).unwrap(), "Daftar_Kehadiran_20250315_000509.pdf");
    assert_eq!(filename(ExportFormat::Xlsx, now, UtcOffset::UTC).unwrap(), "Daftar_Kehadiran_20250314_170509.xlsx");
    assert_eq!(filename(ExportFormat::Doc, now, UtcOffset::UTC).unwrap(), "Daftar_Kehadiran_20250314_170509.doc");
}

#[test]
fn timestamp_is_day_first_to_the_minute() {
    let at = datetime!(2025-01-02 03:04:59 UTC);
    assert_eq!(format_timestamp(at, UtcOffset::UTC).unwrap(), "02/01/2025 03:04");
    assert_eq!(format_timestamp(at, offset!(+7)).unwrap(), "02/01/2025 10:04");
}

#[test]
fn content_types_match_extensions() {
    assert_eq!(ExportFormat::Pdf.content_type(), "application/pdf");
    assert_eq!(ExportFormat::Doc.content_type(), "application/msword");
    assert!(ExportFormat::Xlsx.content_type().contains("spreadsheetml"));
}

#[test]
fn row_cells_numbers_from_one_and_leaves_signature_blank() {
    let record = stored_attendance("Budi", datetime!(2025-01-02 03:04 UTC));
    let cells = row_cells(0, &record, UtcOffset::UTC).unwrap();
    assert_eq!(cells[0], "1");
    assert_eq!(cells[1], "Budi");
    assert_eq!(cells[SIGNATURE_COLUMN], "");
    assert_eq!(cells[8], "02/01/2025 03:04");
    assert_eq!(COLUMNS[SIGNATURE_COLUMN], "TTD");
}

#[test]
fn render_attaches_filename_and_type() {
    let records = vec![stored_attendance("Budi", datetime!(2025-01-02 03:04 UTC))];
    let doc = render(
        ExportFormat::Doc,
        &records,
        &ExportHeading::default(),
        UtcOffset::UTC,
        datetime!(2025-01-02 08:00 UTC),
    )
    .unwrap();
    assert_eq!(doc.filename, "Daftar_Kehadiran_20250102_080000.doc");
    assert_eq!(doc.content_type, "application/msword");
    assert!(String::from_utf8(doc.bytes).unwrap().contains("Budi"));
}

use time::macros::datetime;

use super::*;
use crate::services::test_helpers::stored_attendance;

#[test]
fn document_has_word_namespaces_and_heading() {
    let html = render(&[], &ExportHeading::default(), UtcOffset::UTC).unwrap();
    assert!(html.contains("xmlns:w='urn:schemas-microsoft-com:office:word'"));
    assert!(html.contains("<h2>Daftar Kehadiran Forum Perangkat Daerah Tahun 2025</h2>"));
    assert!(html.contains("<h3>Dinas Pekerjaan Umum Penataan Ruang &amp; Perumahan Rakyat Kawasan Permukiman</h3>"));
    assert!(html.contains("<th>Bidang/Urusan</th>"));
    assert!(!html.contains("<td>"));
}

#[test]
fn rows_carry_number_text_and_signature_image() {
    let record = stored_attendance("Budi", datetime!(2025-01-02 03:04 UTC));
    let html = render(&[record.clone()], &ExportHeading::default(), UtcOffset::UTC).unwrap();

    assert!(html.contains("<td>1</td>"));
    assert!(html.contains("<td>Budi</td>"));
    assert!(html.contains("<td>02/01/2025 03:04</td>"));
    assert!(html.contains(&format!("<img src=\"{}\" class=\"signature-img\"", record.signature.as_str())));
    assert!(html.contains("alt=\"Tanda tangan Budi\""));
}

#[test]
fn missing_signature_is_empty_cell() {
    let mut record = stored_attendance("Budi", datetime!(2025-01-02 03:04 UTC));
    record.signature = signature::artifact::SignatureArtifact::empty();
    let html = render(&[record], &ExportHeading::default(), UtcOffset::UTC).unwrap();
    assert!(html.contains("<td></td>"));
    assert!(!html.contains("<img"));
}

#[test]
fn user_text_is_escaped() {
    let mut record = stored_attendance("<script>alert('x')</script>", datetime!(2025-01-02 03:04 UTC));
    record.institution = "A & B \"Co\"".into();
    let html = render(&[record], &ExportHeading::default(), UtcOffset::UTC).unwrap();

    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    assert!(html.contains("<td>A &amp; B &quot;Co&quot;</td>"));
}

#[test]
fn rows_follow_record_order() {
    let records = vec![
        stored_attendance("Kedua", datetime!(2025-01-02 04:00 UTC)),
        stored_attendance("Pertama", datetime!(2025-01-02 03:00 UTC)),
    ];
    let html = render(&records, &ExportHeading::default(), UtcOffset::UTC).unwrap();
    let second = html.find("Kedua").unwrap();
    let first = html.find("Pertama").unwrap();
    assert!(second < first);
}

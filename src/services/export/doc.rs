//! Word export: an HTML document with the Office namespaces, which Word opens
//! as a `.doc`. Signatures are inlined as `<img>` data URIs.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt::Write;

use time::UtcOffset;

use super::{COLUMNS, ExportError, SIGNATURE_COLUMN, row_cells};
use crate::config::ExportHeading;
use crate::services::attendance::Attendance;

const STYLE: &str = "\
@page { size: Legal; margin: 1cm; }
body { font-family: Arial, sans-serif; font-size: 11pt; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
th { background-color: #f2f2f2; }
.header { text-align: center; margin-bottom: 20px; }
.signature-img { width: auto; max-width: 100px; height: auto; max-height: 50px; display: block; margin: auto; }
";

/// Render the HTML document.
///
/// # Errors
///
/// Returns [`ExportError::Timestamp`] if a creation time cannot be formatted.
pub fn render(records: &[Attendance], heading: &ExportHeading, offset: UtcOffset) -> Result<String, ExportError> {
    let mut html = String::with_capacity(4096 + records.len() * 512);
    html.push_str(
        "<html xmlns:o='urn:schemas-microsoft-com:office:office' \
         xmlns:w='urn:schemas-microsoft-com:office:word' \
         xmlns='http://www.w3.org/TR/REC-html40'>\n",
    );
    html.push_str("<head>\n<meta charset=\"utf-8\">\n<title>Daftar Kehadiran</title>\n<style>\n");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"header\">\n");
    push_fmt(&mut html, format_args!("<h2>{}</h2>", escape(&heading.title)));
    push_fmt(&mut html, format_args!("<h3>{}</h3>", escape(&heading.organization)));
    push_fmt(&mut html, format_args!("<h3>{}</h3>", escape(&heading.region)));
    html.push_str("</div>\n<table>\n<thead>\n<tr>");
    for title in COLUMNS {
        push_fmt(&mut html, format_args!("<th>{}</th>", escape(title)));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for (index, record) in records.iter().enumerate() {
        let cells = row_cells(index, record, offset)?;
        html.push_str("<tr>");
        for (col, text) in cells.iter().enumerate() {
            if col == SIGNATURE_COLUMN {
                signature_cell(&mut html, record);
            } else {
                push_fmt(&mut html, format_args!("<td>{}</td>", escape(text)));
            }
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    Ok(html)
}

fn signature_cell(html: &mut String, record: &Attendance) {
    if record.signature.is_empty() {
        html.push_str("<td></td>");
        return;
    }
    push_fmt(
        html,
        format_args!(
            "<td><img src=\"{}\" class=\"signature-img\" alt=\"Tanda tangan {}\"></td>",
            escape(record.signature.as_str()),
            escape(&record.name)
        ),
    );
}

fn push_fmt(html: &mut String, args: std::fmt::Arguments<'_>) {
    if html.write_fmt(args).is_err() {
        tracing::error!("formatting into a String failed");
    }
}

/// Escape text for HTML element content and double-quoted attributes.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

//! Export renderers for the attendance list.
//!
//! DESIGN
//! ======
//! Each renderer takes the records in list order (newest first) and produces
//! the bytes of one downloadable document. All three share the column set,
//! the `dd/MM/yyyy HH:mm` timestamp format and the download filename, which
//! live here. Timestamps are stored in UTC and shown in the configured display
//! offset.
//!
//! Renderers are synchronous and CPU-bound; the HTTP layer runs them on the
//! blocking pool.

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

pub mod doc;
pub mod pdf;
pub mod xlsx;

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::config::ExportHeading;
use crate::services::attendance::Attendance;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),
    #[error("timestamp format error: {0}")]
    Timestamp(#[from] time::error::Format),
}

impl crate::routes::ErrorCode for ExportError {
    fn error_code(&self) -> &'static str {
        "E_EXPORT"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Pdf,
    Doc,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Pdf => "pdf",
            Self::Doc => "doc",
        }
    }

    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Pdf => "application/pdf",
            Self::Doc => "application/msword",
        }
    }
}

/// A rendered export ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

// =============================================================================
// SHARED LAYOUT
// =============================================================================

pub const FILENAME_PREFIX: &str = "Daftar_Kehadiran";

pub const COLUMNS: [&str; 9] = ["No", "Nama", "NIP", "Jabatan", "Instansi", "Wilayah", "Bidang/Urusan", "TTD", "Tanggal"];

/// Index of the signature column in [`COLUMNS`].
pub const SIGNATURE_COLUMN: usize = 7;

/// `Daftar_Kehadiran_<YYYYMMDD_HHmmss>.<ext>`, stamped in the display offset.
///
/// # Errors
///
/// Returns [`ExportError::Timestamp`] if the timestamp cannot be formatted.
pub fn filename(format: ExportFormat, now: OffsetDateTime, offset: UtcOffset) -> Result<String, ExportError> {
    let stamp = now
        .to_offset(offset)
        .format(format_description!("[year][month][day]_[hour][minute][second]"))?;
    Ok(format!("{FILENAME_PREFIX}_{stamp}.{}", format.extension()))
}

/// Row timestamp as `dd/MM/yyyy HH:mm` in the display offset.
///
/// # Errors
///
/// Returns [`ExportError::Timestamp`] if the timestamp cannot be formatted.
pub fn format_timestamp(at: OffsetDateTime, offset: UtcOffset) -> Result<String, ExportError> {
    Ok(at
        .to_offset(offset)
        .format(format_description!("[day]/[month]/[year] [hour]:[minute]"))?)
}

/// Text of every column for one record. The signature column is left empty;
/// each renderer fills it in its own way.
///
/// # Errors
///
/// Returns [`ExportError::Timestamp`] if the creation time cannot be formatted.
pub fn row_cells(index: usize, record: &Attendance, offset: UtcOffset) -> Result<[String; 9], ExportError> {
    Ok([
        (index + 1).to_string(),
        record.name.clone(),
        record.nip.clone(),
        record.position.clone(),
        record.institution.clone(),
        record.region.clone(),
        record.department.clone(),
        String::new(),
        format_timestamp(record.created_at, offset)?,
    ])
}

/// Render `records` in `format`.
///
/// # Errors
///
/// Propagates the renderer's [`ExportError`].
pub fn render(
    format: ExportFormat,
    records: &[Attendance],
    heading: &ExportHeading,
    offset: UtcOffset,
    now: OffsetDateTime,
) -> Result<ExportDocument, ExportError> {
    let bytes = match format {
        ExportFormat::Xlsx => xlsx::render(records, offset)?,
        ExportFormat::Pdf => pdf::render(records, heading, offset)?,
        ExportFormat::Doc => doc::render(records, heading, offset)?.into_bytes(),
    };
    Ok(ExportDocument { filename: filename(format, now, offset)?, content_type: format.content_type(), bytes })
}

//! Spreadsheet export.
//!
//! Signatures are not embedded; the TTD column carries a placeholder so the
//! sheet stays a plain data table.

#[cfg(test)]
#[path = "xlsx_test.rs"]
mod xlsx_test;

use rust_xlsxwriter::{Format, Workbook};
use time::UtcOffset;

use super::{COLUMNS, ExportError, SIGNATURE_COLUMN, row_cells};
use crate::services::attendance::Attendance;

pub const SHEET_NAME: &str = "Daftar Kehadiran";
pub const SIGNATURE_PLACEHOLDER: &str = "[Tanda Tangan]";

/// Column widths in characters, in [`COLUMNS`] order.
pub const COLUMN_WIDTHS: [f64; 9] = [5.0, 25.0, 20.0, 25.0, 25.0, 25.0, 25.0, 15.0, 20.0];

/// Render the workbook and return its `.xlsx` bytes.
///
/// # Errors
///
/// Returns [`ExportError`] if a cell cannot be written or the workbook cannot
/// be serialized.
#[allow(clippy::cast_possible_truncation)]
pub fn render(records: &[Attendance], offset: UtcOffset) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (col, (title, width)) in COLUMNS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, &header)?;
        sheet.set_column_width(col, width)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        let mut cells = row_cells(index, record, offset)?;
        cells[SIGNATURE_COLUMN] = SIGNATURE_PLACEHOLDER.to_owned();

        sheet.write_number(row, 0, row)?;
        for (col, text) in cells.into_iter().enumerate().skip(1) {
            sheet.write_string(row, col as u16, text)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

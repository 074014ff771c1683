#![forbid(unsafe_code)]

use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};

use crate::{ExportDocument, ExportError};

/// Excel caps sheet names at 31 chars and forbids a few punctuation marks.
fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() { "Sheet1".to_string() } else { cleaned }
}

pub(crate) fn render(doc: &ExportDocument) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let title_format = Format::new().set_bold().set_font_size(14.0);
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));
    let cell_format = Format::new().set_border(FormatBorder::Hair).set_border_color(Color::RGB(0xCCCCCC));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(&doc.title))?;
    worksheet.write_string_with_format(0, 0, doc.title.as_str(), &title_format)?;

    // Title on row 0, blank row, header on row 2, body from row 3.
    let header_row: u32 = 2;
    for (c, h) in doc.headers.iter().enumerate() {
        let col = u16::try_from(c).map_err(|_| ExportError::Ragged { row: 0, got: c, expected: u16::MAX as usize })?;
        let widest = doc.rows.iter().filter_map(|r| r.get(c)).map(|s| s.chars().count()).max().unwrap_or(0);
        let width = widest.max(h.chars().count()).clamp(8, 60) as f64 + 2.0;
        worksheet.set_column_width(col, width)?;
        worksheet.write_string_with_format(header_row, col, h.as_str(), &header_format)?;
    }
    for (r, row) in doc.rows.iter().enumerate() {
        let row_num = header_row + 1 + r as u32;
        for (c, cell) in row.iter().enumerate() {
            worksheet.write_string_with_format(row_num, c as u16, cell.as_str(), &cell_format)?;
        }
    }
    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_name_is_sanitised() {
        assert_eq!(sheet_name("Stock [A/B]: yard"), "Stock AB yard");
        assert_eq!(sheet_name("???"), "Sheet1");
        assert_eq!(sheet_name(&"x".repeat(40)).len(), 31);
    }
}

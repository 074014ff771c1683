//! Plain tabular PDF: landscape A4, built-in Helvetica, one text line per row.

#![forbid(unsafe_code)]

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::{ExportDocument, ExportError};

const PAGE_W_MM: f32 = 297.0;
const PAGE_H_MM: f32 = 210.0;
const MARGIN_MM: f32 = 12.0;
const LINE_MM: f32 = 6.0;
const TITLE_PT: f32 = 14.0;
const BODY_PT: f32 = 9.0;
/// Rough Helvetica advance at 9pt, used to truncate cells to their column.
const CHAR_MM: f32 = 1.8;

fn pdf_err<E: std::fmt::Debug>(e: E) -> ExportError { ExportError::Pdf(format!("{:?}", e)) }

fn fit(text: &str, width_mm: f32) -> String {
    let max = ((width_mm / CHAR_MM).floor() as usize).max(1);
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut s: String = text.chars().take(max.saturating_sub(1)).collect();
    s.push('~');
    s
}

/// Rows that fit on one page below the header line.
fn rows_per_page(first: bool) -> usize {
    let top = if first { MARGIN_MM + 2.0 * LINE_MM } else { MARGIN_MM };
    ((PAGE_H_MM - top - 2.0 * MARGIN_MM) / LINE_MM).floor().max(1.0) as usize
}

pub(crate) fn render(doc: &ExportDocument) -> Result<Vec<u8>, ExportError> {
    let (pdf, page1, layer1) = PdfDocument::new(doc.title.as_str(), Mm(PAGE_W_MM), Mm(PAGE_H_MM), "Layer 1");
    let font = pdf.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
    let bold = pdf.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;
    let col_w = (PAGE_W_MM - 2.0 * MARGIN_MM) / doc.headers.len() as f32;

    let mut layer = pdf.get_page(page1).get_layer(layer1);
    let mut y = PAGE_H_MM - MARGIN_MM;
    layer.use_text(doc.title.as_str(), TITLE_PT, Mm(MARGIN_MM), Mm(y), &bold);
    y -= 2.0 * LINE_MM;

    let mut remaining = doc.rows.as_slice();
    let mut first = true;
    while !remaining.is_empty() {
        if !first {
            let (p, l) = pdf.add_page(Mm(PAGE_W_MM), Mm(PAGE_H_MM), "Layer 1");
            layer = pdf.get_page(p).get_layer(l);
            y = PAGE_H_MM - MARGIN_MM;
        }
        for (c, h) in doc.headers.iter().enumerate() {
            layer.use_text(fit(h, col_w), BODY_PT, Mm(MARGIN_MM + c as f32 * col_w), Mm(y), &bold);
        }
        y -= LINE_MM;
        let take = rows_per_page(first).min(remaining.len());
        for row in &remaining[..take] {
            for (c, cell) in row.iter().enumerate() {
                layer.use_text(fit(cell, col_w), BODY_PT, Mm(MARGIN_MM + c as f32 * col_w), Mm(y), &font);
            }
            y -= LINE_MM;
        }
        remaining = &remaining[take..];
        first = false;
    }
    pdf.save_to_bytes().map_err(pdf_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_cells_are_truncated() {
        assert_eq!(fit("abc", 100.0), "abc");
        let out = fit(&"x".repeat(100), 18.0);
        assert_eq!(out.chars().count(), 10);
        assert!(out.ends_with('~'));
    }

    #[test]
    fn many_rows_span_pages() {
        let rows: Vec<Vec<String>> = (0..200).map(|i| vec![i.to_string()]).collect();
        let doc = ExportDocument {
            title: "Elements".into(),
            headers: vec!["ID".into()],
            rows,
            filename: "e.pdf".into(),
            success_message: String::new(),
        };
        let bytes = render(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(rows_per_page(true) < 200);
    }
}

#![forbid(unsafe_code)]

use crate::{ExportDocument, ExportError};

pub(crate) fn render(doc: &ExportDocument) -> Result<Vec<u8>, ExportError> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(&doc.headers)?;
    for row in &doc.rows {
        w.write_record(row)?;
    }
    w.into_inner()
        .map_err(|e| ExportError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_cells_with_delimiters() {
        let doc = ExportDocument {
            title: "Log".into(),
            headers: vec!["ID".into(), "Comments".into()],
            rows: vec![vec!["7".into(), "crack, north face".into()], vec!["8".into(), "said \"ok\"".into()]],
            filename: "log.csv".into(),
            success_message: String::new(),
        };
        let out = String::from_utf8(render(&doc).unwrap()).unwrap();
        assert_eq!(out, "ID,Comments\n7,\"crack, north face\"\n8,\"said \"\"ok\"\"\"\n");
    }
}

//! Export collaborator: turns a titled table of strings into a file.
//!
//! Callers hand over already-mapped rows; this crate knows nothing about
//! screens or selection.

#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::time::Instant;

pub use chrono::NaiveDate;
use metrics::histogram;
use serde::{Deserialize, Serialize};
use tracing::info;

mod delimited;
mod pdf;
mod sheet;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Excel,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,
    #[error("row {row} has {got} cells, expected {expected}")]
    Ragged { row: usize, got: usize, expected: usize },
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("excel: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
    #[error("pdf: {0}")]
    Pdf(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// A titled table ready for export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportDocument {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub filename: String,
    pub success_message: String,
}

impl ExportDocument {
    pub fn new(title: &str, headers: Vec<String>, rows: Vec<Vec<String>>, format: ExportFormat, date: NaiveDate) -> Self {
        Self {
            title: title.to_string(),
            headers,
            rows,
            filename: export_filename(title, format, date),
            success_message: format!("{} exported successfully.", title),
        }
    }

    fn check(&self) -> Result<(), ExportError> {
        if self.headers.is_empty() || self.rows.is_empty() {
            return Err(ExportError::Empty);
        }
        for (i, r) in self.rows.iter().enumerate() {
            if r.len() != self.headers.len() {
                return Err(ExportError::Ragged { row: i, got: r.len(), expected: self.headers.len() });
            }
        }
        Ok(())
    }
}

/// `<title-slug>_<YYYY-MM-DD>.<ext>`
pub fn export_filename(title: &str, format: ExportFormat, date: NaiveDate) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    let slug = if slug.is_empty() { "export" } else { slug };
    format!("{}_{}.{}", slug, date.format("%Y-%m-%d"), format.extension())
}

pub fn today() -> NaiveDate { chrono::Local::now().date_naive() }

/// Render a document to bytes in the given format.
pub fn render(doc: &ExportDocument, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    doc.check()?;
    match format {
        ExportFormat::Csv => delimited::render(doc),
        ExportFormat::Excel => sheet::render(doc),
        ExportFormat::Pdf => pdf::render(doc),
    }
}

pub trait Exporter: Send + Sync {
    /// Produce the file and return where it landed.
    fn export(&self, doc: &ExportDocument, format: ExportFormat) -> Result<PathBuf, ExportError>;
}

/// Writes exports into a directory (the "download" location).
#[derive(Debug, Clone)]
pub struct FileExporter {
    dir: PathBuf,
}

impl FileExporter {
    pub fn new(dir: impl AsRef<Path>) -> Self { Self { dir: dir.as_ref().to_path_buf() } }
}

impl Exporter for FileExporter {
    fn export(&self, doc: &ExportDocument, format: ExportFormat) -> Result<PathBuf, ExportError> {
        let t0 = Instant::now();
        let bytes = render(doc, format)?;
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&doc.filename);
        std::fs::write(&path, &bytes)?;
        histogram!("export_ms", t0.elapsed().as_secs_f64() * 1000.0, "format" => format.extension());
        info!(path = %path.display(), rows = doc.rows.len(), bytes = bytes.len(), took_ms = %t0.elapsed().as_millis(), "export: written");
        Ok(path)
    }
}

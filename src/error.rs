use std::path::PathBuf;

use thiserror::Error;

/// Failure to read the measurement source. Always fatal.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("unreadable Arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("unexpected column layout: {0}")]
    Layout(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

/// Failure to write the spreadsheet report. Always fatal.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write spreadsheet {}: {source}", .path.display())]
    Xlsx {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

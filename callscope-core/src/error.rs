//! Error types for callscope-core

use thiserror::Error;

/// Main error type for the callscope-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Backend/API error (failed fetch, bad status, unreachable server)
    #[error("backend error: {0}")]
    Backend(String),

    /// Spreadsheet writer error
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Export requested on an empty table; no file is written
    #[error("nothing to export: {0}")]
    EmptyExport(String),

    /// Feature that is not wired to a real data source yet
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

/// Result type alias for callscope-core
pub type Result<T> = std::result::Result<T, Error>;

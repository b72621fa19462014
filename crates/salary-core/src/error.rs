use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the salary engine and its collaborators.
///
/// Malformed salary text is never an error: it produces a record with an
/// explicit parse status instead. These variants cover file access, dataset
/// selection and configuration mistakes.
#[derive(Error, Debug)]
pub enum SalaryError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A dataset filter combination is not allowed.
    #[error("Invalid dataset filter: {0}")]
    InvalidFilter(String),

    /// A date string did not match `YYYY-MM-DD`.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The listings directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// A grouping key name is not one of the recognised keys.
    #[error("Unknown group key: {0}")]
    UnknownGroupKey(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the salary crates.
pub type Result<T> = std::result::Result<T, SalaryError>;

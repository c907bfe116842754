//! Error types for payload loading and CSV stores.

use std::path::PathBuf;

use thiserror::Error;

use datastd_model::{ConfigError, StoreError};

/// Errors raised while loading payloads or touching CSV files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Failed to create a directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Errors ===
    /// Polars could not parse the CSV file.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Polars could not serialize the frame as CSV.
    #[error("failed to write CSV {path}: {message}")]
    CsvWrite { path: PathBuf, message: String },

    // === Payload Errors ===
    /// The mapping payload is malformed.
    #[error(transparent)]
    Payload(#[from] ConfigError),
}

impl IngestError {
    /// Convert into the store error reported for `relation`.
    pub fn into_store_error(self, relation: &str) -> StoreError {
        match self {
            Self::CsvParse { message, .. } => StoreError::Read {
                relation: relation.to_string(),
                message,
            },
            Self::CsvWrite { message, .. } => StoreError::Write {
                relation: relation.to_string(),
                message,
            },
            Self::FileRead { path, source }
            | Self::FileWrite { path, source }
            | Self::DirectoryCreate { path, source } => StoreError::Io { path, source },
            Self::Payload(error) => StoreError::Read {
                relation: relation.to_string(),
                message: error.to_string(),
            },
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

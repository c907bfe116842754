//! Error types for standardization runs.
//!
//! Errors fall into two families: [`ConfigError`] for problems with the
//! mapping payload or run settings, and [`StoreError`] for failures reported
//! by the stores that relations are read from and written to. Both are fatal
//! to a run and are wrapped by [`StandardizeError`].

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// A mapping configuration that cannot be executed as written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Neither the entry nor the run defaults name a target schema and table.
    #[error("missing target schema or target table")]
    MissingTarget,

    /// A relational rule list does not declare exactly one key pair.
    #[error(
        "relational mapping requires exactly one source_key and one target_key \
         (found source keys [{}], target keys [{}])",
        .source_keys.join(", "),
        .target_keys.join(", ")
    )]
    AmbiguousJoinKeys {
        source_keys: Vec<String>,
        target_keys: Vec<String>,
    },

    /// The join key could not be mapped and the source lacks the source key.
    #[error("source key '{source_key}' not found in {source_table}")]
    MissingSourceKey {
        source_key: String,
        source_table: String,
    },

    /// A frame handed to the merger lacks the join key column.
    #[error("join key '{join_key}' missing in mapped frame {position}")]
    MissingJoinKey { join_key: String, position: usize },

    /// Relational and non-relational entries target the same table.
    #[error("mixed relational and non-relational mappings for target {target}")]
    MixedRelationalModes { target: String },

    /// Relational entries for one target declare different target keys.
    #[error(
        "relational mappings for target {target} must share one target_key \
         (expected '{expected}', found '{found}')"
    )]
    MismatchedJoinKeys {
        target: String,
        expected: String,
        found: String,
    },

    /// The `relational` option holds something other than a boolean flag.
    #[error("invalid relational flag '{value}' (expected True or False)")]
    InvalidRelationalFlag { value: String },

    /// The payload is not a valid mapping document.
    #[error("invalid mapping payload: {message}")]
    InvalidPayload { message: String },

    /// Another configuration error, tagged with the entry or target it came from.
    #[error("{scope}: {source}")]
    Scoped {
        scope: String,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Attach the configuration entry this error was raised for.
    #[must_use]
    pub fn for_entry(self, entry: &str) -> Self {
        Self::Scoped {
            scope: format!("entry '{entry}'"),
            source: Box::new(self),
        }
    }

    /// Attach the target table this error was raised for.
    #[must_use]
    pub fn for_target(self, target: &str) -> Self {
        Self::Scoped {
            scope: format!("target {target}"),
            source: Box::new(self),
        }
    }

    /// The error with any scope tags removed.
    pub fn root(&self) -> &ConfigError {
        match self {
            Self::Scoped { source, .. } => source.root(),
            other => other,
        }
    }
}

/// A failure reported by a relation store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("relation {relation} not found")]
    NotFound { relation: String },

    #[error("failed to read relation {relation}: {message}")]
    Read { relation: String, message: String },

    #[error("failed to write relation {relation}: {message}")]
    Write { relation: String, message: String },

    #[error("connection to {store} failed: {message}")]
    Connection { store: String, message: String },

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any error that aborts a standardization run.
#[derive(Debug, Error)]
pub enum StandardizeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("frame operation failed: {0}")]
    Frame(#[from] PolarsError),
}

impl StandardizeError {
    /// The configuration error behind this failure, if any.
    pub fn config(&self) -> Option<&ConfigError> {
        match self {
            Self::Config(error) => Some(error.root()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StandardizeError>;

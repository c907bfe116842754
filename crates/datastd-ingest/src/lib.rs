//! Loading for datastd: mapping payloads and CSV-backed relation stores.
//!
//! # Features
//!
//! - **Payloads**: Parse mapping documents from strings or files, keeping
//!   entry order
//! - **CSV catalog**: Treat a directory of CSV files as a relation store,
//!   one subdirectory per schema
//!
//! # Example
//!
//! ```ignore
//! use datastd_core::Standardizer;
//! use datastd_ingest::{CsvConnector, load_mapping_payload};
//!
//! let payload = load_mapping_payload("mapping.json".as_ref())?;
//! let report = Standardizer::default().run_with_connectors(
//!     &payload,
//!     &CsvConnector::source("data/raw"),
//!     &CsvConnector::target("data/std"),
//! )?;
//! ```

mod catalog;
mod connector;
mod error;
mod payload;

// === Error Types ===
pub use error::{IngestError, Result};

// === Payloads ===
pub use payload::{load_mapping_payload, parse_mapping_payload};

// === CSV Stores ===
pub use catalog::{CSV_EXTENSION, CsvCatalog};
pub use connector::CsvConnector;

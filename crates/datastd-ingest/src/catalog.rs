//! Directory-backed relation store.
//!
//! A catalog root holds one CSV file per relation. Relations without a
//! schema live directly under the root, schema-qualified relations in a
//! subdirectory named after the schema:
//!
//! ```text
//! <root>/patients.csv        patients
//! <root>/std/person.csv      std.person
//! ```

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter};
use tracing::debug;

use datastd_core::{RelationReader, RelationWriter, WriteMode};
use datastd_model::{StoreError, qualified_name};

use crate::error::{IngestError, Result};

/// File extension of relation files.
pub const CSV_EXTENSION: &str = "csv";

/// Rows sampled when inferring column types.
const INFER_SCHEMA_ROWS: usize = 100;

/// A directory of CSV files used as a relation store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvCatalog {
    root: PathBuf,
}

impl CsvCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding `table`, optionally inside `schema`.
    pub fn relation_path(&self, schema: Option<&str>, table: &str) -> PathBuf {
        let file = format!("{table}.{CSV_EXTENSION}");
        match schema {
            Some(schema) if !schema.is_empty() => self.root.join(schema).join(file),
            _ => self.root.join(file),
        }
    }

    /// Read one CSV file into a frame.
    pub fn read_csv(path: &Path) -> Result<DataFrame> {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| IngestError::CsvParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .finish()
            .map_err(|e| IngestError::CsvParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    /// Write `frame` to `path`, replacing the file and creating parent
    /// directories as needed.
    pub fn write_csv(path: &Path, frame: &DataFrame) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| IngestError::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let mut file = File::create(path).map_err(|source| IngestError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
        let mut frame = frame.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut frame)
            .map_err(|e| IngestError::CsvWrite {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

impl RelationReader for CsvCatalog {
    fn read_relation(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> std::result::Result<DataFrame, StoreError> {
        let relation = qualified_name(schema, table);
        let path = self.relation_path(schema, table);
        if !path.is_file() {
            return Err(StoreError::NotFound { relation });
        }
        let frame = Self::read_csv(&path).map_err(|error| error.into_store_error(&relation))?;
        debug!(
            relation = %relation,
            path = %path.display(),
            rows = frame.height(),
            columns = frame.width(),
            "read relation"
        );
        Ok(frame)
    }
}

impl RelationWriter for CsvCatalog {
    fn write_relation(
        &self,
        frame: &DataFrame,
        table: &str,
        schema: &str,
        mode: WriteMode,
    ) -> std::result::Result<(), StoreError> {
        let relation = qualified_name(Some(schema), table);
        let path = self.relation_path(Some(schema), table);
        let written = match mode {
            WriteMode::Replace => Self::write_csv(&path, frame),
        };
        written.map_err(|error| error.into_store_error(&relation))?;
        debug!(
            relation = %relation,
            path = %path.display(),
            rows = frame.height(),
            "wrote relation"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_paths() {
        let catalog = CsvCatalog::new("/data");
        assert_eq!(
            catalog.relation_path(None, "patients"),
            PathBuf::from("/data/patients.csv")
        );
        assert_eq!(
            catalog.relation_path(Some("std"), "person"),
            PathBuf::from("/data/std/person.csv")
        );
        assert_eq!(
            catalog.relation_path(Some(""), "person"),
            PathBuf::from("/data/person.csv")
        );
    }
}

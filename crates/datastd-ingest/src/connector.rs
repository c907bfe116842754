//! Connections to CSV catalogs.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use datastd_core::Connector;
use datastd_model::StoreError;

use crate::catalog::CsvCatalog;

/// Hands out [`CsvCatalog`] connections rooted at one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvConnector {
    root: PathBuf,
    create: bool,
}

impl CsvConnector {
    /// Connector for reading; the root directory must already exist.
    pub fn source(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            create: false,
        }
    }

    /// Connector for writing; the root directory is created if missing.
    pub fn target(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            create: true,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Connector for CsvConnector {
    type Connection = CsvCatalog;

    fn acquire(&self) -> Result<Self::Connection, StoreError> {
        if self.create {
            fs::create_dir_all(&self.root).map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;
        } else if !self.root.is_dir() {
            return Err(StoreError::Connection {
                store: self.describe(),
                message: "directory not found".to_string(),
            });
        }
        debug!(store = %self.describe(), "opened catalog");
        Ok(CsvCatalog::new(&self.root))
    }

    fn dispose(&self, connection: Self::Connection) -> Result<(), StoreError> {
        debug!(store = %connection.root().display(), "closed catalog");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.root.display())
    }
}

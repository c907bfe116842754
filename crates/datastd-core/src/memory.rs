//! In-memory relation store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use polars::prelude::DataFrame;
use tracing::debug;

use datastd_model::{StoreError, qualified_name};

use crate::store::{Connector, RelationReader, RelationWriter, WriteMode};

#[derive(Debug, Default)]
struct Shared {
    tables: RwLock<BTreeMap<String, DataFrame>>,
    open_connections: AtomicUsize,
}

/// A store that keeps relations in memory, keyed by qualified name.
///
/// Clones share the same tables, so a clone handed out as a connection sees
/// every write made through any other handle.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::insert`].
    #[must_use]
    pub fn with_table(self, schema: Option<&str>, table: &str, frame: DataFrame) -> Self {
        self.insert(schema, table, frame);
        self
    }

    /// Store `frame` under `schema.table`, replacing any existing relation.
    pub fn insert(&self, schema: Option<&str>, table: &str, frame: DataFrame) {
        let mut tables = match self.shared.tables.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        tables.insert(qualified_name(schema, table), frame);
    }

    /// A copy of the relation stored under `schema.table`.
    pub fn table(&self, schema: Option<&str>, table: &str) -> Option<DataFrame> {
        let tables = match self.shared.tables.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        tables.get(&qualified_name(schema, table)).cloned()
    }

    /// Qualified names of all stored relations, sorted.
    pub fn relation_names(&self) -> Vec<String> {
        let tables = match self.shared.tables.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        tables.keys().cloned().collect()
    }

    /// Connections acquired and not yet disposed.
    pub fn open_connections(&self) -> usize {
        self.shared.open_connections.load(Ordering::Acquire)
    }
}

impl RelationReader for MemoryStore {
    fn read_relation(&self, table: &str, schema: Option<&str>) -> Result<DataFrame, StoreError> {
        self.table(schema, table).ok_or_else(|| StoreError::NotFound {
            relation: qualified_name(schema, table),
        })
    }
}

impl RelationWriter for MemoryStore {
    fn write_relation(
        &self,
        frame: &DataFrame,
        table: &str,
        schema: &str,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        match mode {
            WriteMode::Replace => self.insert(Some(schema), table, frame.clone()),
        }
        debug!(
            relation = %qualified_name(Some(schema), table),
            rows = frame.height(),
            columns = frame.width(),
            "stored relation in memory"
        );
        Ok(())
    }
}

impl Connector for MemoryStore {
    type Connection = MemoryStore;

    fn acquire(&self) -> Result<Self::Connection, StoreError> {
        self.shared.open_connections.fetch_add(1, Ordering::AcqRel);
        Ok(self.clone())
    }

    fn dispose(&self, connection: Self::Connection) -> Result<(), StoreError> {
        if !Arc::ptr_eq(&self.shared, &connection.shared) {
            return Err(StoreError::Connection {
                store: self.describe(),
                message: "connection belongs to another store".to_string(),
            });
        }
        self.shared.open_connections.fetch_sub(1, Ordering::AcqRel);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

//! Relation store abstractions.
//!
//! A standardization run needs three things from the outside world:
//!
//! - [`RelationReader`]: loads a source relation into a frame
//! - [`RelationWriter`]: stores a finished target table
//! - [`Connector`]: hands out connections for a run and takes them back
//!
//! Implementations live next to the storage they wrap; [`MemoryStore`]
//! implements all three.
//!
//! [`MemoryStore`]: crate::MemoryStore

use polars::prelude::DataFrame;

use datastd_model::StoreError;

/// How a write treats an existing relation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Drop any existing relation and store the frame in its place.
    #[default]
    Replace,
}

/// Read relations from a source store.
pub trait RelationReader {
    /// Load `table`, optionally from `schema`.
    ///
    /// Fails with [`StoreError::NotFound`] when the relation does not exist.
    fn read_relation(&self, table: &str, schema: Option<&str>) -> Result<DataFrame, StoreError>;
}

/// Write relations to a target store.
pub trait RelationWriter {
    /// Store `frame` as `schema.table`.
    fn write_relation(
        &self,
        frame: &DataFrame,
        table: &str,
        schema: &str,
        mode: WriteMode,
    ) -> Result<(), StoreError>;
}

impl<T: RelationReader + ?Sized> RelationReader for &T {
    fn read_relation(&self, table: &str, schema: Option<&str>) -> Result<DataFrame, StoreError> {
        (**self).read_relation(table, schema)
    }
}

impl<T: RelationWriter + ?Sized> RelationWriter for &T {
    fn write_relation(
        &self,
        frame: &DataFrame,
        table: &str,
        schema: &str,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        (**self).write_relation(frame, table, schema, mode)
    }
}

/// Source of store connections for one run.
///
/// Every connection returned by [`Connector::acquire`] is handed back to
/// [`Connector::dispose`] exactly once, whether or not the run succeeded.
pub trait Connector {
    type Connection;

    /// Open a connection.
    fn acquire(&self) -> Result<Self::Connection, StoreError>;

    /// Release a connection.
    fn dispose(&self, connection: Self::Connection) -> Result<(), StoreError>;

    /// Name used in logs.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

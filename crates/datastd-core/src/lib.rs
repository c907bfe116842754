//! Standardization runs for datastd.
//!
//! A run walks a [`MappingPayload`](datastd_model::MappingPayload) entry by
//! entry, reads each source relation, maps it, groups the results per target
//! table and writes every target once. The stores on either side are reached
//! through the traits in [`store`].

pub mod memory;
pub mod pipeline;
pub mod source;
pub mod store;

pub use memory::MemoryStore;
pub use pipeline::{EntryCheck, StandardizeOptions, StandardizePlan, Standardizer};
pub use source::source_table_name;
pub use store::{Connector, RelationReader, RelationWriter, WriteMode};

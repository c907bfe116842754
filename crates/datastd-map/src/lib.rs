//! Column mapping for datastd.
//!
//! [`map_columns`] applies one entry's rule list to a source frame and
//! [`extract_join_keys`] resolves the key pair a relational entry joins on.

#![deny(unsafe_code)]

pub mod keys;
pub mod mapper;

pub use keys::{JoinKeys, attach_join_key, extract_join_keys};
pub use mapper::{ColumnMapping, map_columns};

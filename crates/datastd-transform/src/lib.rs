//! Combining mapped frames into target tables.
//!
//! Mapped frames are grouped per target table ([`TargetBatches`]) and each
//! batch is consolidated once: relational batches are outer-joined on their
//! key with [`merge_frames_on_key`], independent batches are stacked with
//! [`stack_frames`].

pub mod batch;
pub mod concat;
pub mod frame;
pub mod merge;

pub use batch::{TargetBatch, TargetBatches};
pub use concat::stack_frames;
pub use frame::MappedFrame;
pub use merge::merge_frames_on_key;

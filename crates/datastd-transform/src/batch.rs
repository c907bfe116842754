//! Per-target accumulation of mapped frames.

use polars::prelude::DataFrame;

use datastd_model::{ConfigError, Result, StandardizeError, TargetRef};

use crate::concat::stack_frames;
use crate::frame::MappedFrame;
use crate::merge::merge_frames_on_key;

/// Mapped frames destined for one target table.
///
/// The first frame staged fixes the batch's join key (or its absence); every
/// later frame must agree with it.
#[derive(Debug, Clone)]
pub struct TargetBatch {
    pub target: TargetRef,
    pub join_key: Option<String>,
    pub frames: Vec<MappedFrame>,
}

impl TargetBatch {
    pub fn new(target: TargetRef, join_key: Option<String>) -> Self {
        Self {
            target,
            join_key,
            frames: Vec::new(),
        }
    }

    pub fn is_relational(&self) -> bool {
        self.join_key.is_some()
    }

    /// Check that a frame with `join_key` may join this batch.
    pub fn check_join_key(&self, join_key: Option<&str>) -> std::result::Result<(), ConfigError> {
        match (self.join_key.as_deref(), join_key) {
            (Some(_), None) | (None, Some(_)) => Err(ConfigError::MixedRelationalModes {
                target: self.target.key(),
            }),
            (Some(expected), Some(found)) if expected != found => {
                Err(ConfigError::MismatchedJoinKeys {
                    target: self.target.key(),
                    expected: expected.to_string(),
                    found: found.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Combine the staged frames into the table to write.
    pub fn consolidate(&self) -> Result<DataFrame> {
        let combined = match &self.join_key {
            Some(join_key) => {
                merge_frames_on_key(self.frames.iter().map(|frame| &frame.data), join_key)
            }
            None => stack_frames(&self.frames),
        };
        combined.map_err(|error| match error {
            StandardizeError::Config(config) => {
                config.for_target(&self.target.key()).into()
            }
            other => other,
        })
    }
}

/// Target batches in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct TargetBatches {
    batches: Vec<TargetBatch>,
}

impl TargetBatches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `frame` to the batch for `target`, creating the batch on first use.
    pub fn stage(
        &mut self,
        target: &TargetRef,
        join_key: Option<&str>,
        frame: MappedFrame,
    ) -> std::result::Result<(), ConfigError> {
        let key = target.key();
        let idx = match self
            .batches
            .iter()
            .position(|batch| batch.target.key() == key)
        {
            Some(idx) => idx,
            None => {
                self.batches
                    .push(TargetBatch::new(target.clone(), join_key.map(str::to_string)));
                self.batches.len() - 1
            }
        };
        let batch = &mut self.batches[idx];
        batch.check_join_key(join_key)?;
        batch.frames.push(frame);
        Ok(())
    }

    pub fn get(&self, target: &TargetRef) -> Option<&TargetBatch> {
        let key = target.key();
        self.batches.iter().find(|batch| batch.target.key() == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetBatch> {
        self.batches.iter()
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

impl IntoIterator for TargetBatches {
    type Item = TargetBatch;
    type IntoIter = std::vec::IntoIter<TargetBatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.batches.into_iter()
    }
}

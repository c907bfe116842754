//! CLI library components for datastd.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;

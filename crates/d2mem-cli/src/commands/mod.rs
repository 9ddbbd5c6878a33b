//! CLI command implementations.

pub mod anchors;
pub mod config;
pub mod watch;

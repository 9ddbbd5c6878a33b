//! # d2mem-core
//!
//! Core library for reading live player state out of a running Diablo II:
//! Resurrected client.
//!
//! This crate provides:
//! - Windows process discovery and memory reading
//! - Anchor address resolution via signature scanning
//! - Player lookup in the unit hash table
//! - Game server endpoint lookup from the TCP table
//! - `StateTracker`, which polls all of the above into `GameState` snapshots

pub mod config;
pub mod error;
pub mod game;
pub mod memory;
pub mod network;
pub mod offset;
pub mod session;
pub mod tracker;
pub mod unit;

pub use config::TargetConfig;
pub use error::{Error, Result};
pub use game::{Area, GameState, StatId, StatValue, decode_fixed_point};
pub use memory::{
    ProcessHandle, ProcessInfo, ProcessProvider, ReadMemory, Record, SystemProcessProvider,
    WindowHandle,
};
pub use network::{
    ConnectionTable, NetworkEndpoint, SystemConnectionTable, TcpConnection, TcpState,
    resolve_endpoint,
};
pub use offset::{AnchorAddresses, AnchorSignatures, CodeSignature, builtin_signatures, resolve_anchors};
pub use session::{Session, SessionState};
pub use tracker::StateTracker;
pub use unit::{PlayerUnit, UnitTableConfig, find_active_player};

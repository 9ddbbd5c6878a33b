//! Attachment to one instance of the target process.

use serde::Serialize;
use strum::Display;
use tracing::{debug, info};

use crate::error::Result;
use crate::memory::{ProcessInfo, ReadMemory, WindowHandle};
use crate::network::NetworkEndpoint;
use crate::offset::{AnchorAddresses, AnchorSignatures, resolve_anchors};
use crate::unit::{PlayerUnit, UnitRecord, UnitTableConfig, find_active_player};

/// Where the tracker stands with respect to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum SessionState {
    /// No process attached
    Detached,
    /// Process open, player not resolved yet
    Attached,
    /// Process open and the local player unit is cached
    PlayerResolved,
}

/// An open target process and everything cached about it.
///
/// Anchors, the player unit and the endpoint belong to this process only and
/// are dropped together with the session.
#[derive(Debug)]
pub struct Session<H> {
    info: ProcessInfo,
    handle: H,
    anchors: Option<AnchorAddresses>,
    player: Option<PlayerUnit>,
    endpoint: Option<NetworkEndpoint>,
}

impl<H: ReadMemory> Session<H> {
    pub fn new(info: ProcessInfo, handle: H) -> Self {
        Self {
            info,
            handle,
            anchors: None,
            player: None,
            endpoint: None,
        }
    }

    pub fn info(&self) -> &ProcessInfo {
        &self.info
    }

    pub fn pid(&self) -> u32 {
        self.info.pid
    }

    pub fn window_handle(&self) -> WindowHandle {
        self.info.window_handle
    }

    pub fn reader(&self) -> &H {
        &self.handle
    }

    pub fn anchors(&self) -> Option<AnchorAddresses> {
        self.anchors
    }

    pub fn player(&self) -> Option<&PlayerUnit> {
        self.player.as_ref()
    }

    pub fn endpoint(&self) -> Option<NetworkEndpoint> {
        self.endpoint
    }

    pub fn set_endpoint(&mut self, endpoint: NetworkEndpoint) {
        self.endpoint = Some(endpoint);
    }

    pub fn state(&self) -> SessionState {
        if self.player.is_some() {
            SessionState::PlayerResolved
        } else {
            SessionState::Attached
        }
    }

    /// Whether `live` is still the process this session was opened on.
    ///
    /// Only the PID and the cached window handle count: the visible window
    /// reported for the same PID may come and go.
    pub fn is_same_process(&self, live: &ProcessInfo) -> bool {
        !self.info.window_handle.is_null() && live.pid == self.info.pid
    }

    /// Resolve the anchor addresses once per session.
    pub fn ensure_anchors(&mut self, signatures: &AnchorSignatures) -> Result<AnchorAddresses> {
        if let Some(anchors) = self.anchors {
            return Ok(anchors);
        }
        let anchors = resolve_anchors(&self.handle, signatures)?;
        info!(
            "Anchors resolved: UnitHashTable=0x{:X}, UiSettings=0x{:X}",
            anchors.unit_hash_table, anchors.ui_settings
        );
        Ok(*self.anchors.insert(anchors))
    }

    /// Walk the unit table and cache the local player.
    pub fn resolve_player(
        &mut self,
        signatures: &AnchorSignatures,
        table: &UnitTableConfig,
    ) -> Result<&PlayerUnit> {
        let anchors = self.ensure_anchors(signatures)?;
        let player = find_active_player(&self.handle, anchors.unit_hash_table, table)?;
        info!("Player '{}' resolved at 0x{:X}", player.name, player.address);
        Ok(self.player.insert(player))
    }

    /// Re-read the cached player unit. A unit that can no longer be read or
    /// has lost its inventory is dropped; otherwise the cached record is
    /// refreshed.
    pub fn check_liveness(&mut self) -> bool {
        let Some(player) = self.player.as_mut() else {
            return false;
        };

        let address = player.address;

        match self.handle.read_record::<UnitRecord>(address) {
            Ok(record) if record.inventory != 0 => {
                player.record = record;
                return true;
            }
            Ok(_) => debug!("Player unit 0x{:X} has no inventory, dropping", address),
            Err(e) => debug!("Player unit 0x{:X} unreadable, dropping: {}", address, e),
        }
        self.drop_player();
        false
    }

    /// Forget the cached player, keeping anchors and endpoint.
    pub fn drop_player(&mut self) {
        self.player = None;
    }
}

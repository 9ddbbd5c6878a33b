use serde::Serialize;

use crate::game::Area;
use crate::memory::WindowHandle;
use crate::network::NetworkEndpoint;

/// One snapshot of the player's state, produced by a successful poll
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    pub player_name: String,
    pub area: Area,
    /// Health reported by the previous successful snapshot
    pub previous_health: Option<i32>,
    pub current_health: i32,
    pub max_health: i32,
    pub is_in_town: bool,
    pub is_game_menu_open: bool,
    pub window_handle: WindowHandle,
    pub endpoint: Option<NetworkEndpoint>,
}

impl GameState {
    /// Health change since the previous snapshot
    pub fn health_delta(&self) -> Option<i32> {
        self.previous_health
            .map(|previous| self.current_health - previous)
    }

    /// Health lost since the previous snapshot, if any was lost
    pub fn damage_taken(&self) -> Option<i32> {
        self.health_delta()
            .filter(|delta| *delta < 0)
            .map(|delta| -delta)
    }

    /// Current health as a fraction of max health
    pub fn health_ratio(&self) -> Option<f64> {
        if self.max_health <= 0 {
            return None;
        }
        Some(self.current_health as f64 / self.max_health as f64)
    }
}

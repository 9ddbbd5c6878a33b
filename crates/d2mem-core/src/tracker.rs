use tracing::{debug, info, warn};

use crate::config::TargetConfig;
use crate::error::{Error, Result};
use crate::game::{Area, GameState, StatId, StatListRecord, StatValue, UiSettingsRecord, stat_value};
use crate::memory::{ProcessProvider, ReadMemory};
use crate::network::{ConnectionTable, resolve_endpoint};
use crate::session::{Session, SessionState};
use crate::unit::{LevelRecord, PathRecord, RoomExRecord, RoomRecord};

/// Polls the target process and assembles `GameState` snapshots.
///
/// The tracker owns the session with the target. Each `poll` makes sure the
/// session still matches the live process, resolves the player when needed
/// and reads every dependent structure afresh.
pub struct StateTracker<P: ProcessProvider, C: ConnectionTable> {
    provider: P,
    connections: C,
    config: TargetConfig,
    session: Option<Session<P::Handle>>,
    previous: Option<GameState>,
}

impl<P: ProcessProvider, C: ConnectionTable> StateTracker<P, C> {
    pub fn new(provider: P, connections: C, config: TargetConfig) -> Self {
        Self {
            provider,
            connections,
            config,
            session: None,
            previous: None,
        }
    }

    /// Take one snapshot. `None` when the target is unavailable or any read
    /// along the way fails.
    pub fn poll(&mut self) -> Option<GameState> {
        self.sync_session();
        let session = self.session.as_mut()?;

        session.check_liveness();

        if session.player().is_none() {
            let resolved = session
                .resolve_player(&self.config.signatures, &self.config.unit_table)
                .map(|_| ());
            if let Err(e) = resolved {
                debug!("Player resolution failed: {}", e);
                self.reset();
                return None;
            }

            if session.endpoint().is_none() {
                let pid = session.pid();
                match self
                    .connections
                    .tcp_connections()
                    .and_then(|table| resolve_endpoint(&table, pid))
                {
                    Ok(endpoint) => {
                        info!(
                            "Game server: {}:{}",
                            endpoint.remote_address, endpoint.remote_port
                        );
                        session.set_endpoint(endpoint);
                    }
                    Err(e) => debug!("Endpoint unavailable: {}", e),
                }
            }
        }

        match read_game_state(session, &self.config, self.previous.as_ref()) {
            Ok(state) => {
                self.previous = Some(state.clone());
                Some(state)
            }
            Err(e) => {
                debug!("Snapshot failed: {}", e);
                None
            }
        }
    }

    /// Drop the session and everything cached with it. The previous snapshot
    /// is kept.
    pub fn reset(&mut self) {
        if let Some(session) = self.session.take() {
            debug!("Session with PID {} reset", session.pid());
        }
    }

    /// Last successfully assembled snapshot
    pub fn previous(&self) -> Option<&GameState> {
        self.previous.as_ref()
    }

    pub fn session_state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Detached, Session::state)
    }

    pub fn session(&self) -> Option<&Session<P::Handle>> {
        self.session.as_ref()
    }

    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn connections_mut(&mut self) -> &mut C {
        &mut self.connections
    }

    /// Detach from a process that went away or was replaced, then attach to
    /// the live one if there is any.
    fn sync_session(&mut self) {
        let live = self.provider.find_process(&self.config.process_name);

        if let Some(session) = &self.session {
            let same = live
                .as_ref()
                .is_some_and(|info| session.is_same_process(info));
            if !same {
                match &live {
                    Some(info) => warn!(
                        "Target process changed (PID {} -> {})",
                        session.pid(),
                        info.pid
                    ),
                    None => warn!("Target process (PID {}) exited", session.pid()),
                }
                self.session = None;
                self.previous = None;
            }
        }

        if self.session.is_some() {
            return;
        }
        let Some(info) = live else {
            return;
        };
        if info.window_handle.is_null() {
            debug!("PID {} has no window yet", info.pid);
            return;
        }

        match self.provider.open(&info) {
            Ok(handle) => {
                info!(
                    "Attached to PID {} (base 0x{:X}, {} bytes)",
                    info.pid, info.base_address, info.module_size
                );
                self.session = Some(Session::new(info, handle));
            }
            Err(e) => debug!("Failed to open PID {}: {}", info.pid, e),
        }
    }
}

/// Read the structures hanging off the cached player and build a snapshot.
fn read_game_state<H: ReadMemory>(
    session: &Session<H>,
    config: &TargetConfig,
    previous: Option<&GameState>,
) -> Result<GameState> {
    let reader = session.reader();
    let player = session.player().ok_or(Error::InvalidGameState)?;
    let anchors = session.anchors().ok_or(Error::InvalidGameState)?;
    let unit = &player.record;

    let path: PathRecord = reader.read_record(unit.path)?;
    let room: RoomRecord = reader.read_record(path.room)?;
    let room_ex: RoomExRecord = reader.read_record(room.room_ex)?;
    let level: LevelRecord = reader.read_record(room_ex.level)?;

    let stat_list: StatListRecord = reader.read_record(unit.stats_list)?;
    if stat_list.stats_size > config.max_stat_count as u64 {
        return Err(Error::read_failed(
            stat_list.stats_array,
            format!(
                "stat count {} exceeds {}",
                stat_list.stats_size, config.max_stat_count
            ),
        ));
    }
    let stats: Vec<StatValue> =
        reader.read_array(stat_list.stats_array, stat_list.stats_size as usize)?;

    let ui: UiSettingsRecord = reader.read_record(anchors.ui_settings)?;

    // Level 0 shows up while loading or leaving a game
    let area = match Area::from_id(level.level_id) {
        Some(Area::None) | None => return Err(Error::InvalidGameState),
        Some(area) => area,
    };

    Ok(GameState {
        player_name: player.name.clone(),
        area,
        previous_health: previous.map(|state| state.current_health),
        current_health: stat_value(&stats, StatId::HitPoints),
        max_health: stat_value(&stats, StatId::MaxHitPoints),
        is_in_town: area.is_town(),
        is_game_menu_open: ui.is_game_menu_open(),
        window_handle: session.window_handle(),
        endpoint: session.endpoint(),
    })
}

//! Watch mode: poll the game and print state changes.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};
use d2mem_core::memory::layout::timing;
use d2mem_core::{
    GameState, SessionState, StateTracker, SystemConnectionTable, SystemProcessProvider,
    TargetConfig,
};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::info;

use crate::shutdown::ShutdownSignal;

/// One JSON line in `--json` mode
#[derive(Serialize)]
struct JsonLine<'a> {
    timestamp: DateTime<Local>,
    #[serde(flatten)]
    state: &'a GameState,
    damage_taken: Option<i32>,
}

/// Decides which snapshots are worth printing.
///
/// `previous_health` changes on every poll, so it is ignored when comparing.
#[derive(Default)]
struct ChangeFilter {
    last: Option<GameState>,
}

impl ChangeFilter {
    fn is_new(&mut self, state: &GameState) -> bool {
        let mut key = state.clone();
        key.previous_health = None;
        if self.last.as_ref() == Some(&key) {
            return false;
        }
        self.last = Some(key);
        true
    }
}

pub fn run(config: TargetConfig, interval: Duration, json: bool) -> Result<()> {
    let shutdown = ShutdownSignal::with_ctrlc()?;

    info!("Waiting for {}... (Ctrl+C to quit)", config.process_name);
    let mut tracker = StateTracker::new(SystemProcessProvider, SystemConnectionTable, config);
    let mut filter = ChangeFilter::default();
    let mut session_state = SessionState::Detached;

    while !shutdown.is_shutdown() {
        let snapshot = tracker.poll();

        let state = tracker.session_state();
        if state != session_state {
            info!("Session: {} -> {}", session_state, state);
            session_state = state;
        }

        if let Some(snapshot) = snapshot
            && filter.is_new(&snapshot)
        {
            if json {
                print_json(&snapshot)?;
            } else {
                println!("{}", format_line(Local::now(), &snapshot));
            }
        }

        let delay = match session_state {
            SessionState::Detached => Duration::from_millis(timing::PROCESS_RETRY_DELAY_MS),
            _ => interval,
        };
        if shutdown.sleep(delay) {
            break;
        }
    }

    info!("Stopped");
    Ok(())
}

fn print_json(state: &GameState) -> Result<()> {
    let line = JsonLine {
        timestamp: Local::now(),
        state,
        damage_taken: state.damage_taken(),
    };
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}

fn format_line(now: DateTime<Local>, state: &GameState) -> String {
    let mut line = format!(
        "[{}] {} | {} | HP {}/{}",
        now.format("%H:%M:%S"),
        state.player_name.bold(),
        state.area,
        state.current_health,
        state.max_health
    );

    if let Some(damage) = state.damage_taken() {
        line.push_str(&format!(" {}", format!("-{}", damage).red()));
    }
    if state.is_in_town {
        line.push_str(&format!(" {}", "[town]".green()));
    }
    if state.is_game_menu_open {
        line.push_str(" [menu]");
    }
    if let Some(endpoint) = &state.endpoint {
        line.push_str(&format!(
            " @ {}:{}",
            endpoint.remote_address, endpoint.remote_port
        ));
    }
    line
}

//! Anchors command: resolve everything once and print it as JSON.

use anyhow::{Result, anyhow};
use d2mem_core::{
    ConnectionTable, ProcessProvider, Session, SystemConnectionTable, SystemProcessProvider,
    TargetConfig, resolve_endpoint,
};
use serde_json::json;

pub fn run(config: &TargetConfig) -> Result<()> {
    let provider = SystemProcessProvider;
    let info = provider
        .find_process(&config.process_name)
        .ok_or_else(|| anyhow!("{} is not running", config.process_name))?;
    let handle = provider.open(&info)?;
    let mut session = Session::new(info, handle);

    let anchors = session.ensure_anchors(&config.signatures)?;

    let player = match session.resolve_player(&config.signatures, &config.unit_table) {
        Ok(player) => json!({
            "name": player.name,
            "address": hex(player.address),
            "unit_id": player.record.unit_id,
        }),
        Err(e) => json!({ "error": e.to_string() }),
    };

    let endpoint = match SystemConnectionTable
        .tcp_connections()
        .and_then(|table| resolve_endpoint(&table, session.pid()))
    {
        Ok(endpoint) => serde_json::to_value(endpoint)?,
        Err(e) => json!({ "error": e.to_string() }),
    };

    let info = session.info();
    let report = json!({
        "pid": info.pid,
        "base_address": hex(info.base_address),
        "module_size": hex(info.module_size),
        "window_handle": hex(info.window_handle.0),
        "anchors": {
            "unit_hash_table": hex(anchors.unit_hash_table),
            "ui_settings": hex(anchors.ui_settings),
        },
        "player": player,
        "endpoint": endpoint,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn hex(value: u64) -> String {
    format!("0x{:X}", value)
}

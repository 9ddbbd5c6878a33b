//! Target configuration
//!
//! Everything that depends on the client build but is not a record field
//! offset: process name, anchor signatures and table bounds. Loaded from
//! JSON; missing keys fall back to the built-in values.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::memory::layout::stats;
use crate::offset::AnchorSignatures;
use crate::unit::UnitTableConfig;

/// Default executable name of the target
pub const DEFAULT_PROCESS_NAME: &str = "D2R.exe";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub process_name: String,
    pub signatures: AnchorSignatures,
    pub unit_table: UnitTableConfig,
    /// Stat lists larger than this are treated as corrupt
    pub max_stat_count: usize,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            signatures: AnchorSignatures::default(),
            unit_table: UnitTableConfig::default(),
            max_stat_count: stats::MAX_STAT_COUNT,
        }
    }
}

impl TargetConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config: Self = serde_json::from_str(&content)?;
        // Reject malformed patterns now rather than on first attach
        config.signatures.unit_hash_table.pattern_bytes()?;
        config.signatures.ui_settings.pattern_bytes()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

//! Locating the local player in the unit hash table.
//!
//! The table holds one chain per bucket. Player units for every character in
//! the game live here, and the local player shows up under its name more than
//! once (the client keeps a shadow copy). The walker therefore groups player
//! units by name, treats the most recently duplicated name as the local
//! player, and picks the first of its units that has been placed in the world.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::memory::layout::{player_data, unit_table};
use crate::memory::ReadMemory;
use crate::unit::{PathRecord, UnitRecord};

/// Shape of the unit hash table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitTableConfig {
    pub bucket_count: usize,
    /// Average chain length budgeted per bucket
    pub max_chain_length: usize,
}

impl Default for UnitTableConfig {
    fn default() -> Self {
        Self {
            bucket_count: unit_table::BUCKET_COUNT,
            max_chain_length: unit_table::MAX_CHAIN_LENGTH,
        }
    }
}

impl UnitTableConfig {
    /// Total number of units visited before the walk is abandoned
    pub fn step_budget(&self) -> usize {
        self.bucket_count.saturating_mul(self.max_chain_length)
    }
}

/// The resolved local player unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerUnit {
    pub address: u64,
    pub record: UnitRecord,
    pub name: String,
}

/// Read a NUL-padded player name. `None` for an empty name.
pub fn read_player_name<R: ReadMemory + ?Sized>(reader: &R, unit_data: u64) -> Result<Option<String>> {
    let bytes = reader.read_bytes(unit_data + player_data::NAME, player_data::NAME_LEN)?;
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    if len == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&bytes[..len]).into_owned()))
}

/// Walk the unit hash table at `table_address` and return the local player.
pub fn find_active_player<R: ReadMemory + ?Sized>(
    reader: &R,
    table_address: u64,
    config: &UnitTableConfig,
) -> Result<PlayerUnit> {
    let heads: Vec<u64> = reader.read_array(table_address, config.bucket_count)?;
    let budget = config.step_budget();

    // Name groups in first-seen order
    let mut groups: Vec<(String, Vec<(u64, UnitRecord)>)> = Vec::new();
    let mut active: Option<usize> = None;
    let mut steps = 0usize;

    for (bucket, &head) in heads.iter().enumerate() {
        let mut address = head;
        while address != 0 {
            steps += 1;
            if steps > budget {
                return Err(Error::NotFound(format!(
                    "unit table walk exceeded {} steps (bucket {})",
                    budget, bucket
                )));
            }

            let record: UnitRecord = reader.read_record(address)?;
            if record.is_player() && record.unit_data != 0 {
                if let Some(name) = read_player_name(reader, record.unit_data)? {
                    let index = match groups.iter().position(|(n, _)| *n == name) {
                        Some(index) => index,
                        None => {
                            groups.push((name, Vec::new()));
                            groups.len() - 1
                        }
                    };
                    let units = &mut groups[index].1;
                    units.push((address, record));
                    if units.len() > 1 {
                        active = Some(index);
                    }
                }
            }

            address = record.next;
        }
    }

    debug!(
        "Unit table walk: {} steps, {} player names",
        steps,
        groups.len()
    );

    let index = active.ok_or_else(|| Error::NotFound("no duplicated player name".to_string()))?;
    let (name, candidates) = &groups[index];

    for &(address, record) in candidates {
        if record.path == 0 {
            continue;
        }
        match reader.read_record::<PathRecord>(record.path) {
            Ok(path) if path.is_placed() => {
                debug!("Active player '{}' at 0x{:X}", name, address);
                return Ok(PlayerUnit {
                    address,
                    record,
                    name: name.clone(),
                });
            }
            Ok(_) => {}
            Err(e) => debug!("Skipping candidate 0x{:X}: {}", address, e),
        }
    }

    Err(Error::NotFound(format!(
        "no placed unit for player '{}'",
        name
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MockMemoryBuilder, MockMemoryReader};

    const TABLE: u64 = 0x10_0000;

    fn empty_table() -> MockMemoryReader {
        MockMemoryBuilder::new()
            .write(TABLE, &[0u8; unit_table::BUCKET_COUNT * 8])
            .build()
    }

    fn set_bucket(memory: &MockMemoryReader, bucket: u64, head: u64) {
        memory.write_u64(TABLE + bucket * 8, head);
    }

    /// Place a player unit with its name and path next to it.
    fn player(memory: &MockMemoryReader, address: u64, name: &str, dynamic_y: u16, next: u64) {
        let unit_data = address + 0x1000;
        let path = address + 0x2000;
        memory.write_record(
            address,
            &UnitRecord {
                unit_type: 0,
                unit_data,
                path,
                inventory: 0xDEAD,
                next,
                ..Default::default()
            },
        );
        let mut name_bytes = [0u8; 16];
        name_bytes[..name.len()].copy_from_slice(name.as_bytes());
        memory.write(unit_data, &name_bytes);
        memory.write_record(
            path,
            &PathRecord {
                dynamic_x: 10,
                dynamic_y,
                room: 0,
            },
        );
    }

    #[test]
    fn test_picks_placed_unit_of_duplicated_name() {
        let memory = empty_table();
        player(&memory, 0x20_0000, "A", 20, 0);
        player(&memory, 0x30_0000, "B", 0, 0x40_0000);
        player(&memory, 0x40_0000, "B", 20, 0);
        set_bucket(&memory, 3, 0x20_0000);
        set_bucket(&memory, 10, 0x30_0000);

        let found = find_active_player(&memory, TABLE, &UnitTableConfig::default()).unwrap();
        assert_eq!(found.address, 0x40_0000);
        assert_eq!(found.name, "B");
    }

    #[test]
    fn test_last_duplicated_name_wins() {
        let memory = empty_table();
        player(&memory, 0x20_0000, "B", 20, 0);
        player(&memory, 0x30_0000, "C", 20, 0);
        player(&memory, 0x40_0000, "B", 20, 0);
        player(&memory, 0x50_0000, "C", 20, 0);
        set_bucket(&memory, 0, 0x20_0000);
        set_bucket(&memory, 1, 0x30_0000);
        set_bucket(&memory, 2, 0x40_0000);
        set_bucket(&memory, 3, 0x50_0000);

        let found = find_active_player(&memory, TABLE, &UnitTableConfig::default()).unwrap();
        assert_eq!(found.name, "C");
        assert_eq!(found.address, 0x30_0000);
    }

    #[test]
    fn test_no_placed_candidate_is_not_found() {
        let memory = empty_table();
        player(&memory, 0x20_0000, "B", 0, 0x30_0000);
        player(&memory, 0x30_0000, "B", 0, 0);
        set_bucket(&memory, 5, 0x20_0000);

        let err = find_active_player(&memory, TABLE, &UnitTableConfig::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_single_occurrences_are_not_found() {
        let memory = empty_table();
        player(&memory, 0x20_0000, "A", 20, 0);
        player(&memory, 0x30_0000, "B", 20, 0);
        set_bucket(&memory, 0, 0x20_0000);
        set_bucket(&memory, 1, 0x30_0000);

        let err = find_active_player(&memory, TABLE, &UnitTableConfig::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_cyclic_chain_terminates() {
        let memory = empty_table();
        player(&memory, 0x20_0000, "A", 20, 0x30_0000);
        player(&memory, 0x30_0000, "B", 20, 0x20_0000);
        set_bucket(&memory, 0, 0x20_0000);

        let err = find_active_player(&memory, TABLE, &UnitTableConfig::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_skips_non_players_and_unnamed_units() {
        let memory = empty_table();
        memory.write_record(
            0x20_0000,
            &UnitRecord {
                unit_type: 1,
                next: 0x30_0000,
                ..Default::default()
            },
        );
        // Player without unit data
        memory.write_record(
            0x30_0000,
            &UnitRecord {
                unit_type: 0,
                next: 0x40_0000,
                ..Default::default()
            },
        );
        player(&memory, 0x40_0000, "", 20, 0x50_0000);
        player(&memory, 0x50_0000, "", 20, 0);
        set_bucket(&memory, 0, 0x20_0000);

        let err = find_active_player(&memory, TABLE, &UnitTableConfig::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_candidate_with_unreadable_path_is_rejected() {
        let memory = empty_table();
        player(&memory, 0x20_0000, "B", 20, 0);
        player(&memory, 0x30_0000, "B", 20, 0);
        memory.unmap(0x20_0000 + 0x2000, path_size());
        set_bucket(&memory, 0, 0x20_0000);
        set_bucket(&memory, 1, 0x30_0000);

        let found = find_active_player(&memory, TABLE, &UnitTableConfig::default()).unwrap();
        assert_eq!(found.address, 0x30_0000);
    }

    fn path_size() -> u64 {
        crate::memory::layout::path::SIZE as u64
    }

    #[test]
    fn test_read_player_name_stops_at_nul() {
        let memory = MockMemoryBuilder::new()
            .write(0x1000, b"Sorc\0garbage\0\0\0\0")
            .build();
        assert_eq!(
            read_player_name(&memory, 0x1000).unwrap(),
            Some("Sorc".to_string())
        );
    }
}

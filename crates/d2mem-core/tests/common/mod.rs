#![allow(dead_code)]

use std::net::Ipv4Addr;

use d2mem_core::game::{StatListRecord, StatValue, UiSettingsRecord};
use d2mem_core::memory::layout::{stat_value, unit, unit_table};
use d2mem_core::memory::{
    MockMemoryBuilder, MockMemoryReader, MockProcessProvider, ProcessInfo, WindowHandle,
};
use d2mem_core::network::{TcpConnection, TcpState};
use d2mem_core::unit::{LevelRecord, PathRecord, RoomExRecord, RoomRecord, UnitRecord};
use d2mem_core::{StateTracker, TargetConfig};

pub const BASE: u64 = 0x1_4000_0000;
pub const MODULE_SIZE: usize = 0x400;
pub const TABLE: u64 = BASE + 0x10_0000;
pub const UI: u64 = BASE + 0x20_0000;
pub const PID: u32 = 4242;
pub const WINDOW: WindowHandle = WindowHandle(0xBEEF);

/// Shadow copy of the local player (never placed)
pub const SHADOW: u64 = 0x2_0000_0000;
/// The placed local player unit
pub const PLAYER: u64 = 0x2_0001_0000;

// Per-unit layout of the structures hanging off a synthetic unit
const PLAYER_DATA: u64 = 0x200;
const PATH: u64 = 0x300;
const ROOM: u64 = 0x400;
const ROOM_EX: u64 = 0x500;
const LEVEL: u64 = 0x600;
const STAT_LIST: u64 = 0x800;
const STATS: u64 = 0x900;

pub type MockTracker = StateTracker<MockProcessProvider, Vec<TcpConnection>>;

#[derive(Debug, Clone)]
pub struct PlayerSpec {
    pub name: &'static str,
    pub dynamic_x: u16,
    pub dynamic_y: u16,
    pub level_id: u32,
    pub hp_raw: i32,
    pub max_hp_raw: i32,
}

impl PlayerSpec {
    /// Placed at (10, 20) in the Rogue Encampment with 10/20 life
    pub fn placed(name: &'static str) -> Self {
        Self {
            name,
            dynamic_x: 10,
            dynamic_y: 20,
            level_id: 1,
            hp_raw: 2560,
            max_hp_raw: 5120,
        }
    }

    pub fn unplaced(name: &'static str) -> Self {
        Self {
            dynamic_y: 0,
            ..Self::placed(name)
        }
    }
}

/// A synthetic client: a module image carrying both anchor signatures, an
/// empty unit hash table and a UI settings block.
pub struct SyntheticGame {
    pub memory: MockMemoryReader,
}

impl SyntheticGame {
    pub fn new() -> Self {
        let memory = MockMemoryBuilder::new()
            .module(BASE, &code_image())
            .write(TABLE, &[0u8; unit_table::BUCKET_COUNT * 8])
            .write_record(UI, &UiSettingsRecord::default())
            .build();
        Self { memory }
    }

    /// The usual local player: an unplaced shadow in bucket 3 and the placed
    /// unit in bucket 9.
    pub fn with_local_player(name: &'static str) -> Self {
        let game = Self::new();
        game.write_player(SHADOW, &PlayerSpec::unplaced(name), 0);
        game.write_player(PLAYER, &PlayerSpec::placed(name), 0);
        game.set_bucket(3, SHADOW);
        game.set_bucket(9, PLAYER);
        game
    }

    pub fn write_player(&self, address: u64, spec: &PlayerSpec, next: u64) {
        self.memory.write_record(
            address,
            &UnitRecord {
                unit_type: 0,
                unit_data: address + PLAYER_DATA,
                path: address + PATH,
                stats_list: address + STAT_LIST,
                inventory: address + 0xF00,
                next,
                ..Default::default()
            },
        );

        let mut name = [0u8; 16];
        name[..spec.name.len()].copy_from_slice(spec.name.as_bytes());
        self.memory.write(address + PLAYER_DATA, &name);

        self.memory.write_record(
            address + PATH,
            &PathRecord {
                dynamic_x: spec.dynamic_x,
                dynamic_y: spec.dynamic_y,
                room: address + ROOM,
            },
        );
        self.memory.write_record(
            address + ROOM,
            &RoomRecord {
                room_ex: address + ROOM_EX,
            },
        );
        self.memory.write_record(
            address + ROOM_EX,
            &RoomExRecord {
                level: address + LEVEL,
            },
        );
        self.set_level(address, spec.level_id);

        self.memory.write_record(
            address + STAT_LIST,
            &StatListRecord {
                stats_array: address + STATS,
                stats_size: 2,
            },
        );
        self.set_health(address, spec.hp_raw);
        self.memory.write_record(
            address + STATS + stat_value::SIZE as u64,
            &StatValue {
                layer: 0,
                stat: 7,
                value: spec.max_hp_raw,
            },
        );
    }

    pub fn set_bucket(&self, bucket: u64, head: u64) {
        self.memory.write_u64(TABLE + bucket * 8, head);
    }

    pub fn set_level(&self, address: u64, level_id: u32) {
        self.memory
            .write_record(address + LEVEL, &LevelRecord { level_id });
    }

    pub fn set_health(&self, address: u64, hp_raw: i32) {
        self.memory.write_record(
            address + STATS,
            &StatValue {
                layer: 0,
                stat: 6,
                value: hp_raw,
            },
        );
    }

    pub fn set_stat_count(&self, address: u64, count: u64) {
        self.memory.write_record(
            address + STAT_LIST,
            &StatListRecord {
                stats_array: address + STATS,
                stats_size: count,
            },
        );
    }

    /// Null out the room pointer of the unit's path.
    pub fn break_path(&self, address: u64) {
        self.memory.write_u64(address + PATH + 0x20, 0);
    }

    /// Clear the inventory pointer, as the client does for a freed unit.
    pub fn release_unit(&self, address: u64) {
        self.memory.write_u64(address + unit::INVENTORY as u64, 0);
    }

    pub fn set_menu_open(&self, open: bool) {
        self.memory.write_record(
            UI,
            &UiSettingsRecord {
                game_menu_open: open as u8,
            },
        );
    }

    /// Overwrite the module image so no signature matches any more.
    pub fn wipe_code(&self) {
        self.memory.write(BASE, &[0x90u8; MODULE_SIZE]);
    }

    pub fn tracker(&self, connections: Vec<TcpConnection>) -> MockTracker {
        StateTracker::new(
            MockProcessProvider::new(process_info(PID), self.memory.clone()),
            connections,
            TargetConfig::default(),
        )
    }
}

pub fn process_info(pid: u32) -> ProcessInfo {
    ProcessInfo {
        pid,
        base_address: BASE,
        module_size: MODULE_SIZE as u64,
        window_handle: WINDOW,
    }
}

pub fn established(ip: [u8; 4], port: u16, pid: u32) -> TcpConnection {
    TcpConnection {
        remote_address: Ipv4Addr::from(ip),
        remote_port: port,
        state: TcpState::Established,
        owning_pid: pid,
    }
}

/// Module image with the unit table and UI settings references.
fn code_image() -> Vec<u8> {
    let mut image = vec![0x90u8; MODULE_SIZE];

    // lea rcx, [rip + TABLE]; mov edx, ecx
    let hit = 0x100usize;
    let disp = (TABLE - (BASE + hit as u64 + 7)) as i32;
    image[hit..hit + 3].copy_from_slice(&[0x48, 0x8D, 0x0D]);
    image[hit + 3..hit + 7].copy_from_slice(&disp.to_le_bytes());
    image[hit + 7..hit + 9].copy_from_slice(&[0x8B, 0xD1]);

    // test bpl, bpl; sete [rip + UI]
    let hit = 0x200usize;
    let disp = (UI - (BASE + hit as u64 + 9)) as i32;
    image[hit..hit + 6].copy_from_slice(&[0x40, 0x84, 0xED, 0x0F, 0x94, 0x05]);
    image[hit + 6..hit + 10].copy_from_slice(&disp.to_le_bytes());

    image
}

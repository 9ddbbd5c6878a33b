//! Memory layout constants for D2R data structures
//!
//! This module centralizes the binary layout of every record read from the
//! target process. Offsets are byte offsets from the start of the record and
//! match the 64-bit client the built-in signatures were written against.
//!
//! # Pointer Chain Overview
//!
//! ```text
//! UnitHashTable ──► UnitAny ──► pListNext ──► UnitAny ──► ...
//!                     │
//!                     ├── pUnitData ──► PlayerData (name)
//!                     ├── pPath ──► Path ──► pRoom ──► Room ──► pRoomEx ──► RoomEx ──► pLevel ──► Level
//!                     └── pStatList ──► StatList ──► StatValue[]
//! ```

/// Size of a remote pointer
pub const POINTER_SIZE: usize = 8;

/// Memory layout constants for the UnitAny structure
///
/// # Structure Layout
///
/// ```text
/// Offset   Field          Size    Description
/// ──────────────────────────────────────────────────────
/// 0x00     UnitType       4       0 = player, 1 = monster, ...
/// 0x04     TxtFileNo      4       Class / row id in the txt tables
/// 0x08     UnitId         4       Runtime id
/// 0x10     pUnitData      8       PlayerData for players
/// 0x38     pPath          8       Path record
/// 0x88     pStatList      8       StatList record
/// 0x90     pInventory     8       Non-zero for live players
/// 0x150    pListNext      8       Next unit in the same bucket
/// ```
pub mod unit {
    pub const SIZE: usize = 0x160;

    pub const UNIT_TYPE: usize = 0x00;
    pub const TXT_FILE_NO: usize = 0x04;
    pub const UNIT_ID: usize = 0x08;
    pub const UNIT_DATA: usize = 0x10;
    pub const PATH: usize = 0x38;
    pub const STAT_LIST: usize = 0x88;
    pub const INVENTORY: usize = 0x90;
    pub const LIST_NEXT: usize = 0x150;
}

/// Memory layout constants for PlayerData (pointed to by UnitAny.pUnitData)
pub mod player_data {
    /// Character name, NUL padded
    pub const NAME: u64 = 0x00;
    pub const NAME_LEN: usize = 16;
}

/// Memory layout constants for the Path structure
pub mod path {
    pub const SIZE: usize = 0x28;

    pub const DYNAMIC_X: usize = 0x02;
    pub const DYNAMIC_Y: usize = 0x06;
    pub const ROOM: usize = 0x20;
}

/// Memory layout constants for the Room structure
pub mod room {
    pub const SIZE: usize = 0x20;

    pub const ROOM_EX: usize = 0x18;
}

/// Memory layout constants for the RoomEx structure
pub mod room_ex {
    pub const SIZE: usize = 0x98;

    pub const LEVEL: usize = 0x90;
}

/// Memory layout constants for the Level structure
pub mod level {
    pub const SIZE: usize = 0x1FC;

    pub const LEVEL_ID: usize = 0x1F8;
}

/// Memory layout constants for the StatList structure
///
/// The list carries two (array, size) pairs; the second one holds the full
/// set of stats including hit points.
pub mod stat_list {
    pub const SIZE: usize = 0x90;

    pub const FULL_STATS_ARRAY: usize = 0x80;
    pub const FULL_STATS_SIZE: usize = 0x88;
}

/// Memory layout constants for a single StatValue entry
pub mod stat_value {
    pub const SIZE: usize = 8;

    pub const LAYER: usize = 0;
    pub const STAT: usize = 2;
    pub const VALUE: usize = 4;
}

/// Memory layout constants for the UI settings block
pub mod ui_settings {
    pub const SIZE: usize = 0x08;

    /// The resolved anchor sits one byte before the `sete` target.
    pub const GAME_MENU_OPEN: usize = 0x01;
}

/// Defaults for the unit hash table walk
pub mod unit_table {
    /// Number of buckets in the player unit table
    pub const BUCKET_COUNT: usize = 128;

    /// Upper bound on units per bucket before a chain is treated as corrupt
    pub const MAX_CHAIN_LENGTH: usize = 64;
}

/// Stat ids and fixed-point scaling
pub mod stats {
    /// Bits of fractional precision in life/mana stats
    pub const FIXED_POINT_SHIFT: u32 = 8;

    /// Upper bound on stat entries read from a single list
    pub const MAX_STAT_COUNT: usize = 1024;
}

/// Timing constants for the polling loop
pub mod timing {
    /// Interval between polls in the main loop (ms)
    pub const POLL_INTERVAL_MS: u64 = 100;

    /// Delay before looking for the process again after it disappears (ms)
    pub const PROCESS_RETRY_DELAY_MS: u64 = 2000;
}

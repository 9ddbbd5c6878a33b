use strum::{Display, FromRepr};

use crate::memory::layout::{level, path, room, room_ex, unit};
use crate::memory::{Record, field};

/// `UnitAny.dwType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, Display)]
#[repr(u32)]
pub enum UnitType {
    Player = 0,
    Monster = 1,
    Object = 2,
    Missile = 3,
    Item = 4,
    Tile = 5,
}

/// The modelled prefix of a `UnitAny`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitRecord {
    pub unit_type: u32,
    pub txt_file_no: u32,
    pub unit_id: u32,
    pub unit_data: u64,
    pub path: u64,
    pub stats_list: u64,
    pub inventory: u64,
    pub next: u64,
}

impl UnitRecord {
    pub fn kind(&self) -> Option<UnitType> {
        UnitType::from_repr(self.unit_type)
    }

    pub fn is_player(&self) -> bool {
        self.kind() == Some(UnitType::Player)
    }
}

impl Record for UnitRecord {
    const SIZE: usize = unit::SIZE;

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            unit_type: field::u32_at(bytes, unit::UNIT_TYPE),
            txt_file_no: field::u32_at(bytes, unit::TXT_FILE_NO),
            unit_id: field::u32_at(bytes, unit::UNIT_ID),
            unit_data: field::u64_at(bytes, unit::UNIT_DATA),
            path: field::u64_at(bytes, unit::PATH),
            stats_list: field::u64_at(bytes, unit::STAT_LIST),
            inventory: field::u64_at(bytes, unit::INVENTORY),
            next: field::u64_at(bytes, unit::LIST_NEXT),
        })
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; Self::SIZE];
        field::put(&mut buffer, unit::UNIT_TYPE, &self.unit_type.to_le_bytes());
        field::put(&mut buffer, unit::TXT_FILE_NO, &self.txt_file_no.to_le_bytes());
        field::put(&mut buffer, unit::UNIT_ID, &self.unit_id.to_le_bytes());
        field::put(&mut buffer, unit::UNIT_DATA, &self.unit_data.to_le_bytes());
        field::put(&mut buffer, unit::PATH, &self.path.to_le_bytes());
        field::put(&mut buffer, unit::STAT_LIST, &self.stats_list.to_le_bytes());
        field::put(&mut buffer, unit::INVENTORY, &self.inventory.to_le_bytes());
        field::put(&mut buffer, unit::LIST_NEXT, &self.next.to_le_bytes());
        buffer
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PathRecord {
    pub dynamic_x: u16,
    /// Zero until the unit has been placed in the world
    pub dynamic_y: u16,
    pub room: u64,
}

impl PathRecord {
    pub fn is_placed(&self) -> bool {
        self.dynamic_y != 0
    }
}

impl Record for PathRecord {
    const SIZE: usize = path::SIZE;

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            dynamic_x: field::u16_at(bytes, path::DYNAMIC_X),
            dynamic_y: field::u16_at(bytes, path::DYNAMIC_Y),
            room: field::u64_at(bytes, path::ROOM),
        })
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; Self::SIZE];
        field::put(&mut buffer, path::DYNAMIC_X, &self.dynamic_x.to_le_bytes());
        field::put(&mut buffer, path::DYNAMIC_Y, &self.dynamic_y.to_le_bytes());
        field::put(&mut buffer, path::ROOM, &self.room.to_le_bytes());
        buffer
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoomRecord {
    pub room_ex: u64,
}

impl Record for RoomRecord {
    const SIZE: usize = room::SIZE;

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            room_ex: field::u64_at(bytes, room::ROOM_EX),
        })
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; Self::SIZE];
        field::put(&mut buffer, room::ROOM_EX, &self.room_ex.to_le_bytes());
        buffer
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoomExRecord {
    pub level: u64,
}

impl Record for RoomExRecord {
    const SIZE: usize = room_ex::SIZE;

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            level: field::u64_at(bytes, room_ex::LEVEL),
        })
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; Self::SIZE];
        field::put(&mut buffer, room_ex::LEVEL, &self.level.to_le_bytes());
        buffer
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelRecord {
    pub level_id: u32,
}

impl Record for LevelRecord {
    const SIZE: usize = level::SIZE;

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            level_id: field::u32_at(bytes, level::LEVEL_ID),
        })
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; Self::SIZE];
        field::put(&mut buffer, level::LEVEL_ID, &self.level_id.to_le_bytes());
        buffer
    }
}

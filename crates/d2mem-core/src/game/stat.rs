use serde::{Deserialize, Serialize};
use strum::{Display, FromRepr, IntoStaticStr};

use crate::memory::layout::{self, stat_list};
use crate::memory::{Record, field};

/// Stat ids from `ItemStatCost.txt` that the tracker cares about
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromRepr,
    IntoStaticStr,
    Display,
)]
#[repr(u16)]
pub enum StatId {
    Strength = 0,
    Energy = 1,
    Dexterity = 2,
    Vitality = 3,
    StatPts = 4,
    SkillPts = 5,
    HitPoints = 6,
    MaxHitPoints = 7,
    Mana = 8,
    MaxMana = 9,
    Stamina = 10,
    MaxStamina = 11,
    Level = 12,
    Experience = 13,
    Gold = 14,
    GoldBank = 15,
}

impl StatId {
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::from_repr(value)
    }

    /// Life, mana and stamina are stored with 8 fractional bits
    pub fn is_fixed_point(&self) -> bool {
        matches!(
            self,
            Self::HitPoints
                | Self::MaxHitPoints
                | Self::Mana
                | Self::MaxMana
                | Self::Stamina
                | Self::MaxStamina
        )
    }
}

/// One (layer, stat, value) entry of a stat array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatValue {
    pub layer: u16,
    pub stat: u16,
    pub value: i32,
}

impl StatValue {
    pub fn stat_id(&self) -> Option<StatId> {
        StatId::from_u16(self.stat)
    }
}

impl Record for StatValue {
    const SIZE: usize = layout::stat_value::SIZE;

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            layer: field::u16_at(bytes, layout::stat_value::LAYER),
            stat: field::u16_at(bytes, layout::stat_value::STAT),
            value: field::i32_at(bytes, layout::stat_value::VALUE),
        })
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; Self::SIZE];
        field::put(&mut buffer, layout::stat_value::LAYER, &self.layer.to_le_bytes());
        field::put(&mut buffer, layout::stat_value::STAT, &self.stat.to_le_bytes());
        field::put(&mut buffer, layout::stat_value::VALUE, &self.value.to_le_bytes());
        buffer
    }
}

/// The full-stats (array, size) pair of a unit's stat list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatListRecord {
    pub stats_array: u64,
    pub stats_size: u64,
}

impl Record for StatListRecord {
    const SIZE: usize = stat_list::SIZE;

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            stats_array: field::u64_at(bytes, stat_list::FULL_STATS_ARRAY),
            stats_size: field::u64_at(bytes, stat_list::FULL_STATS_SIZE),
        })
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; Self::SIZE];
        field::put(
            &mut buffer,
            stat_list::FULL_STATS_ARRAY,
            &self.stats_array.to_le_bytes(),
        );
        field::put(
            &mut buffer,
            stat_list::FULL_STATS_SIZE,
            &self.stats_size.to_le_bytes(),
        );
        buffer
    }
}

/// Drop the fractional bits of a fixed-point stat (arithmetic shift).
pub fn decode_fixed_point(raw: i32) -> i32 {
    raw >> layout::stats::FIXED_POINT_SHIFT
}

/// Value of the first entry with `id`, or 0 if the list has none.
///
/// Fixed-point stats are returned in whole units.
pub fn stat_value(stats: &[StatValue], id: StatId) -> i32 {
    stats
        .iter()
        .find(|entry| entry.stat == id as u16)
        .map(|entry| {
            if id.is_fixed_point() {
                decode_fixed_point(entry.value)
            } else {
                entry.value
            }
        })
        .unwrap_or(0)
}

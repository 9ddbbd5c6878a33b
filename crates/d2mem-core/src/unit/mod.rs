mod records;
pub mod walker;

pub use records::*;
pub use walker::{PlayerUnit, UnitTableConfig, find_active_player, read_player_name};

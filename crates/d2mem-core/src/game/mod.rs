mod area;
mod stat;
mod state;
mod ui;

pub use area::*;
pub use stat::*;
pub use state::*;
pub use ui::*;

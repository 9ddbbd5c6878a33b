mod anchors;
mod signature;

pub use anchors::*;
pub use signature::*;

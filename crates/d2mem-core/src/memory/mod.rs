pub mod layout;
mod process;
mod reader;

// Mock memory for testing (always available for unit and integration tests)
#[doc(hidden)]
pub mod mock;

pub use process::*;
pub(crate) use reader::field;
pub use reader::{ReadMemory, Record};

#[doc(hidden)]
pub use mock::{MockMemoryBuilder, MockMemoryReader, MockProcessProvider};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Target process unavailable: {0}")]
    ProcessUnavailable(String),

    #[error("Pointer to {0} is null")]
    InvalidPointer(&'static str),

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Signature not found: {0}")]
    PatternNotFound(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("TCP connection table unavailable: {0}")]
    ConnectionTableUnavailable(String),

    #[error("Invalid game state")]
    InvalidGameState,

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn read_failed(address: u64, message: impl Into<String>) -> Self {
        Error::MemoryReadFailed {
            address,
            message: message.into(),
        }
    }

    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("command `{command}` is not valid in state `{state}`")]
    InvalidCommand {
        state: String,
        command: &'static str,
    },
    #[error("contract violation: {0}")]
    Contract(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("a failed save of `{0}` must be retried or the session abandoned")]
    RetryRequired(&'static str),
}

/// Failures surfaced by a [`crate::store::SessionStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        EngineError::Storage(e.to_string())
    }
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

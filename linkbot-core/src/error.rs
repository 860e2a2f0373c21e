use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkbotError {
    #[error("Source error: {0}")]
    Source(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Too many errors: failed to process {failed} events (threshold {threshold})")]
    TooManyFailures { failed: usize, threshold: usize },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LinkbotError {
    /// Errors that retrying the same call cannot fix.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LinkbotError::Config(_) | LinkbotError::TooManyFailures { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("Unknown event kind")]
    UnknownEventKind,

    #[error("Can not get routing metadata")]
    MissingRouting,
}

pub type Result<T> = std::result::Result<T, LinkbotError>;

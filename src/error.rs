use thiserror::Error;

/// Errors raised by the outer surfaces (config files, CLI parsing).
/// The progress engine itself never fails.
#[derive(Debug, Error)]
pub enum WakeError {
    #[error("config i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown time period `{0}`")]
    UnknownPeriod(String),
}

pub type Result<T> = std::result::Result<T, WakeError>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Device not found: {0}")]
    NotFound(String),

    #[error("Synthesis error: {0}")]
    Synth(#[from] simulator::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

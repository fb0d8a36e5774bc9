use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("provider call failed: {0}")]
    Provider(String),

    #[error("provider call timed out after {timeout_seconds}s")]
    Timeout { timeout_seconds: u64 },

    #[error("primary provider quota exhausted and fallback unavailable: {reason}")]
    QuotaExhausted { reason: String },

    #[error("no providers configured")]
    NoProvider,
}

pub type ModelResult<T> = Result<T, ModelError>;

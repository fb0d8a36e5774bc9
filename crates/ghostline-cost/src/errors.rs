use thiserror::Error;

#[derive(Error, Debug)]
pub enum CostError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CostResult<T> = Result<T, CostError>;

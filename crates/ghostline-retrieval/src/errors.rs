//! Errors surfaced by the retriever (spec §4.4).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("embedding backend failed: {0}")]
    Embedding(#[from] ghostline_embed::EmbeddingError),

    #[error("candidate store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type RetrievalResult<T> = Result<T, RetrievalError>;

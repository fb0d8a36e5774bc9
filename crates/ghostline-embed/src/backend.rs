//! `EmbeddingBackend` — the vendor-agnostic capability `Embedder` wraps.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("backend call failed: {0}")]
    Backend(String),

    #[error("backend returned dimension {got}, expected {expected} and dimension mismatch is not allowed")]
    DimensionMismatch { got: usize, expected: usize },
}

pub trait EmbeddingBackend: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

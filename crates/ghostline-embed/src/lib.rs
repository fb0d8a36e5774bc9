//! # ghostline-embed
//!
//! C3 Embedder: `embed`, `embed_batch`, `similarity` (spec §4.3).

pub mod backend;
pub mod cosine;
pub mod embedder;
pub mod mock;

pub use backend::{EmbeddingBackend, EmbeddingError};
pub use cosine::cosine_similarity;
pub use embedder::Embedder;
pub use mock::HashEmbeddingBackend;

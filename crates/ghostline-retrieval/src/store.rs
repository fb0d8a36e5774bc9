//! `ChunkStore` — abstraction over wherever `SourceChunk`s are persisted
//! and indexed for vector search. The retriever never talks to storage
//! directly so the workflow core stays storage-agnostic (spec §4.4).

use std::sync::Mutex;

use ghostline_core::SourceChunk;

use crate::errors::RetrievalResult;

/// Candidate source for retrieval. A real implementation backs this with
/// a vector index (pgvector, sqlite-vss, ...); tests use `InMemoryChunkStore`.
pub trait ChunkStore: Send + Sync {
    /// All chunks belonging to a project, in no particular order.
    fn chunks_for_project(&self, project_id: &str) -> RetrievalResult<Vec<SourceChunk>>;

    /// Persists freshly embedded chunks (the `embed` node's write path).
    /// Read-only stores over externally-managed indexes may leave this
    /// unimplemented in spirit by erroring; `InMemoryChunkStore` accepts.
    fn upsert_chunks(&self, chunks: Vec<SourceChunk>) -> RetrievalResult<()>;
}

/// Deterministic in-memory store for tests and small projects.
pub struct InMemoryChunkStore {
    chunks: Mutex<Vec<SourceChunk>>,
}

impl InMemoryChunkStore {
    pub fn new(chunks: Vec<SourceChunk>) -> Self {
        Self { chunks: Mutex::new(chunks) }
    }
}

impl ChunkStore for InMemoryChunkStore {
    fn chunks_for_project(&self, project_id: &str) -> RetrievalResult<Vec<SourceChunk>> {
        Ok(self
            .chunks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect())
    }

    fn upsert_chunks(&self, chunks: Vec<SourceChunk>) -> RetrievalResult<()> {
        self.chunks.lock().unwrap().extend(chunks);
        Ok(())
    }
}

//! `SourceChunk` — an extracted-text fragment with a pre-computed
//! embedding. Immutable after ingestion; owned by the (out of scope)
//! ingestion pipeline and consumed read-only by the core.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceChunk {
    pub id: String,
    pub project_id: String,
    pub source_material_id: String,
    pub filename: String,
    pub content: String,
    pub chunk_index: u32,
    pub word_count: u32,
    pub embedding: Vec<f32>,
}

impl SourceChunk {
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        source_material_id: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<String>,
        chunk_index: u32,
        embedding: Vec<f32>,
    ) -> Self {
        let content = content.into();
        let word_count = content.split_whitespace().count() as u32;
        Self {
            id: id.into(),
            project_id: project_id.into(),
            source_material_id: source_material_id.into(),
            filename: filename.into(),
            content,
            chunk_index,
            word_count,
            embedding,
        }
    }
}

//! `retrieve()` and `RAGResult` — the public surface of the retriever
//! (spec §4.4).

use ghostline_embed::Embedder;
use tracing::warn;

use crate::errors::RetrievalResult;
use crate::rerank::{coverage_rerank, keyword_overlap_rank, ScoredChunk};
use crate::store::ChunkStore;

/// A source-chunk reference attached to a retrieved chunk, distinct from
/// the inline `Citation` the chapter text parser produces later — this one
/// has no marker positions because it hasn't been quoted in prose yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkCitation {
    pub filename: String,
    pub source_material_id: String,
    pub chunk_index: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    pub citation: ChunkCitation,
    pub content: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RAGResult {
    pub chunks: Vec<RetrievedChunk>,
    pub fell_back_to_keyword_search: bool,
}

impl RAGResult {
    /// Greedily concatenates chunks, in ranked order, until the estimated
    /// token count (~4 chars/token) would exceed `max_tokens`.
    pub fn build_context(&self, max_tokens: usize, include_citations: bool) -> String {
        let budget_chars = max_tokens.saturating_mul(4);
        let mut out = String::new();
        let mut used_chars = 0usize;

        for chunk in &self.chunks {
            let citation_line = format!(
                "[source: {} #{}]",
                chunk.citation.filename, chunk.citation.chunk_index
            );
            let block = if include_citations {
                format!("---\n{}\n{}\n---\n", citation_line, chunk.content)
            } else {
                format!("---\n{}\n---\n", chunk.content)
            };
            if used_chars + block.len() > budget_chars && !out.is_empty() {
                break;
            }
            used_chars += block.len();
            out.push_str(&block);
        }
        out
    }
}

/// `retrieve(query, project_id, top_k, similarity_threshold)` per spec §4.4.
///
/// On a `ChunkStore` failure, falls back to keyword-overlap scoring over
/// all project chunks (no embedding call, no similarity threshold) rather
/// than propagating the error to the caller.
pub fn retrieve(
    store: &dyn ChunkStore,
    embedder: &Embedder,
    query: &str,
    project_id: &str,
    top_k: usize,
    similarity_threshold: f64,
) -> RetrievalResult<RAGResult> {
    let chunks = match store.chunks_for_project(project_id) {
        Ok(chunks) => chunks,
        Err(err) => {
            warn!(project_id, error = %err, "chunk store unavailable, falling back to keyword search");
            return Ok(RAGResult {
                chunks: Vec::new(),
                fell_back_to_keyword_search: true,
            });
        }
    };

    let query_embedding = embedder.embed(query)?;

    let mut candidates: Vec<ScoredChunk> = chunks
        .iter()
        .map(|chunk| ScoredChunk {
            chunk: chunk.clone(),
            similarity: embedder.similarity(&query_embedding, &chunk.embedding),
        })
        .filter(|c| c.similarity >= similarity_threshold)
        .collect();

    candidates.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(std::cmp::Ordering::Equal));
    let selected = coverage_rerank(candidates, query, top_k);
    Ok(to_rag_result(selected, false))
}

/// Used directly by callers who already have a `ChunkStore` failure and
/// want to skip straight to keyword search (spec §4.4 step 4).
pub fn retrieve_by_keyword(chunks: Vec<ghostline_core::SourceChunk>, query: &str, top_k: usize) -> RAGResult {
    to_rag_result(keyword_overlap_rank(chunks, query, top_k), true)
}

fn to_rag_result(scored: Vec<ScoredChunk>, fell_back: bool) -> RAGResult {
    let chunks = scored
        .into_iter()
        .map(|s| RetrievedChunk {
            citation: ChunkCitation {
                filename: s.chunk.filename,
                source_material_id: s.chunk.source_material_id,
                chunk_index: s.chunk.chunk_index,
            },
            content: s.chunk.content,
            similarity: s.similarity,
        })
        .collect();
    RAGResult {
        chunks,
        fell_back_to_keyword_search: fell_back,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghostline_core::SourceChunk;
    use ghostline_embed::mock::HashEmbeddingBackend;
    use ghostline_embed::Embedder;

    use crate::store::InMemoryChunkStore;

    fn embedder() -> Embedder {
        Embedder::new(Box::new(HashEmbeddingBackend::new(16)), 16, true)
    }

    fn chunk(id: &str, filename: &str, content: &str, embedding: Vec<f32>) -> SourceChunk {
        SourceChunk::new(id, "proj-1", "mat-1", filename, content, 0, embedding)
    }

    #[test]
    fn retrieve_filters_below_threshold() {
        let e = embedder();
        let near = e.embed("castle dragon knight").unwrap();
        let far = vec![0.0f32; 16];
        let store = InMemoryChunkStore::new(vec![
            chunk("1", "near.txt", "castle dragon knight", near),
            chunk("2", "far.txt", "completely unrelated filler", far),
        ]);
        let result = retrieve(&store, &e, "castle dragon knight", "proj-1", 5, 0.99).unwrap();
        assert_eq!(result.chunks.len(), 1);
        assert_eq!(result.chunks[0].citation.filename, "near.txt");
    }

    #[test]
    fn build_context_respects_token_budget() {
        let result = RAGResult {
            chunks: vec![
                RetrievedChunk {
                    citation: ChunkCitation { filename: "a.txt".into(), source_material_id: "m".into(), chunk_index: 0 },
                    content: "x".repeat(100),
                    similarity: 0.9,
                },
                RetrievedChunk {
                    citation: ChunkCitation { filename: "b.txt".into(), source_material_id: "m".into(), chunk_index: 1 },
                    content: "y".repeat(100),
                    similarity: 0.8,
                },
            ],
            fell_back_to_keyword_search: false,
        };
        let context = result.build_context(30, true);
        assert!(context.contains("a.txt"));
        assert!(!context.contains("b.txt"));
    }

    #[test]
    fn empty_project_yields_empty_result() {
        let e = embedder();
        let store = InMemoryChunkStore::new(vec![]);
        let result = retrieve(&store, &e, "anything", "proj-1", 5, 0.0).unwrap();
        assert!(result.chunks.is_empty());
    }
}

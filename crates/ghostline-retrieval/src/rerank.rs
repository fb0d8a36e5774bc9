//! Coverage-aware rerank and the keyword-overlap fallback (spec §4.4).

use std::collections::HashMap;

use ghostline_core::SourceChunk;

/// Alphanumeric tokens of length >= 3, lowercased. Shared by the rerank
/// overlap term and the keyword-overlap fallback so both score text the
/// same way.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 3)
        .map(|t| t.to_lowercase())
        .collect()
}

fn token_overlap(query_tokens: &[String], candidate_tokens: &[String]) -> f64 {
    if query_tokens.is_empty() {
        return 0.0;
    }
    let candidate_set: std::collections::HashSet<&str> =
        candidate_tokens.iter().map(|t| t.as_str()).collect();
    let query_set: std::collections::HashSet<&str> =
        query_tokens.iter().map(|t| t.as_str()).collect();
    let intersection = query_set.intersection(&candidate_set).count();
    intersection as f64 / query_set.len() as f64
}

/// A chunk paired with its raw similarity, ahead of rerank.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: SourceChunk,
    pub similarity: f64,
}

/// Greedy, coverage-aware selection of `top_k` chunks out of `candidates`,
/// penalizing repeated picks from the same source file so a single
/// dominant document cannot crowd out the rest of the context window.
pub fn coverage_rerank(candidates: Vec<ScoredChunk>, query: &str, top_k: usize) -> Vec<ScoredChunk> {
    if candidates.len() <= top_k {
        return candidates;
    }

    let query_tokens = tokenize(query);

    let mut filename_counts: HashMap<String, usize> = HashMap::new();
    for c in &candidates {
        *filename_counts.entry(c.chunk.filename.clone()).or_insert(0) += 1;
    }

    let base_scores: Vec<f64> = candidates
        .iter()
        .map(|c| {
            let overlap = token_overlap(&query_tokens, &tokenize(&c.chunk.content));
            let count = filename_counts.get(&c.chunk.filename).copied().unwrap_or(1);
            let dominance_penalty = 1.0 / (1.0 + (count.saturating_sub(1) as f64 / 3.0));
            0.75 * c.similarity + 0.20 * overlap + 0.05 * dominance_penalty
        })
        .collect();

    let mut remaining: Vec<usize> = (0..candidates.len()).collect();
    let mut picked_counts: HashMap<String, usize> = HashMap::new();
    let mut selected = Vec::with_capacity(top_k);

    while selected.len() < top_k && !remaining.is_empty() {
        let (best_pos, _) = remaining
            .iter()
            .enumerate()
            .map(|(pos, &idx)| {
                let filename = &candidates[idx].chunk.filename;
                let already_picked = picked_counts.get(filename).copied().unwrap_or(0);
                let repeat_penalty = 1.0 / (1.0 + already_picked as f64);
                (pos, base_scores[idx] * repeat_penalty)
            })
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .expect("remaining is non-empty");

        let idx = remaining.remove(best_pos);
        *picked_counts
            .entry(candidates[idx].chunk.filename.clone())
            .or_insert(0) += 1;
        selected.push(candidates[idx].clone());
    }

    selected
}

/// Used when the vector store is unavailable: scores every chunk in the
/// project purely by token overlap with the query, no embeddings involved.
pub fn keyword_overlap_rank(chunks: Vec<SourceChunk>, query: &str, top_k: usize) -> Vec<ScoredChunk> {
    let query_tokens = tokenize(query);
    let mut scored: Vec<ScoredChunk> = chunks
        .into_iter()
        .map(|chunk| {
            let similarity = token_overlap(&query_tokens, &tokenize(&chunk.content));
            ScoredChunk { chunk, similarity }
        })
        .collect();
    scored.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(filename: &str, content: &str) -> SourceChunk {
        SourceChunk::new("id", "proj", "mat", filename, content, 0, vec![0.0; 4])
    }

    #[test]
    fn coverage_rerank_is_noop_under_top_k() {
        let candidates = vec![ScoredChunk { chunk: chunk("a.txt", "alpha beta"), similarity: 0.9 }];
        let out = coverage_rerank(candidates.clone(), "alpha", 5);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn coverage_rerank_spreads_across_filenames() {
        let candidates = vec![
            ScoredChunk { chunk: chunk("dominant.txt", "castle dragon knight"), similarity: 0.95 },
            ScoredChunk { chunk: chunk("dominant.txt", "castle dragon sword"), similarity: 0.94 },
            ScoredChunk { chunk: chunk("dominant.txt", "castle dragon shield"), similarity: 0.93 },
            ScoredChunk { chunk: chunk("other.txt", "castle dragon legend"), similarity: 0.80 },
        ];
        let out = coverage_rerank(candidates, "castle dragon", 2);
        assert_eq!(out.len(), 2);
        let filenames: Vec<&str> = out.iter().map(|c| c.chunk.filename.as_str()).collect();
        assert!(filenames.contains(&"other.txt"), "repeat penalty should let a second file through: {filenames:?}");
    }

    #[test]
    fn keyword_overlap_rank_orders_by_overlap() {
        let chunks = vec![
            chunk("a.txt", "castle dragon knight"),
            chunk("b.txt", "nothing related here"),
        ];
        let out = keyword_overlap_rank(chunks, "castle dragon", 2);
        assert_eq!(out[0].chunk.filename, "a.txt");
    }
}

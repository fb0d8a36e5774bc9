//! Quote-bank sampling for the `revise` prompt (spec §4.10): candidate
//! verbatim quotes drawn from source material, to discourage the drafter
//! from inventing quotes under revision pressure.

use std::collections::HashSet;

use ghostline_retrieval::RetrievedChunk;

const MIN_WORDS: usize = 8;
const MAX_WORDS: usize = 25;
const MAX_ITEMS: usize = 20;

/// Splits chunk content into sentence-like spans, keeps the ones whose
/// word count falls in `[MIN_WORDS, MAX_WORDS]`, skips anything already
/// quoted, dedups, and returns at most `MAX_ITEMS` — in source order, so
/// the result is deterministic given the same retrieved chunks.
pub fn sample_quote_bank(chunks: &[RetrievedChunk], existing_quotes: &[String]) -> Vec<String> {
    let already: HashSet<String> = existing_quotes.iter().map(|q| q.trim().to_string()).collect();
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    'chunks: for chunk in chunks {
        for candidate in chunk.content.split(['.', '!', '?']) {
            let trimmed = candidate.trim();
            if trimmed.is_empty() {
                continue;
            }
            let word_count = trimmed.split_whitespace().count();
            if word_count < MIN_WORDS || word_count > MAX_WORDS {
                continue;
            }
            if already.contains(trimmed) || !seen.insert(trimmed.to_string()) {
                continue;
            }
            out.push(trimmed.to_string());
            if out.len() >= MAX_ITEMS {
                break 'chunks;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghostline_retrieval::ChunkCitation;

    fn chunk(content: &str) -> RetrievedChunk {
        RetrievedChunk {
            citation: ChunkCitation {
                filename: "a.txt".into(),
                source_material_id: "m".into(),
                chunk_index: 0,
            },
            content: content.to_string(),
            similarity: 0.9,
        }
    }

    #[test]
    fn keeps_only_sentences_in_word_range() {
        let chunks = vec![chunk(
            "Too short. This sentence has exactly the right number of words to qualify here. \
             This is an extremely long sentence that goes on and on and on and on well past the twenty five word ceiling we enforce.",
        )];
        let bank = sample_quote_bank(&chunks, &[]);
        assert_eq!(bank.len(), 1);
        assert!(bank[0].starts_with("This sentence"));
    }

    #[test]
    fn skips_existing_quotes_and_dedups() {
        let chunks = vec![
            chunk("This sentence has exactly the right number of words to qualify here ok."),
            chunk("This sentence has exactly the right number of words to qualify here ok."),
        ];
        let bank = sample_quote_bank(&chunks, &["This sentence has exactly the right number of words to qualify here ok".to_string()]);
        assert!(bank.is_empty());
    }

    #[test]
    fn caps_at_twenty_items() {
        let long_chunk = (0..30)
            .map(|i| format!("Sentence number {i} has exactly the right word count to qualify for the bank today"))
            .collect::<Vec<_>>()
            .join(". ");
        let bank = sample_quote_bank(&[chunk(&long_chunk)], &[]);
        assert_eq!(bank.len(), 20);
    }
}

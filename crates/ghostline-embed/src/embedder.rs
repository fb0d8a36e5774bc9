//! `Embedder` — normalizes backend output to the configured target
//! dimension (spec §4.3).

use crate::backend::{EmbeddingBackend, EmbeddingError};
use crate::cosine::cosine_similarity;

pub struct Embedder {
    backend: Box<dyn EmbeddingBackend>,
    target_dimension: usize,
    allow_dimension_mismatch: bool,
}

impl Embedder {
    pub fn new(backend: Box<dyn EmbeddingBackend>, target_dimension: usize, allow_dimension_mismatch: bool) -> Self {
        Self {
            backend,
            target_dimension,
            allow_dimension_mismatch,
        }
    }

    /// Empty text yields a zero vector without calling the backend.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Ok(vec![0.0; self.target_dimension]);
        }
        let raw = self.backend.embed(text)?;
        self.normalize(raw)
    }

    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let nonempty: Vec<(usize, String)> = texts
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.trim().is_empty())
            .map(|(i, t)| (i, t.clone()))
            .collect();

        let nonempty_texts: Vec<String> = nonempty.iter().map(|(_, t)| t.clone()).collect();
        let raws = self.backend.embed_batch(&nonempty_texts)?;

        let mut out = vec![vec![0.0f32; self.target_dimension]; texts.len()];
        for ((idx, _), raw) in nonempty.into_iter().zip(raws.into_iter()) {
            out[idx] = self.normalize(raw)?;
        }
        Ok(out)
    }

    fn normalize(&self, raw: Vec<f32>) -> Result<Vec<f32>, EmbeddingError> {
        use std::cmp::Ordering;
        match raw.len().cmp(&self.target_dimension) {
            Ordering::Equal => Ok(raw),
            Ordering::Greater => Ok(raw[..self.target_dimension].to_vec()),
            Ordering::Less => {
                if self.allow_dimension_mismatch {
                    let mut padded = raw;
                    padded.resize(self.target_dimension, 0.0);
                    Ok(padded)
                } else {
                    Err(EmbeddingError::DimensionMismatch {
                        got: raw.len(),
                        expected: self.target_dimension,
                    })
                }
            }
        }
    }

    pub fn similarity(&self, a: &[f32], b: &[f32]) -> f64 {
        cosine_similarity(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::HashEmbeddingBackend;

    fn embedder(dim: usize, allow_mismatch: bool) -> Embedder {
        Embedder::new(Box::new(HashEmbeddingBackend::new(8)), dim, allow_mismatch)
    }

    #[test]
    fn empty_text_is_zero_vector_without_backend_call() {
        let e = embedder(16, true);
        let v = e.embed("   ").unwrap();
        assert_eq!(v, vec![0.0; 16]);
    }

    #[test]
    fn short_backend_output_is_padded_when_allowed() {
        let e = embedder(16, true);
        let v = e.embed("hello world").unwrap();
        assert_eq!(v.len(), 16);
    }

    #[test]
    fn short_backend_output_errors_when_mismatch_disallowed() {
        let e = embedder(16, false);
        let err = e.embed("hello world").unwrap_err();
        assert!(matches!(err, EmbeddingError::DimensionMismatch { .. }));
    }

    #[test]
    fn batch_preserves_order_and_handles_empty_entries() {
        let e = embedder(8, true);
        let texts = vec!["a".to_string(), "".to_string(), "b".to_string()];
        let out = e.embed_batch(&texts).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[1], vec![0.0; 8]);
        assert_ne!(out[0], out[2]);
    }
}

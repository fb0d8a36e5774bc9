//! `HashEmbeddingBackend` — a deterministic, network-free stand-in for a
//! real embedding model, used in tests so similarity comparisons are
//! reproducible without a live backend (SPEC_FULL §4 C3).

use crate::backend::{EmbeddingBackend, EmbeddingError};

pub struct HashEmbeddingBackend {
    dimension: usize,
}

impl HashEmbeddingBackend {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl EmbeddingBackend for HashEmbeddingBackend {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut out = Vec::with_capacity(self.dimension);
        let mut counter: u64 = 0;
        while out.len() < self.dimension {
            let mut hasher = blake3::Hasher::new();
            hasher.update(text.as_bytes());
            hasher.update(&counter.to_le_bytes());
            let hash = hasher.finalize();
            for chunk in hash.as_bytes().chunks(4) {
                if out.len() >= self.dimension {
                    break;
                }
                let bytes: [u8; 4] = chunk.try_into().unwrap();
                let value = u32::from_le_bytes(bytes) as f32 / u32::MAX as f32;
                out.push(value * 2.0 - 1.0);
            }
            counter += 1;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_yields_same_vector() {
        let backend = HashEmbeddingBackend::new(32);
        assert_eq!(backend.embed("hello").unwrap(), backend.embed("hello").unwrap());
    }

    #[test]
    fn different_text_yields_different_vector() {
        let backend = HashEmbeddingBackend::new(32);
        assert_ne!(backend.embed("hello").unwrap(), backend.embed("goodbye").unwrap());
    }
}

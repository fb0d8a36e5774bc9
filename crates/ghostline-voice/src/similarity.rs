//! `compute_similarity` — combined stylometry + embedding voice score
//! (spec §4.6).

use ghostline_core::model::Stylometry;
use ghostline_embed::Embedder;

/// Per-feature weights for the weighted mean absolute difference, in the
/// same order as `Stylometry::as_vector`.
const FEATURE_WEIGHTS: [f64; 11] = [2.0, 1.0, 1.5, 2.0, 1.5, 1.0, 1.0, 1.0, 0.5, 0.5, 0.5];

/// Soft caps each raw feature is divided by before comparison; ratio
/// features (already 0-1) pass through with a cap of 1.0.
const FEATURE_CAPS: [f64; 11] = [30.0, 15.0, 10.0, 1.0, 1.0, 20.0, 1.0, 1.0, 10.0, 2.0, 10.0];

fn normalize(stylometry: &Stylometry) -> [f64; 11] {
    let raw = stylometry.as_vector();
    let mut out = [0.0; 11];
    for i in 0..11 {
        out[i] = (raw[i] / FEATURE_CAPS[i]).min(1.0);
    }
    out
}

pub struct VoiceSimilarityResult {
    pub overall: f64,
    pub stylometry_similarity: f64,
    pub embedding_similarity: f64,
    pub embedding_weight: f64,
    pub passes_threshold: bool,
}

fn stylometry_similarity(a: &Stylometry, b: &Stylometry) -> f64 {
    let va = normalize(a);
    let vb = normalize(b);
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for i in 0..11 {
        weighted_sum += FEATURE_WEIGHTS[i] * (va[i] - vb[i]).abs();
        weight_total += FEATURE_WEIGHTS[i];
    }
    let weighted_mean_abs_difference = weighted_sum / weight_total;
    (1.0 - weighted_mean_abs_difference).max(0.0)
}

/// `compute_similarity(text1, text2, embedding_weight, threshold)` per
/// spec §4.6, given pre-extracted stylometry for each text (extraction is
/// deterministic and cheap to run once per comparison by the caller).
pub fn compute_similarity(
    embedder: &Embedder,
    text1: &str,
    features1: &Stylometry,
    text2: &str,
    features2: &Stylometry,
    embedding_weight: f64,
    threshold: f64,
) -> Result<VoiceSimilarityResult, ghostline_embed::EmbeddingError> {
    let stylometry_sim = stylometry_similarity(features1, features2);

    let emb1 = embedder.embed(text1)?;
    let emb2 = embedder.embed(text2)?;
    let embedding_sim = embedder.similarity(&emb1, &emb2);

    let overall = embedding_weight * embedding_sim + (1.0 - embedding_weight) * stylometry_sim;

    Ok(VoiceSimilarityResult {
        overall,
        stylometry_similarity: stylometry_sim,
        embedding_similarity: embedding_sim,
        embedding_weight,
        passes_threshold: overall >= threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_features;
    use ghostline_embed::mock::HashEmbeddingBackend;

    fn embedder() -> Embedder {
        Embedder::new(Box::new(HashEmbeddingBackend::new(16)), 16, true)
    }

    #[test]
    fn identical_text_is_maximally_similar() {
        let e = embedder();
        let text = "The quiet morning settled over the valley. Birds called from the trees.";
        let features = extract_features(text);
        let result = compute_similarity(&e, text, &features, text, &features, 0.4, 0.85).unwrap();
        assert!((result.stylometry_similarity - 1.0).abs() < 1e-9);
        assert!((result.embedding_similarity - 1.0).abs() < 1e-6);
        assert!(result.passes_threshold);
    }

    #[test]
    fn very_different_style_lowers_score() {
        let e = embedder();
        let reference = "The quiet morning settled over the valley like a held breath.";
        let different = "BUY NOW!!! AMAZING DEAL!!! Act fast, limited time, huge savings!!!";
        let f1 = extract_features(reference);
        let f2 = extract_features(different);
        let result = compute_similarity(&e, reference, &f1, different, &f2, 0.4, 0.85).unwrap();
        assert!(result.overall < 1.0);
    }
}

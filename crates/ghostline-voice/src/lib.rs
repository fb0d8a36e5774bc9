//! # ghostline-voice
//!
//! C6 VoiceMetrics: deterministic stylometry feature extraction and the
//! numeric voice similarity score (spec §4.6). This replaces LLM-judged
//! voice scoring with a reproducible metric.

pub mod extract;
pub mod similarity;

pub use extract::extract_features;
pub use similarity::{compute_similarity, VoiceSimilarityResult};

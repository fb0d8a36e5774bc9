//! `VoiceProfile` — one per project, created by VoiceAnalyst from uploaded
//! writing samples; read-only thereafter.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stylometry {
    pub avg_sentence_length: f64,
    pub sentence_length_std: f64,
    pub avg_word_length: f64,
    pub vocabulary_complexity: f64,
    pub vocabulary_richness: f64,
    pub punctuation_density: f64,
    pub question_ratio: f64,
    pub exclamation_ratio: f64,
    pub comma_density: f64,
    pub semicolon_density: f64,
    pub avg_paragraph_length: f64,
}

impl Stylometry {
    /// The 11 features in the fixed order used for weighted comparison
    /// (see `ghostline-voice::compute_similarity`).
    pub fn as_vector(&self) -> [f64; 11] {
        [
            self.avg_sentence_length,
            self.sentence_length_std,
            self.avg_word_length,
            self.vocabulary_complexity,
            self.vocabulary_richness,
            self.punctuation_density,
            self.question_ratio,
            self.exclamation_ratio,
            self.comma_density,
            self.semicolon_density,
            self.avg_paragraph_length,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceProfile {
    pub project_id: String,
    pub embedding: Vec<f32>,
    pub stylometry: Stylometry,
    pub common_phrases: Vec<String>,
    pub sentence_starters: Vec<String>,
    pub transition_words: Vec<String>,
    pub similarity_threshold: f64,
    pub embedding_weight: f64,
    /// Raw writing samples, retained so later voice-edit passes can run
    /// the similarity comparison against the original text, not just the
    /// derived features.
    pub writing_samples: Vec<String>,
}

impl VoiceProfile {
    pub fn reference_text(&self) -> String {
        self.writing_samples.join("\n\n")
    }
}

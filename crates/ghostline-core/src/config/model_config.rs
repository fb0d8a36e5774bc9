//! Provider/model selection and fallback policy (spec §4.2, §6).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub primary_model: String,
    pub fallback_model: String,
    pub allow_fallback: bool,
    pub call_timeout_seconds: u64,
    pub embedding_dimension: usize,
    pub allow_dimension_mismatch: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            primary_model: "claude-sonnet-4-20250514".to_string(),
            fallback_model: "gpt-4o".to_string(),
            allow_fallback: true,
            call_timeout_seconds: 120,
            embedding_dimension: 1536,
            allow_dimension_mismatch: true,
        }
    }
}

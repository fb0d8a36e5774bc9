//! Aggregate configuration, grounded on `cortex-core::config::CortexConfig`'s
//! "one struct per subsystem, all `Default`-able, `#[serde(default)]` on the
//! aggregate" shape.

pub mod bounds;
pub mod env;
pub mod model_config;
pub mod strict_mode;

use serde::{Deserialize, Serialize};

pub use bounds::{ChapterBounds, OutlineBounds};
pub use model_config::ModelConfig;
pub use strict_mode::StrictModeConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub similarity_threshold: f64,
    pub rerank_enabled: bool,
    pub diversity_weight: f64,
    pub token_overlap_weight: f64,
    pub dominance_weight: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 20,
            similarity_threshold: 0.2,
            rerank_enabled: true,
            diversity_weight: 0.75,
            token_overlap_weight: 0.20,
            dominance_weight: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundingConfig {
    pub voice_threshold: f64,
    pub fact_threshold: f64,
    pub cohesion_threshold: f64,
    pub citation_quality_threshold: f64,
    pub destructive_sanitizer: bool,
}

impl Default for GroundingConfig {
    fn default() -> Self {
        Self {
            voice_threshold: 0.70,
            fact_threshold: 0.90,
            cohesion_threshold: 0.0,
            citation_quality_threshold: 0.99,
            destructive_sanitizer: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    pub strict_blocks_any_finding: bool,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            strict_blocks_any_finding: false,
        }
    }
}

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GhostlineConfig {
    pub strict_mode: StrictModeConfig,
    pub model: ModelConfig,
    pub retrieval: RetrievalConfig,
    pub grounding: GroundingConfig,
    pub safety: SafetyConfig,
    pub outline_bounds: OutlineBounds,
    pub chapter_bounds: ChapterBounds,
}

impl GhostlineConfig {
    /// Load config from a TOML string, falling back to defaults for
    /// missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Build config from the `GHOSTLINE_*` / `OPENAI_FALLBACK_MODEL`
    /// environment flags named in spec §6, layered over defaults.
    pub fn from_env() -> Self {
        env::from_env()
    }
}

//! Hard caps for the bounded subgraph loops (spec §4.9, §4.10, §5).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineBounds {
    pub max_turns: u32,
    pub max_tokens: u64,
    pub max_cost: f64,
    pub timeout_seconds: u64,
}

impl Default for OutlineBounds {
    fn default() -> Self {
        Self {
            max_turns: 4,
            max_tokens: 60_000,
            max_cost: 2.0,
            timeout_seconds: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChapterBounds {
    pub max_turns: u32,
    pub max_tokens: u64,
    pub max_cost: f64,
    pub timeout_seconds: u64,
}

impl Default for ChapterBounds {
    fn default() -> Self {
        Self {
            max_turns: 3,
            max_tokens: 120_000,
            max_cost: 5.0,
            timeout_seconds: 600,
        }
    }
}

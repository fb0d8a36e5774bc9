//! `GHOSTLINE_STRICT_MODE` (spec §6): disables placeholders, disables LLM
//! fallback, makes any agent/subgraph failure fatal, makes any
//! quality-gate failure fatal.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StrictModeConfig {
    pub enabled: bool,
}

impl StrictModeConfig {
    pub fn strict() -> Self {
        Self { enabled: true }
    }
}

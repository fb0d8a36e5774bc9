//! `AgentOutput<T>` and `AgentRole` — the shared contract every role
//! variant returns through (spec §4.5).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentRole {
    OutlinePlanner,
    OutlineCritic,
    ContentDrafter,
    VoiceEditor,
    FactChecker,
    CohesionAnalyst,
    VoiceAnalyst,
}

impl AgentRole {
    pub fn name(&self) -> &'static str {
        match self {
            AgentRole::OutlinePlanner => "OutlinePlanner",
            AgentRole::OutlineCritic => "OutlineCritic",
            AgentRole::ContentDrafter => "ContentDrafter",
            AgentRole::VoiceEditor => "VoiceEditor",
            AgentRole::FactChecker => "FactChecker",
            AgentRole::CohesionAnalyst => "CohesionAnalyst",
            AgentRole::VoiceAnalyst => "VoiceAnalyst",
        }
    }

    /// Default sampling temperature per spec §4.5.
    pub fn default_temperature(&self) -> f64 {
        match self {
            AgentRole::OutlinePlanner => 0.7,
            AgentRole::OutlineCritic => 0.4,
            AgentRole::ContentDrafter => 0.7,
            AgentRole::VoiceEditor => 0.5,
            AgentRole::FactChecker => 0.2,
            AgentRole::CohesionAnalyst => 0.2,
            AgentRole::VoiceAnalyst => 0.3,
        }
    }
}

/// `process(state) → AgentOutput` per spec §4.5. `structured_data` is
/// populated whenever the role's contract calls for a JSON payload;
/// `ContentDrafter`/`VoiceEditor` leave it `None` since their output is
/// prose, not structured data.
#[derive(Debug, Clone)]
pub struct AgentOutput<T> {
    pub content: String,
    pub structured_data: Option<T>,
    pub confidence: f64,
    pub reasoning: Option<String>,
    pub tokens_used: u32,
    pub estimated_cost: f64,
    pub duration_ms: u64,
    pub error: Option<String>,
}

impl<T> AgentOutput<T> {
    pub fn map_structured<U>(self, f: impl FnOnce(T) -> U) -> AgentOutput<U> {
        AgentOutput {
            content: self.content,
            structured_data: self.structured_data.map(f),
            confidence: self.confidence,
            reasoning: self.reasoning,
            tokens_used: self.tokens_used,
            estimated_cost: self.estimated_cost,
            duration_ms: self.duration_ms,
            error: self.error,
        }
    }
}

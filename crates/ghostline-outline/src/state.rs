//! `OutlineState` — threaded through the bounded Planner/Critic loop
//! (spec §4.9). Owned entirely by the subgraph; the orchestrator only
//! ever sees the returned `Outline` plus the terminal bookkeeping fields.

use ghostline_core::model::Outline;

#[derive(Debug, Clone)]
pub struct OutlineState {
    pub source_summaries: Vec<String>,
    pub title: String,
    pub description: String,
    pub target_chapters: u32,
    pub voice_guidance: String,

    pub current_outline: Option<Outline>,
    pub iteration: u32,
    pub feedback: Vec<String>,
    pub approved: bool,

    pub tokens_used: u64,
    pub cost_incurred: f64,
    pub turns: u32,
}

impl OutlineState {
    pub fn new(
        source_summaries: Vec<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        target_chapters: u32,
        voice_guidance: impl Into<String>,
    ) -> Self {
        Self {
            source_summaries,
            title: title.into(),
            description: description.into(),
            target_chapters,
            voice_guidance: voice_guidance.into(),
            current_outline: None,
            iteration: 0,
            feedback: Vec::new(),
            approved: false,
            tokens_used: 0,
            cost_incurred: 0.0,
            turns: 0,
        }
    }
}

//! `CallLog` — per-call record, append-only, the sole responsibility of
//! `ghostline-cost::CostLedger` to write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Provider {
    Anthropic,
    OpenAi,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::OpenAi => "openai",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CallType {
    Chat,
    Embedding,
}

impl CallType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::Chat => "chat",
            CallType::Embedding => "embedding",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallLog {
    pub agent_name: String,
    pub agent_role: Option<String>,
    pub model: String,
    pub provider: Provider,
    pub call_type: CallType,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub input_price_per_1k: f64,
    pub output_price_per_1k: f64,
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
    pub duration_ms: u64,
    pub success: bool,
    pub project_id: Option<String>,
    pub task_id: Option<String>,
    pub workflow_run_id: Option<String>,
    pub chapter_number: Option<u32>,
    pub is_fallback: bool,
    pub fallback_reason: Option<String>,
    pub prompt_preview: String,
    pub response_preview: String,
    pub error: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Truncates a preview string to at most 500 chars, matching the source
/// system's `prompt_preview[:500]` convention (spec §4.2).
pub fn preview(text: &str) -> String {
    const LIMIT: usize = 500;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        text.chars().take(LIMIT).collect()
    }
}

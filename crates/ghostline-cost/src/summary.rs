//! `CostFilter` / `CostSummary` — grounded on `cost_tracker.py`'s
//! `CostSummary` dataclass and `_get_summary` filter parameters.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default)]
pub struct CostFilter {
    pub task_id: Option<String>,
    pub project_id: Option<String>,
    pub workflow_run_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BucketTotals {
    pub calls: u64,
    pub tokens: u64,
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CostSummary {
    pub total_calls: u64,
    pub total_tokens: u64,
    pub total_cost: f64,
    pub by_model: HashMap<String, BucketTotals>,
    pub by_agent: HashMap<String, BucketTotals>,
    pub by_chapter: HashMap<String, BucketTotals>,
    pub by_provider: HashMap<String, BucketTotals>,
    pub avg_cost_per_call: f64,
    pub avg_tokens_per_call: f64,
    pub avg_duration_ms: f64,
    pub success_rate: f64,
}

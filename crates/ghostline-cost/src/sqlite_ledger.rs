//! SQLite-backed `CostLedger`, grounded on `cortex-drift-bridge::storage`'s
//! PRAGMA/migration conventions (WAL mode, `PRAGMA user_version`).

use std::sync::Mutex;

use ghostline_core::model::{CallLog, CallType, Provider};
use rusqlite::{params, Connection};
use tracing::{info, warn};

use crate::errors::CostResult;
use crate::ledger::CostLedger;
use crate::summary::{BucketTotals, CostFilter, CostSummary};

const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS llm_usage_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    agent_name TEXT NOT NULL,
    agent_role TEXT,
    model TEXT NOT NULL,
    provider TEXT NOT NULL,
    call_type TEXT NOT NULL,
    input_tokens INTEGER NOT NULL,
    output_tokens INTEGER NOT NULL,
    input_price_per_1k REAL NOT NULL,
    output_price_per_1k REAL NOT NULL,
    input_cost REAL NOT NULL,
    output_cost REAL NOT NULL,
    total_cost REAL NOT NULL,
    duration_ms INTEGER NOT NULL,
    success INTEGER NOT NULL,
    project_id TEXT,
    task_id TEXT,
    workflow_run_id TEXT,
    chapter_number INTEGER,
    is_fallback INTEGER NOT NULL,
    fallback_reason TEXT,
    prompt_preview TEXT NOT NULL,
    response_preview TEXT NOT NULL,
    error TEXT,
    metadata TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_llm_usage_logs_workflow ON llm_usage_logs(workflow_run_id);
CREATE INDEX IF NOT EXISTS idx_llm_usage_logs_project ON llm_usage_logs(project_id);
CREATE INDEX IF NOT EXISTS idx_llm_usage_logs_task ON llm_usage_logs(task_id);
"#;

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;")
}

pub struct SqliteCostLedger {
    conn: Mutex<Connection>,
}

impl SqliteCostLedger {
    pub fn open_in_memory() -> CostResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    pub fn open(path: &str) -> CostResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> CostResult<Self> {
        configure_connection(&conn)?;
        conn.execute_batch(SCHEMA_V1)?;
        info!("cost ledger schema ready");
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn insert(&self, call: &CallLog) -> rusqlite::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO llm_usage_logs (
                agent_name, agent_role, model, provider, call_type,
                input_tokens, output_tokens, input_price_per_1k, output_price_per_1k,
                input_cost, output_cost, total_cost, duration_ms, success,
                project_id, task_id, workflow_run_id, chapter_number,
                is_fallback, fallback_reason, prompt_preview, response_preview,
                error, metadata, created_at
            ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20,?21,?22,?23,?24,?25)",
            params![
                call.agent_name,
                call.agent_role,
                call.model,
                call.provider.as_str(),
                call.call_type.as_str(),
                call.input_tokens,
                call.output_tokens,
                call.input_price_per_1k,
                call.output_price_per_1k,
                call.input_cost,
                call.output_cost,
                call.total_cost,
                call.duration_ms as i64,
                call.success as i64,
                call.project_id,
                call.task_id,
                call.workflow_run_id,
                call.chapter_number,
                call.is_fallback as i64,
                call.fallback_reason,
                call.prompt_preview,
                call.response_preview,
                call.error,
                call.metadata.to_string(),
                call.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn query_summary(&self, filter: &CostFilter) -> rusqlite::Result<CostSummary> {
        let conn = self.conn.lock().unwrap();

        let mut clauses: Vec<String> = Vec::new();
        let mut bound: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(task_id) = &filter.task_id {
            clauses.push("task_id = ?".to_string());
            bound.push(Box::new(task_id.clone()));
        }
        if let Some(project_id) = &filter.project_id {
            clauses.push("project_id = ?".to_string());
            bound.push(Box::new(project_id.clone()));
        }
        if let Some(workflow_run_id) = &filter.workflow_run_id {
            clauses.push("workflow_run_id = ?".to_string());
            bound.push(Box::new(workflow_run_id.clone()));
        }
        if let Some(start) = &filter.start_date {
            clauses.push("created_at >= ?".to_string());
            bound.push(Box::new(start.to_rfc3339()));
        }
        if let Some(end) = &filter.end_date {
            clauses.push("created_at <= ?".to_string());
            bound.push(Box::new(end.to_rfc3339()));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let sql = format!(
            "SELECT model, provider, agent_name, chapter_number, input_tokens, output_tokens, \
             total_cost, duration_ms, success FROM llm_usage_logs {where_clause}"
        );

        let mut stmt = conn.prepare(&sql)?;
        let params_ref: Vec<&dyn rusqlite::ToSql> = bound.iter().map(|b| b.as_ref()).collect();

        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<i64>>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, f64>(6)?,
                row.get::<_, i64>(7)?,
                row.get::<_, i64>(8)?,
            ))
        })?;

        let mut summary = CostSummary::default();
        let mut total_duration: f64 = 0.0;
        let mut success_count: u64 = 0;

        for row in rows {
            let (model, provider, agent, chapter, in_tok, out_tok, cost, dur, success) = row?;
            let tokens = (in_tok + out_tok) as u64;

            summary.total_calls += 1;
            summary.total_tokens += tokens;
            summary.total_cost += cost;
            total_duration += dur as f64;
            if success != 0 {
                success_count += 1;
            }

            bump(&mut summary.by_model, &model, tokens, cost);
            bump(&mut summary.by_provider, &provider, tokens, cost);
            bump(&mut summary.by_agent, &agent, tokens, cost);
            let chapter_key = chapter
                .map(|c| c.to_string())
                .unwrap_or_else(|| "none".to_string());
            bump(&mut summary.by_chapter, &chapter_key, tokens, cost);
        }

        if summary.total_calls > 0 {
            let n = summary.total_calls as f64;
            summary.avg_cost_per_call = summary.total_cost / n;
            summary.avg_tokens_per_call = summary.total_tokens as f64 / n;
            summary.avg_duration_ms = total_duration / n;
            summary.success_rate = success_count as f64 / n;
        }

        Ok(summary)
    }
}

fn bump(map: &mut std::collections::HashMap<String, BucketTotals>, key: &str, tokens: u64, cost: f64) {
    let entry = map.entry(key.to_string()).or_default();
    entry.calls += 1;
    entry.tokens += tokens;
    entry.cost += cost;
}

impl CostLedger for SqliteCostLedger {
    fn record(&self, call: CallLog) {
        if let Err(e) = self.insert(&call) {
            warn!(error = %e, agent = call.agent_name, "cost ledger write failed; call not recorded");
        }
    }

    fn summary(&self, filter: &CostFilter) -> CostSummary {
        self.query_summary(filter).unwrap_or_else(|e| {
            warn!(error = %e, "cost ledger summary query failed; returning empty summary");
            CostSummary::default()
        })
    }
}

/// Reads a single row back by rowid, for tests verifying round-trip fidelity.
#[cfg(test)]
impl SqliteCostLedger {
    fn row_count(&self) -> i64 {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM llm_usage_logs", [], |r| r.get(0))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghostline_core::model::call_log::preview;
    use serde_json::json;

    fn sample_call(workflow_run_id: &str, model: &str, cost: f64) -> CallLog {
        CallLog {
            agent_name: "ContentDrafter".to_string(),
            agent_role: Some("drafter".to_string()),
            model: model.to_string(),
            provider: Provider::Anthropic,
            call_type: CallType::Chat,
            input_tokens: 1000,
            output_tokens: 500,
            input_price_per_1k: 0.003,
            output_price_per_1k: 0.015,
            input_cost: cost / 2.0,
            output_cost: cost / 2.0,
            total_cost: cost,
            duration_ms: 1200,
            success: true,
            project_id: Some("proj-1".to_string()),
            task_id: Some("task-1".to_string()),
            workflow_run_id: Some(workflow_run_id.to_string()),
            chapter_number: Some(1),
            is_fallback: false,
            fallback_reason: None,
            prompt_preview: preview("prompt"),
            response_preview: preview("response"),
            error: None,
            metadata: json!({}),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn cost_additivity_matches_summary() {
        let ledger = SqliteCostLedger::open_in_memory().unwrap();
        ledger.record(sample_call("run-1", "claude-sonnet-4-20250514", 0.10));
        ledger.record(sample_call("run-1", "claude-sonnet-4-20250514", 0.20));
        ledger.record(sample_call("run-2", "claude-sonnet-4-20250514", 99.0));

        let summary = ledger.summary(&CostFilter {
            workflow_run_id: Some("run-1".to_string()),
            ..Default::default()
        });

        assert_eq!(summary.total_calls, 2);
        assert!((summary.total_cost - 0.30).abs() < 1e-9);
        assert_eq!(ledger.row_count(), 3);
    }

    #[test]
    fn by_model_bucket_accumulates() {
        let ledger = SqliteCostLedger::open_in_memory().unwrap();
        ledger.record(sample_call("run-1", "claude-sonnet-4-20250514", 0.10));
        ledger.record(sample_call("run-1", "claude-3-opus-20240229", 0.50));

        let summary = ledger.summary(&CostFilter::default());
        assert_eq!(summary.by_model.len(), 2);
        assert_eq!(summary.by_model["claude-sonnet-4-20250514"].calls, 1);
    }
}

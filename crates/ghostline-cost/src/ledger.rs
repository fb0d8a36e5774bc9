//! `CostLedger` trait — the capability surface every caller depends on.
//! Implementations never propagate a storage failure to the caller; see
//! `SqliteCostLedger::record`.

use ghostline_core::model::CallLog;

use crate::summary::{CostFilter, CostSummary};

pub trait CostLedger: Send + Sync {
    /// Persists one call log row. Fails closed: a storage error is logged
    /// and swallowed, never returned (spec §4.1, §7).
    fn record(&self, call: CallLog);

    /// Aggregate summary over any subset of `{task_id, project_id,
    /// workflow_run_id, start_date, end_date}`.
    fn summary(&self, filter: &CostFilter) -> CostSummary;
}

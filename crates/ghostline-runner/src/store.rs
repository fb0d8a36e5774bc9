//! `TaskStore` — abstraction over wherever `Task` records are persisted,
//! mirroring `ghostline_retrieval::ChunkStore`'s injected-trait-object
//! shape so the runner stays storage-agnostic.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::{RunnerError, RunnerResult};
use crate::task::Task;

pub trait TaskStore: Send + Sync {
    fn insert(&self, task: Task) -> RunnerResult<()>;
    fn get(&self, task_id: &str) -> RunnerResult<Task>;
    fn update(&self, task: Task) -> RunnerResult<()>;

    /// Best-effort cooperative cancellation (spec §5: "the worker checks
    /// cancellation between nodes and raises"). Flips a flag the running
    /// job polls; it does not preempt an in-flight blocking call.
    fn request_cancel(&self, task_id: &str) -> RunnerResult<()>;
    fn is_cancel_requested(&self, task_id: &str) -> RunnerResult<bool>;
}

#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: Mutex<HashMap<String, Task>>,
    cancelled: Mutex<HashMap<String, bool>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn insert(&self, task: Task) -> RunnerResult<()> {
        self.tasks.lock().unwrap().insert(task.task_id.clone(), task);
        Ok(())
    }

    fn get(&self, task_id: &str) -> RunnerResult<Task> {
        self.tasks
            .lock()
            .unwrap()
            .get(task_id)
            .cloned()
            .ok_or_else(|| RunnerError::TaskNotFound(task_id.to_string()))
    }

    fn update(&self, task: Task) -> RunnerResult<()> {
        let mut guard = self.tasks.lock().unwrap();
        if !guard.contains_key(&task.task_id) {
            return Err(RunnerError::TaskNotFound(task.task_id));
        }
        guard.insert(task.task_id.clone(), task);
        Ok(())
    }

    fn request_cancel(&self, task_id: &str) -> RunnerResult<()> {
        self.cancelled.lock().unwrap().insert(task_id.to_string(), true);
        Ok(())
    }

    fn is_cancel_requested(&self, task_id: &str) -> RunnerResult<bool> {
        Ok(*self.cancelled.lock().unwrap().get(task_id).unwrap_or(&false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_task_id_errors() {
        let store = InMemoryTaskStore::new();
        assert!(matches!(store.get("missing"), Err(RunnerError::TaskNotFound(_))));
    }

    #[test]
    fn cancellation_flag_round_trips() {
        let store = InMemoryTaskStore::new();
        store.insert(Task::new("t1", "w1", "run1", "p1", "u1")).unwrap();
        assert!(!store.is_cancel_requested("t1").unwrap());
        store.request_cancel("t1").unwrap();
        assert!(store.is_cancel_requested("t1").unwrap());
    }

    #[test]
    fn update_mirrors_progress() {
        let store = InMemoryTaskStore::new();
        let mut task = Task::new("t1", "w1", "run1", "p1", "u1");
        store.insert(task.clone()).unwrap();
        task.progress = 42;
        store.update(task).unwrap();
        assert_eq!(store.get("t1").unwrap().progress, 42);
    }
}

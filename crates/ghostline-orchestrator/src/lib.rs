//! # ghostline-orchestrator
//!
//! C11 WorkflowOrchestrator: the top-level state machine with durable
//! checkpoints, pause/resume, and user-action gates (spec §4.11).

pub mod checkpoint;
pub mod errors;
pub mod orchestrator;

pub use checkpoint::{Checkpoint, CheckpointSaver, MemCheckpointSaver, SqliteCheckpointSaver};
pub use errors::{CheckpointError, CheckpointResult, OrchestratorError, OrchestratorResult};
pub use orchestrator::{IngestedSource, WorkflowAgents, WorkflowOrchestrator};

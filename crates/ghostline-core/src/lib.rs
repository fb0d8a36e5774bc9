//! # ghostline-core
//!
//! Shared data model, configuration, and cost-context plumbing for the
//! ghostline book-generation workflow core. Every other `ghostline-*` crate
//! depends on this one for its wire types; this crate depends on nothing
//! else in the workspace.
//!
//! ## Modules
//! - `model` — SourceChunk, VoiceProfile, Outline, Chapter, Citation,
//!   ClaimMapping, CanonBlock, WorkflowState, CallLog
//! - `config` — GhostlineConfig aggregating per-subsystem config structs
//! - `errors` — shared error types used at crate boundaries
//! - `cost_context` — the per-task cost context passed explicitly through
//!   the workflow (see spec §9: no process-global cost context)

pub mod config;
pub mod cost_context;
pub mod errors;
pub mod model;

pub use cost_context::CostContext;
pub use errors::CoreError;
pub use model::SourceChunk;

//! # ghostline-chapter
//!
//! C10 ChapterSubgraph: the bounded Draft/Voice/Fact/Cohesion/Revise loop
//! that produces one quality-gated chapter (spec §4.10).

pub mod errors;
pub mod quote_bank;
pub mod state;
pub mod subgraph;

pub use errors::{ChapterError, ChapterResult};
pub use state::ChapterState;
pub use subgraph::{run_chapter_subgraph, ChapterAgents, GroundingThresholds};

//! # ghostline-outline
//!
//! C9 OutlineSubgraph: the bounded Planner/Critic loop that produces an
//! approved book outline (spec §4.9).

pub mod errors;
pub mod state;
pub mod subgraph;

pub use errors::{OutlineError, OutlineResult};
pub use state::OutlineState;
pub use subgraph::run_outline_subgraph;

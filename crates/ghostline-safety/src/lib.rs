//! # ghostline-safety
//!
//! C8 SafetyScreener: crisis / medical-advice-overreach / trigger-topic
//! pattern screening over full book content (spec §4.8).

pub mod patterns;
pub mod screener;

pub use patterns::Severity;
pub use screener::{check_content, SafetyCheckResult};

//! Core data model (spec §3).

pub mod call_log;
pub mod chapter;
pub mod outline;
pub mod source;
pub mod voice;
pub mod workflow;

pub use call_log::{CallLog, CallType, Provider};
pub use chapter::{
    Chapter, Citation, CitationReport, ClaimMapping, QualityGateReport, RevisionEntry,
    RevisionReason,
};
pub use outline::{Outline, OutlineChapter};
pub use source::SourceChunk;
pub use voice::{Stylometry, VoiceProfile};
pub use workflow::{CanonBlock, Phase, PendingUserAction, SafetyFinding, WorkflowState};

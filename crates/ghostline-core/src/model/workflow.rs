//! `WorkflowState` — the tagged record persisted at every transition
//! (spec §3), and the per-chapter canon memory fed forward between
//! chapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chapter::Chapter;
use super::outline::Outline;
use super::voice::VoiceProfile;

/// `WorkflowState.phase` is a partial order; see `Phase::can_transition_to`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Phase {
    Ingest,
    Embed,
    OutlineGeneration,
    OutlineReview,
    ChapterDrafting,
    SafetyCheck,
    Finalize,
    Completed,
    Failed,
}

impl Phase {
    /// The forward-only order nodes normally advance through. Revisit is
    /// only legal within the bounded revise loops inside the subgraphs,
    /// which never surface as a `Phase` change at this level.
    const ORDER: [Phase; 9] = [
        Phase::Ingest,
        Phase::Embed,
        Phase::OutlineGeneration,
        Phase::OutlineReview,
        Phase::ChapterDrafting,
        Phase::SafetyCheck,
        Phase::Finalize,
        Phase::Completed,
        Phase::Failed,
    ];

    pub fn can_transition_to(self, next: Phase) -> bool {
        if next == Phase::Failed {
            return true;
        }
        let Some(from_idx) = Self::ORDER.iter().position(|p| *p == self) else {
            return false;
        };
        let Some(to_idx) = Self::ORDER.iter().position(|p| *p == next) else {
            return false;
        };
        to_idx >= from_idx
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PendingUserAction {
    ApproveOutline,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafetyFinding {
    pub category: String,
    pub severity: String,
    pub excerpt: String,
    pub detail: String,
}

/// Per-chapter grounded memory fed forward to the next chapter's drafter.
/// Append-only: later chapters never rewrite earlier canon (spec §9).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonBlock {
    pub chapter_number: u32,
    pub title: String,
    pub outline_summary: String,
    pub key_points: Vec<String>,
    pub grounded_commitments: Vec<String>,
    pub needs_review: Vec<String>,
    pub unsupported: Vec<String>,
    pub citations_ok: bool,
    pub style_issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowState {
    pub workflow_id: String,
    pub project_id: String,
    pub user_id: String,

    pub phase: Phase,
    pub progress: u8,

    pub source_summaries: Vec<String>,
    pub voice_profile: Option<VoiceProfile>,

    pub target_chapters: u32,
    pub target_pages: Option<u32>,
    pub target_words_per_chapter: u32,

    pub outline: Option<Outline>,
    pub outline_approved: bool,
    pub user_feedback: Vec<String>,

    pub chapters: Vec<Chapter>,
    pub chapter_summaries: Vec<String>,
    pub chapter_canon: Vec<CanonBlock>,

    pub total_tokens: u64,
    pub total_cost: f64,

    pub pending_user_action: Option<PendingUserAction>,

    pub safety_passed: bool,
    pub safety_findings: Vec<SafetyFinding>,
    pub suggested_disclaimer: Option<String>,

    pub conversation_log_path: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub error: Option<String>,
}

impl WorkflowState {
    pub fn new(
        workflow_id: impl Into<String>,
        project_id: impl Into<String>,
        user_id: impl Into<String>,
        target_chapters: u32,
        target_words_per_chapter: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            workflow_id: workflow_id.into(),
            project_id: project_id.into(),
            user_id: user_id.into(),
            phase: Phase::Ingest,
            progress: 0,
            source_summaries: Vec::new(),
            voice_profile: None,
            target_chapters,
            target_pages: None,
            target_words_per_chapter,
            outline: None,
            outline_approved: false,
            user_feedback: Vec::new(),
            chapters: Vec::new(),
            chapter_summaries: Vec::new(),
            chapter_canon: Vec::new(),
            total_tokens: 0,
            total_cost: 0.0,
            pending_user_action: None,
            safety_passed: false,
            safety_findings: Vec::new(),
            suggested_disclaimer: None,
            conversation_log_path: None,
            created_at: now,
            updated_at: now,
            error: None,
        }
    }

    /// Moves to `next`, validating the partial order (spec invariant).
    pub fn transition(&mut self, next: Phase) -> Result<(), crate::errors::CoreError> {
        if !self.phase.can_transition_to(next) {
            return Err(crate::errors::CoreError::InvalidTransition {
                from: format!("{:?}", self.phase),
                to: format!("{next:?}"),
            });
        }
        self.phase = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Last `n` canon blocks, in chapter order — what the drafter sees for
    /// coherence (spec §4.11 "previous canon blocks (last 3)").
    pub fn recent_canon(&self, n: usize) -> &[CanonBlock] {
        let len = self.chapter_canon.len();
        &self.chapter_canon[len.saturating_sub(n)..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_order_is_forward_only() {
        assert!(Phase::Ingest.can_transition_to(Phase::Embed));
        assert!(!Phase::Embed.can_transition_to(Phase::Ingest));
        assert!(Phase::ChapterDrafting.can_transition_to(Phase::Failed));
    }

    #[test]
    fn recent_canon_returns_last_n_in_order() {
        let mut state = WorkflowState::new("w1", "p1", "u1", 3, 2000);
        for i in 1..=5u32 {
            state.chapter_canon.push(CanonBlock {
                chapter_number: i,
                title: format!("c{i}"),
                outline_summary: String::new(),
                key_points: vec![],
                grounded_commitments: vec![],
                needs_review: vec![],
                unsupported: vec![],
                citations_ok: true,
                style_issues: vec![],
            });
        }
        let recent = state.recent_canon(3);
        let numbers: Vec<u32> = recent.iter().map(|c| c.chapter_number).collect();
        assert_eq!(numbers, vec![3, 4, 5]);
    }
}

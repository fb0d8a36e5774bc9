//! `ChapterState` — threaded through the bounded Draft/Voice/Fact/Cohesion
//! loop (spec §4.10).

use ghostline_core::model::{
    CanonBlock, Citation, CitationReport, ClaimMapping, OutlineChapter, QualityGateReport,
    RevisionEntry, VoiceProfile,
};
use ghostline_retrieval::RetrievedChunk;

#[derive(Debug, Clone)]
pub struct ChapterState {
    pub chapter_outline: OutlineChapter,
    pub source_chunks_with_citations: Vec<RetrievedChunk>,
    pub previous_summaries: Vec<String>,
    pub canon: Vec<CanonBlock>,
    pub voice_profile: Option<VoiceProfile>,
    pub voice_guidance: String,
    pub target_words: u32,
    pub grounding_required: bool,

    pub draft_content: String,
    pub edited_content: String,
    pub final_content: String,
    pub content_clean: String,

    pub citations: Vec<Citation>,
    pub revision_history: Vec<RevisionEntry>,
    pub quality_gates_passed: bool,
    pub quality_gate_report: QualityGateReport,

    pub voice_score: f64,
    pub fact_score: f64,
    pub cohesion_score: f64,
    pub voice_feedback: Option<String>,
    pub fact_feedback: Vec<String>,
    pub cohesion_feedback: Vec<String>,
    pub claim_mappings: Vec<ClaimMapping>,
    pub citation_report: CitationReport,

    pub iteration: u32,
    pub tokens_used: u64,
    pub cost_incurred: f64,
}

impl ChapterState {
    pub fn new(
        chapter_outline: OutlineChapter,
        source_chunks_with_citations: Vec<RetrievedChunk>,
        previous_summaries: Vec<String>,
        canon: Vec<CanonBlock>,
        voice_profile: Option<VoiceProfile>,
        voice_guidance: impl Into<String>,
        target_words: u32,
        grounding_required: bool,
    ) -> Self {
        Self {
            chapter_outline,
            source_chunks_with_citations,
            previous_summaries,
            canon,
            voice_profile,
            voice_guidance: voice_guidance.into(),
            target_words,
            grounding_required,
            draft_content: String::new(),
            edited_content: String::new(),
            final_content: String::new(),
            content_clean: String::new(),
            citations: Vec::new(),
            revision_history: Vec::new(),
            quality_gates_passed: false,
            quality_gate_report: QualityGateReport::default(),
            voice_score: 0.0,
            fact_score: 0.0,
            cohesion_score: 0.0,
            voice_feedback: None,
            fact_feedback: Vec::new(),
            cohesion_feedback: Vec::new(),
            claim_mappings: Vec::new(),
            citation_report: CitationReport::default(),
            iteration: 0,
            tokens_used: 0,
            cost_incurred: 0.0,
        }
    }

    pub fn record_usage(&mut self, tokens: u32, cost: f64) {
        self.tokens_used += tokens as u64;
        self.cost_incurred += cost;
    }
}

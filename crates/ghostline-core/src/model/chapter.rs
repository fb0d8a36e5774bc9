//! `Chapter` and the records it is built from — citations, claim mappings,
//! and the revision history accumulated across the ChapterSubgraph loop.

use serde::{Deserialize, Serialize};

/// Derived from a citation marker in chapter text and verified against
/// source text (spec §3, §4.7).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Citation {
    pub filename: String,
    pub quote: String,
    pub marker_start: usize,
    pub marker_end: usize,
    pub quote_start: Option<usize>,
    pub quote_end: Option<usize>,
    pub verified: bool,
    pub source_material_id: Option<String>,
}

/// Produced by FactChecker; used by canon memory for subsequent chapters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClaimMapping {
    pub claim: String,
    pub source_filename: Option<String>,
    pub quote: Option<String>,
    pub quote_verified: bool,
    pub is_supported: bool,
    pub needs_human_review: bool,
    pub confidence: f64,
}

/// Deterministic output of `GroundingVerifier::verify_inline_citations`,
/// stored alongside the chapter so the decision can be audited without
/// recomputation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CitationReport {
    pub inline_total: u32,
    pub inline_parsed: u32,
    pub inline_invalid_format: u32,
    pub inline_verified: u32,
    pub inline_unverified: u32,
    pub inline_quality: f64,
    pub citations: Vec<Citation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct QualityGateReport {
    pub voice_ok: bool,
    pub citations_ok: bool,
    pub style_ok: bool,
    pub style_issues: Vec<String>,
    pub passed: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RevisionReason {
    Voice,
    Fact,
    Cohesion,
    Citations,
    Style,
    MaxTurnsReached,
    Finalize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevisionEntry {
    pub iteration: u32,
    pub reasons: Vec<RevisionReason>,
    pub voice_score: Option<f64>,
    pub fact_score: Option<f64>,
    pub cohesion_score: Option<f64>,
    pub style_issues: Vec<String>,
    pub feedback: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chapter {
    pub number: u32,
    pub title: String,
    /// Chapter prose including inline `[citation: ...]` markers.
    pub content_raw: String,
    /// Chapter prose with markers stripped and whitespace normalized.
    pub content_clean: String,
    pub word_count: u32,
    pub voice_score: f64,
    pub fact_score: f64,
    pub cohesion_score: f64,
    pub citations: Vec<Citation>,
    pub citation_report: CitationReport,
    pub quality_gates_passed: bool,
    pub quality_gate_report: QualityGateReport,
    pub revision_history: Vec<RevisionEntry>,
}

//! Role-specialized prompts and output types (spec §4.5). Every function
//! here is a thin, typed wrapper over `Agent::invoke_text`/`invoke_json` —
//! the shared machinery lives in `agent.rs` and `parse.rs`.

use ghostline_core::cost_context::CostContext;
use ghostline_core::model::{CanonBlock, ClaimMapping, Outline, OutlineChapter, VoiceProfile};
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::errors::AgentResult;
use crate::output::AgentOutput;

const DEFAULT_MAX_TOKENS: u32 = 8192;

// ── OutlinePlanner ──────────────────────────────────────────────────────

pub struct OutlinePlannerInput<'a> {
    pub source_summaries: &'a [String],
    pub title: &'a str,
    pub description: &'a str,
    pub target_chapters: u32,
    pub voice_guidance: &'a str,
    pub prior_outline: Option<&'a Outline>,
    pub feedback: Option<&'a [String]>,
}

pub fn plan_outline(
    agent: &Agent,
    input: &OutlinePlannerInput,
    cost_ctx: &CostContext,
) -> AgentResult<AgentOutput<Outline>> {
    let system_prompt = "You are an OutlinePlanner for a long-form nonfiction book. \
        Respond with a single JSON object matching the Outline schema: \
        {title, premise, chapters: [{number, title, summary, key_points, estimated_words}], themes, target_audience}.";

    let mut user_prompt = format!(
        "Title: {}\nDescription: {}\nTarget chapters: {}\nVoice guidance: {}\nSource summaries:\n{}",
        input.title,
        input.description,
        input.target_chapters,
        input.voice_guidance,
        input.source_summaries.join("\n- "),
    );
    if let Some(prior) = input.prior_outline {
        user_prompt.push_str(&format!(
            "\n\nPrior outline (revise, do not discard): {}",
            serde_json::to_string(prior).unwrap_or_default()
        ));
    }
    if let Some(feedback) = input.feedback {
        user_prompt.push_str(&format!("\n\nCritic feedback to address:\n- {}", feedback.join("\n- ")));
    }

    agent.invoke_json(system_prompt, &user_prompt, DEFAULT_MAX_TOKENS, cost_ctx)
}

// ── OutlineCritic ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineCritique {
    pub approved: bool,
    pub feedback: Vec<String>,
}

pub fn critique_outline(
    agent: &Agent,
    outline: &Outline,
    cost_ctx: &CostContext,
) -> AgentResult<AgentOutput<OutlineCritique>> {
    let system_prompt = "You are an OutlineCritic. Review the outline for coherence, pacing, and \
        coverage of the stated themes. Respond with JSON: {approved, feedback: [string]}. \
        feedback should be empty when approved is true.";
    let user_prompt = serde_json::to_string_pretty(outline).unwrap_or_default();
    agent.invoke_json(system_prompt, &user_prompt, DEFAULT_MAX_TOKENS, cost_ctx)
}

// ── ContentDrafter ──────────────────────────────────────────────────────

pub fn draft_chapter(
    agent: &Agent,
    chapter: &OutlineChapter,
    context_text: &str,
    canon: &[CanonBlock],
    voice_guidance: &str,
    grounding_required: bool,
    cost_ctx: &CostContext,
) -> AgentResult<AgentOutput<()>> {
    let system_prompt = "You are a ContentDrafter writing one chapter of a book. Write chapter \
        markdown prose, not JSON. Every factual claim drawn from the provided source material must \
        carry an inline citation marker in the form [citation: <filename> - \"<exact quote>\"]. \
        Do not fabricate quotes or filenames that are not present in the source material below.";

    let canon_summary: String = canon
        .iter()
        .map(|c| format!("Chapter {}: {}", c.chapter_number, c.outline_summary))
        .collect::<Vec<_>>()
        .join("\n");

    let user_prompt = format!(
        "Chapter {}: {}\nSummary: {}\nKey points:\n- {}\nTarget words: {}\nVoice guidance: {}\n\
        Grounding required: {}\n\nPrevious chapters:\n{}\n\nSource material:\n{}",
        chapter.number,
        chapter.title,
        chapter.summary,
        chapter.key_points.join("\n- "),
        chapter.estimated_words,
        voice_guidance,
        grounding_required,
        canon_summary,
        context_text,
    );

    agent.invoke_text(system_prompt, &user_prompt, DEFAULT_MAX_TOKENS, cost_ctx)
}

// ── VoiceEditor ─────────────────────────────────────────────────────────

pub fn edit_voice(
    agent: &Agent,
    content: &str,
    voice_profile: &VoiceProfile,
    cost_ctx: &CostContext,
) -> AgentResult<AgentOutput<()>> {
    let system_prompt = "You are a VoiceEditor. Rewrite the chapter so its prose matches the \
        author's voice profile, without altering facts, removing citation markers, or changing the \
        meaning of any cited claim. Return the edited chapter markdown only.";

    let user_prompt = format!(
        "Voice profile:\ncommon phrases: {}\nsentence starters: {}\ntransition words: {}\n\
        similarity threshold: {}\n\nReference samples:\n{}\n\nChapter to edit:\n{}",
        voice_profile.common_phrases.join(", "),
        voice_profile.sentence_starters.join(", "),
        voice_profile.transition_words.join(", "),
        voice_profile.similarity_threshold,
        voice_profile.reference_text(),
        content,
    );

    agent.invoke_text(system_prompt, &user_prompt, DEFAULT_MAX_TOKENS, cost_ctx)
}

// ── FactChecker ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactCheckResult {
    pub accuracy_score: f64,
    pub summary: String,
    pub findings: Vec<String>,
    pub unsupported_claims: Vec<String>,
    pub low_confidence_citations: Vec<String>,
    pub claim_mappings: Vec<ClaimMapping>,
}

pub fn check_facts(
    agent: &Agent,
    content: &str,
    context_text: &str,
    cost_ctx: &CostContext,
) -> AgentResult<AgentOutput<FactCheckResult>> {
    let system_prompt = "You are a FactChecker. Compare every cited claim in the chapter against \
        the source material. Respond with JSON: {accuracy_score (0-1), summary, findings: [string], \
        unsupported_claims: [string], low_confidence_citations: [string], claim_mappings: \
        [{claim, source_filename, quote, quote_verified, is_supported, needs_human_review, confidence}]}.";
    let user_prompt = format!("Source material:\n{}\n\nChapter:\n{}", context_text, content);
    agent.invoke_json(system_prompt, &user_prompt, DEFAULT_MAX_TOKENS, cost_ctx)
}

// ── CohesionAnalyst ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohesionResult {
    pub cohesion_score: f64,
    pub issues: Vec<String>,
    pub strengths: Vec<String>,
    pub summary: String,
}

pub fn analyze_cohesion(
    agent: &Agent,
    content: &str,
    previous_summaries: &[String],
    outline_context: &str,
    cost_ctx: &CostContext,
) -> AgentResult<AgentOutput<CohesionResult>> {
    let system_prompt = "You are a CohesionAnalyst. Judge how well this chapter flows from the \
        chapters before it and fits the surrounding outline. Respond with JSON: {cohesion_score (0-1), \
        issues: [string], strengths: [string], summary}.";
    let user_prompt = format!(
        "Previous chapter summaries:\n{}\n\nOutline context:\n{}\n\nChapter:\n{}",
        previous_summaries.join("\n"),
        outline_context,
        content,
    );
    agent.invoke_json(system_prompt, &user_prompt, DEFAULT_MAX_TOKENS, cost_ctx)
}

// ── VoiceAnalyst ────────────────────────────────────────────────────────

/// The LLM-derived half of a `VoiceProfile`; the embedding and stylometry
/// feature vector are computed deterministically by `ghostline-voice` and
/// merged in by the caller, not produced by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceAnalysis {
    pub common_phrases: Vec<String>,
    pub sentence_starters: Vec<String>,
    pub transition_words: Vec<String>,
    pub style_description: String,
}

pub fn analyze_voice(
    agent: &Agent,
    writing_samples: &[String],
    cost_ctx: &CostContext,
) -> AgentResult<AgentOutput<VoiceAnalysis>> {
    let system_prompt = "You are a VoiceAnalyst. Read the writing samples and identify the \
        author's recurring phrases, characteristic sentence openers, and transition words. Respond \
        with JSON: {common_phrases: [string], sentence_starters: [string], transition_words: [string], \
        style_description: string}.";
    let user_prompt = writing_samples.join("\n\n---\n\n");
    agent.invoke_json(system_prompt, &user_prompt, DEFAULT_MAX_TOKENS, cost_ctx)
}

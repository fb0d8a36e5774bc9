//! `START → draft → voice_edit → fact_check → cohesion_check →
//! [revise → voice_edit → fact_check → cohesion_check]* → finalize → END`
//! (spec §4.10).

use ghostline_agents::roles::{analyze_cohesion, check_facts, draft_chapter, edit_voice};
use ghostline_agents::Agent;
use ghostline_core::config::ChapterBounds;
use ghostline_core::cost_context::CostContext;
use ghostline_core::model::{RevisionEntry, RevisionReason, SourceChunk};
use ghostline_embed::Embedder;
use ghostline_grounding::{compute_style_issues, evaluate_quality_gate, sanitize_grounding, strip_markers_and_normalize, verify_inline_citations};
use ghostline_retrieval::RAGResult;
use ghostline_voice::extract_features;
use tracing::warn;

use crate::errors::ChapterResult;
use crate::quote_bank::sample_quote_bank;
use crate::state::ChapterState;

pub struct ChapterAgents<'a> {
    pub drafter: &'a Agent,
    pub voice_editor: &'a Agent,
    pub fact_checker: &'a Agent,
    pub cohesion_analyst: &'a Agent,
}

#[derive(Debug, Clone, Copy)]
pub struct GroundingThresholds {
    pub voice_threshold: f64,
    pub fact_threshold: f64,
    pub cohesion_threshold: f64,
}

const CONTEXT_MAX_TOKENS: usize = 16_000;

fn context_text(state: &ChapterState) -> String {
    let rag = RAGResult {
        chunks: state.source_chunks_with_citations.clone(),
        fell_back_to_keyword_search: false,
    };
    rag.build_context(CONTEXT_MAX_TOKENS, true)
}

fn chunks_for_verification(state: &ChapterState) -> Vec<SourceChunk> {
    state
        .source_chunks_with_citations
        .iter()
        .map(|rc| {
            SourceChunk::new(
                format!("{}-{}", rc.citation.source_material_id, rc.citation.chunk_index),
                "",
                rc.citation.source_material_id.clone(),
                rc.citation.filename.clone(),
                rc.content.clone(),
                rc.citation.chunk_index,
                Vec::new(),
            )
        })
        .collect()
}

fn node_draft(state: &mut ChapterState, agents: &ChapterAgents, cost_ctx: &CostContext) -> ChapterResult<()> {
    let context = context_text(state);
    let output = draft_chapter(
        agents.drafter,
        &state.chapter_outline,
        &context,
        &state.canon,
        &state.voice_guidance,
        state.grounding_required,
        cost_ctx,
    )?;
    state.record_usage(output.tokens_used, output.estimated_cost);
    state.draft_content = output.content;
    state.edited_content = state.draft_content.clone();
    Ok(())
}

fn node_voice_edit(state: &mut ChapterState, agents: &ChapterAgents, embedder: &Embedder, thresholds: &GroundingThresholds, cost_ctx: &CostContext) -> ChapterResult<()> {
    let Some(profile) = state.voice_profile.clone() else {
        // No writing samples on file: voice is not assessed, and the
        // drafted content stands as-is (spec §4.10 voice_edit).
        state.voice_score = 1.0;
        state.voice_feedback = None;
        return Ok(());
    };

    let reference_text = profile.reference_text();
    let candidate_features = extract_features(&state.edited_content);
    let similarity = ghostline_voice::compute_similarity(
        embedder,
        &reference_text,
        &profile.stylometry,
        &state.edited_content,
        &candidate_features,
        profile.embedding_weight,
        thresholds.voice_threshold,
    )?;

    if similarity.passes_threshold {
        state.voice_score = similarity.overall;
        state.voice_feedback = None;
        return Ok(());
    }

    let output = edit_voice(agents.voice_editor, &state.edited_content, &profile, cost_ctx)?;
    state.record_usage(output.tokens_used, output.estimated_cost);

    let edited_features = extract_features(&output.content);
    let recomputed = ghostline_voice::compute_similarity(
        embedder,
        &reference_text,
        &profile.stylometry,
        &output.content,
        &edited_features,
        profile.embedding_weight,
        thresholds.voice_threshold,
    )?;

    state.edited_content = output.content;
    state.voice_score = recomputed.overall;
    state.voice_feedback = if recomputed.passes_threshold {
        None
    } else {
        Some(format!(
            "voice similarity {:.2} still below threshold {:.2} after one edit pass",
            recomputed.overall, thresholds.voice_threshold
        ))
    };
    Ok(())
}

fn node_fact_check(state: &mut ChapterState, agents: &ChapterAgents, cost_ctx: &CostContext) -> ChapterResult<()> {
    let context = context_text(state);
    let output = check_facts(agents.fact_checker, &state.edited_content, &context, cost_ctx)?;
    state.record_usage(output.tokens_used, output.estimated_cost);

    match output.structured_data {
        Some(result) => {
            state.fact_score = result.accuracy_score;
            state.fact_feedback = result.findings;
            state.claim_mappings = result.claim_mappings;
        }
        None => {
            // ContentParseError exception for FactChecker (spec §7):
            // fact_score=0, error feedback string set, never raise.
            state.fact_score = 0.0;
            state.fact_feedback = vec![output.error.unwrap_or_else(|| "could not parse fact-check response".to_string())];
            state.claim_mappings = Vec::new();
        }
    }

    let verification_chunks = chunks_for_verification(state);
    state.citation_report = verify_inline_citations(&state.edited_content, &verification_chunks);
    Ok(())
}

fn node_cohesion_check(state: &mut ChapterState, agents: &ChapterAgents, outline_context: &str, cost_ctx: &CostContext) -> ChapterResult<()> {
    let output = analyze_cohesion(agents.cohesion_analyst, &state.edited_content, &state.previous_summaries, outline_context, cost_ctx)?;
    state.record_usage(output.tokens_used, output.estimated_cost);

    match output.structured_data {
        Some(result) => {
            state.cohesion_score = result.cohesion_score;
            state.cohesion_feedback = result.issues;
        }
        None => {
            // ContentParseError default (spec §7): {cohesion_score: 0.5, issues: [], summary: "Could not parse"}.
            state.cohesion_score = 0.5;
            state.cohesion_feedback = Vec::new();
        }
    }
    Ok(())
}

struct RevisionOks {
    voice_ok: bool,
    fact_ok: bool,
    cohesion_ok: bool,
    citations_ok: bool,
    style_ok: bool,
}

fn evaluate_oks(state: &ChapterState, thresholds: &GroundingThresholds) -> (RevisionOks, Vec<String>) {
    let style_issues = compute_style_issues(&state.edited_content);
    let gate = evaluate_quality_gate(state.voice_score, thresholds.voice_threshold, &state.citation_report, style_issues.clone());
    let oks = RevisionOks {
        voice_ok: gate.voice_ok,
        fact_ok: state.fact_score >= thresholds.fact_threshold,
        cohesion_ok: state.cohesion_score >= thresholds.cohesion_threshold,
        citations_ok: gate.citations_ok,
        style_ok: gate.style_ok,
    };
    (oks, style_issues)
}

fn should_revise(state: &ChapterState, thresholds: &GroundingThresholds, bounds: &ChapterBounds) -> (bool, RevisionOks, Vec<String>) {
    let (oks, style_issues) = evaluate_oks(state, thresholds);
    let all_ok = oks.voice_ok && oks.fact_ok && oks.cohesion_ok && oks.citations_ok && oks.style_ok;
    let done = state.iteration >= bounds.max_turns || all_ok;
    (!done, oks, style_issues)
}

fn revision_reasons(oks: &RevisionOks) -> Vec<RevisionReason> {
    let mut reasons = Vec::new();
    if !oks.voice_ok {
        reasons.push(RevisionReason::Voice);
    }
    if !oks.fact_ok {
        reasons.push(RevisionReason::Fact);
    }
    if !oks.cohesion_ok {
        reasons.push(RevisionReason::Cohesion);
    }
    if !oks.citations_ok {
        reasons.push(RevisionReason::Citations);
    }
    if !oks.style_ok {
        reasons.push(RevisionReason::Style);
    }
    reasons
}

fn compose_revision_prompt(state: &ChapterState, style_issues: &[String]) -> String {
    let existing_quotes: Vec<String> = state.citation_report.citations.iter().map(|c| c.quote.clone()).collect();
    let quote_bank = sample_quote_bank(&state.source_chunks_with_citations, &existing_quotes);

    let mut prompt = String::new();
    prompt.push_str(
        "Revise the chapter below. Hard constraints: do not invent facts or quotes; use at most \
        3 level-2 headings; do not name any framework (e.g. \"XYZ Framework\"); do not use em-dashes, \
        en-dashes, or double hyphens; every factual claim must carry a verbatim-quoted citation marker \
        in the form [citation: <filename> - \"<exact quote>\"].\n\n",
    );
    prompt.push_str(&format!("Voice guidance: {}\n\n", state.voice_guidance));
    prompt.push_str(&format!("Source material:\n{}\n\n", context_text(state)));
    if !quote_bank.is_empty() {
        prompt.push_str("Quote bank (verbatim candidates you may cite, do not alter wording):\n");
        for q in &quote_bank {
            prompt.push_str(&format!("- \"{q}\"\n"));
        }
        prompt.push('\n');
    }
    if let Some(feedback) = &state.voice_feedback {
        prompt.push_str(&format!("Voice feedback: {feedback}\n"));
    }
    if !state.fact_feedback.is_empty() {
        prompt.push_str(&format!("Fact-check feedback:\n- {}\n", state.fact_feedback.join("\n- ")));
    }
    if !state.cohesion_feedback.is_empty() {
        prompt.push_str(&format!("Cohesion feedback:\n- {}\n", state.cohesion_feedback.join("\n- ")));
    }
    if !style_issues.is_empty() {
        prompt.push_str(&format!("Style issues to fix:\n- {}\n", style_issues.join("\n- ")));
    }
    prompt.push_str(&format!("\nChapter to revise:\n{}\n", state.edited_content));
    prompt
}

fn node_revise(state: &mut ChapterState, agents: &ChapterAgents, style_issues: &[String], cost_ctx: &CostContext) -> ChapterResult<()> {
    let system_prompt = "You are a ContentDrafter revising one chapter of a book to satisfy the \
        listed feedback and hard constraints. Return chapter markdown prose only.";
    let user_prompt = compose_revision_prompt(state, style_issues);
    let output = agents.drafter.invoke_text(system_prompt, &user_prompt, 8192, cost_ctx)?;
    state.record_usage(output.tokens_used, output.estimated_cost);
    state.edited_content = output.content;
    Ok(())
}

fn node_finalize(state: &mut ChapterState, destructive_sanitizer: bool, thresholds: &GroundingThresholds) {
    state.final_content = sanitize_grounding(&state.edited_content, destructive_sanitizer);
    let verification_chunks = chunks_for_verification(state);
    state.citation_report = verify_inline_citations(&state.final_content, &verification_chunks);
    state.citations = state.citation_report.citations.clone();
    state.content_clean = strip_markers_and_normalize(&state.final_content);

    let style_issues = compute_style_issues(&state.final_content);
    state.quality_gate_report = evaluate_quality_gate(state.voice_score, thresholds.voice_threshold, &state.citation_report, style_issues);
    state.quality_gates_passed = state.quality_gate_report.passed;

    state.revision_history.push(RevisionEntry {
        iteration: state.iteration,
        reasons: vec![RevisionReason::Finalize],
        voice_score: Some(state.voice_score),
        fact_score: Some(state.fact_score),
        cohesion_score: Some(state.cohesion_score),
        style_issues: state.quality_gate_report.style_issues.clone(),
        feedback: Vec::new(),
    });
}

/// Runs the full bounded Draft/Voice/Fact/Cohesion/Revise loop to a
/// terminal `ChapterState`. Never returns an `Err` for quality-gate
/// failures — those are recorded in `quality_gates_passed` and
/// `revision_history`; only agent/embedding call failures propagate.
pub fn run_chapter_subgraph(
    agents: &ChapterAgents,
    embedder: &Embedder,
    mut state: ChapterState,
    outline_context: &str,
    thresholds: &GroundingThresholds,
    bounds: &ChapterBounds,
    destructive_sanitizer: bool,
    cost_ctx: &CostContext,
) -> ChapterResult<ChapterState> {
    node_draft(&mut state, agents, cost_ctx)?;
    state.iteration = 1;

    node_voice_edit(&mut state, agents, embedder, thresholds, cost_ctx)?;
    node_fact_check(&mut state, agents, cost_ctx)?;
    node_cohesion_check(&mut state, agents, outline_context, cost_ctx)?;

    loop {
        let (needs_revise, oks, style_issues) = should_revise(&state, thresholds, bounds);
        if !needs_revise {
            break;
        }
        if state.iteration >= bounds.max_turns {
            warn!(iteration = state.iteration, "chapter subgraph hit max_turns without passing all gates");
            break;
        }

        state.revision_history.push(RevisionEntry {
            iteration: state.iteration,
            reasons: revision_reasons(&oks),
            voice_score: Some(state.voice_score),
            fact_score: Some(state.fact_score),
            cohesion_score: Some(state.cohesion_score),
            style_issues: style_issues.clone(),
            feedback: state
                .fact_feedback
                .iter()
                .chain(state.cohesion_feedback.iter())
                .cloned()
                .collect(),
        });

        node_revise(&mut state, agents, &style_issues, cost_ctx)?;
        state.iteration += 1;

        node_voice_edit(&mut state, agents, embedder, thresholds, cost_ctx)?;
        node_fact_check(&mut state, agents, cost_ctx)?;
        node_cohesion_check(&mut state, agents, outline_context, cost_ctx)?;

        if state.tokens_used >= bounds.max_tokens || state.cost_incurred >= bounds.max_cost {
            warn!("chapter subgraph hit token/cost bound; finalizing best-effort output");
            break;
        }
    }

    node_finalize(&mut state, destructive_sanitizer, thresholds);
    Ok(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ghostline_core::config::ModelConfig;
    use ghostline_core::model::{OutlineChapter, Provider as ModelProviderKind};
    use ghostline_cost::{CostLedger, SqliteCostLedger};
    use ghostline_embed::mock::HashEmbeddingBackend;
    use ghostline_modelclient::mock::MockProvider;
    use ghostline_modelclient::ModelClient;
    use ghostline_retrieval::ChunkCitation;

    use super::*;
    use ghostline_agents::AgentRole;

    fn agent(name: &str, role: AgentRole, response: &str) -> Agent {
        let ledger: Arc<dyn CostLedger> = Arc::new(SqliteCostLedger::open_in_memory().unwrap());
        let client = ModelClient::new(
            Arc::new(MockProvider::succeeding(ModelProviderKind::Anthropic, response)),
            None,
            ModelConfig::default(),
            ledger,
            false,
        );
        Agent::new(name, role, client)
    }

    fn base_state(draft_voice_profile: Option<ghostline_core::model::VoiceProfile>) -> ChapterState {
        let chunk = RetrievedChunk {
            citation: ChunkCitation {
                filename: "source.txt".into(),
                source_material_id: "mat-1".into(),
                chunk_index: 0,
            },
            content: "The sky is blue over the valley.".to_string(),
            similarity: 0.9,
        };
        ChapterState::new(
            OutlineChapter {
                number: 1,
                title: "Opening".into(),
                summary: "An opening chapter.".into(),
                key_points: vec![],
                estimated_words: 500,
            },
            vec![chunk],
            vec![],
            vec![],
            draft_voice_profile,
            "plainspoken",
            500,
            true,
        )
    }

    fn embedder() -> Embedder {
        Embedder::new(Box::new(HashEmbeddingBackend::new(16)), 16, true)
    }

    #[test]
    fn passes_all_gates_on_first_draft() {
        let drafter = agent(
            "Drafter",
            AgentRole::ContentDrafter,
            r#"The sky is blue [citation: source.txt - "the sky is blue"] over the valley."#,
        );
        let voice_editor = agent("VoiceEditor", AgentRole::VoiceEditor, "edited");
        let fact_checker = agent(
            "FactChecker",
            AgentRole::FactChecker,
            r#"{"accuracy_score": 0.95, "summary": "ok", "findings": [], "unsupported_claims": [], "low_confidence_citations": [], "claim_mappings": []}"#,
        );
        let cohesion_analyst = agent(
            "CohesionAnalyst",
            AgentRole::CohesionAnalyst,
            r#"{"cohesion_score": 0.9, "issues": [], "strengths": [], "summary": "flows well"}"#,
        );
        let agents = ChapterAgents {
            drafter: &drafter,
            voice_editor: &voice_editor,
            fact_checker: &fact_checker,
            cohesion_analyst: &cohesion_analyst,
        };

        let state = base_state(None);
        let thresholds = GroundingThresholds {
            voice_threshold: 0.70,
            fact_threshold: 0.90,
            cohesion_threshold: 0.0,
        };
        let bounds = ChapterBounds::default();

        let result = run_chapter_subgraph(&agents, &embedder(), state, "outline context", &thresholds, &bounds, false, &CostContext::default()).unwrap();

        assert!(result.quality_gates_passed, "{:?}", result.quality_gate_report);
        assert_eq!(result.iteration, 1);
        assert!(result.content_clean.contains("the sky is blue") || result.content_clean.to_lowercase().contains("the sky is blue"));
    }

    #[test]
    fn low_fact_score_drives_revision_until_max_turns() {
        let drafter = agent(
            "Drafter",
            AgentRole::ContentDrafter,
            r#"The sky is blue [citation: source.txt - "the sky is blue"] over the valley."#,
        );
        let voice_editor = agent("VoiceEditor", AgentRole::VoiceEditor, "edited");
        let fact_checker = agent(
            "FactChecker",
            AgentRole::FactChecker,
            r#"{"accuracy_score": 0.2, "summary": "weak", "findings": ["needs more support"], "unsupported_claims": [], "low_confidence_citations": [], "claim_mappings": []}"#,
        );
        let cohesion_analyst = agent(
            "CohesionAnalyst",
            AgentRole::CohesionAnalyst,
            r#"{"cohesion_score": 0.9, "issues": [], "strengths": [], "summary": "flows well"}"#,
        );
        let agents = ChapterAgents {
            drafter: &drafter,
            voice_editor: &voice_editor,
            fact_checker: &fact_checker,
            cohesion_analyst: &cohesion_analyst,
        };

        let state = base_state(None);
        let thresholds = GroundingThresholds {
            voice_threshold: 0.70,
            fact_threshold: 0.90,
            cohesion_threshold: 0.0,
        };
        let bounds = ChapterBounds {
            max_turns: 2,
            max_tokens: 1_000_000,
            max_cost: 1000.0,
            timeout_seconds: 600,
        };

        let result = run_chapter_subgraph(&agents, &embedder(), state, "outline context", &thresholds, &bounds, false, &CostContext::default()).unwrap();

        assert!(!result.quality_gates_passed);
        assert_eq!(result.iteration, bounds.max_turns);
        assert!(!result.revision_history.is_empty());
    }
}

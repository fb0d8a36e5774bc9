//! `START → plan → critique → [refine → critique]* → END` (spec §4.9).

use ghostline_agents::roles::{critique_outline, plan_outline, OutlinePlannerInput};
use ghostline_agents::Agent;
use ghostline_core::config::OutlineBounds;
use ghostline_core::cost_context::CostContext;
use tracing::warn;

use crate::errors::OutlineResult;
use crate::state::OutlineState;

/// `done` iff `approved ∨ iteration ≥ max_turns ∨ tokens_used ≥ max_tokens ∨
/// cost_incurred ≥ max_cost` (spec §4.9 `should_refine`).
fn is_done(state: &OutlineState, bounds: &OutlineBounds) -> bool {
    state.approved
        || state.iteration >= bounds.max_turns
        || state.tokens_used >= bounds.max_tokens
        || state.cost_incurred >= bounds.max_cost
}

fn record_usage(state: &mut OutlineState, tokens: u32, cost: f64) {
    state.tokens_used += tokens as u64;
    state.cost_incurred += cost;
    state.turns += 1;
}

/// Runs the bounded Planner/Critic loop to completion and trims the final
/// outline to `target_chapters`, renumbered 1..N.
pub fn run_outline_subgraph(
    planner: &Agent,
    critic: &Agent,
    mut state: OutlineState,
    bounds: &OutlineBounds,
    cost_ctx: &CostContext,
) -> OutlineResult<OutlineState> {
    let input = OutlinePlannerInput {
        source_summaries: &state.source_summaries,
        title: &state.title,
        description: &state.description,
        target_chapters: state.target_chapters,
        voice_guidance: &state.voice_guidance,
        prior_outline: None,
        feedback: None,
    };
    let planned = plan_outline(planner, &input, cost_ctx)?;
    record_usage(&mut state, planned.tokens_used, planned.estimated_cost);
    state.iteration = 1;
    match planned.structured_data {
        Some(outline) => state.current_outline = Some(outline),
        None => {
            warn!("OutlinePlanner returned unparseable JSON on initial plan; proceeding with empty outline");
            state.current_outline = Some(ghostline_core::model::Outline::default());
        }
    }

    loop {
        let outline = state
            .current_outline
            .clone()
            .unwrap_or_default();
        let critiqued = critique_outline(critic, &outline, cost_ctx)?;
        record_usage(&mut state, critiqued.tokens_used, critiqued.estimated_cost);

        match critiqued.structured_data {
            Some(critique) => {
                state.approved = critique.approved;
                state.feedback = critique.feedback;
            }
            None => {
                // ContentParseError default per spec §7: treat as unapproved,
                // carry the raw text forward as feedback for the next refine.
                state.approved = false;
                state.feedback = vec!["Could not parse critic response".to_string()];
            }
        }

        if is_done(&state, bounds) {
            break;
        }

        let refine_input = OutlinePlannerInput {
            source_summaries: &state.source_summaries,
            title: &state.title,
            description: &state.description,
            target_chapters: state.target_chapters,
            voice_guidance: &state.voice_guidance,
            prior_outline: state.current_outline.as_ref(),
            feedback: Some(&state.feedback),
        };
        let refined = plan_outline(planner, &refine_input, cost_ctx)?;
        record_usage(&mut state, refined.tokens_used, refined.estimated_cost);
        state.iteration += 1;
        if let Some(outline) = refined.structured_data {
            state.current_outline = Some(outline);
        }
        // else: keep the previous outline, critique it again next pass.
    }

    if let Some(outline) = state.current_outline.as_mut() {
        outline.trim_and_renumber(state.target_chapters as usize);
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ghostline_core::config::ModelConfig;
    use ghostline_core::model::Provider;
    use ghostline_cost::{CostLedger, SqliteCostLedger};
    use ghostline_modelclient::mock::MockProvider;
    use ghostline_modelclient::ModelClient;

    use super::*;
    use ghostline_agents::AgentRole;

    fn agent(name: &str, role: AgentRole, response: &str) -> Agent {
        let ledger: Arc<dyn CostLedger> = Arc::new(SqliteCostLedger::open_in_memory().unwrap());
        let client = ModelClient::new(
            Arc::new(MockProvider::succeeding(Provider::Anthropic, response)),
            None,
            ModelConfig::default(),
            ledger,
            false,
        );
        Agent::new(name, role, client)
    }

    const OUTLINE_JSON: &str = r#"{
        "title": "Deep Work",
        "premise": "Focus is the new superpower.",
        "chapters": [
            {"number": 1, "title": "Intro", "summary": "s", "key_points": [], "estimated_words": 2000},
            {"number": 2, "title": "Practice", "summary": "s", "key_points": [], "estimated_words": 2000},
            {"number": 3, "title": "Extra", "summary": "s", "key_points": [], "estimated_words": 2000}
        ],
        "themes": ["focus"],
        "target_audience": "professionals"
    }"#;

    #[test]
    fn approves_immediately_and_trims_to_target_chapters() {
        let planner = agent("Planner", AgentRole::OutlinePlanner, OUTLINE_JSON);
        let critic = agent("Critic", AgentRole::OutlineCritic, r#"{"approved": true, "feedback": []}"#);
        let state = OutlineState::new(vec!["src".into()], "Deep Work", "about focus", 2, "plainspoken");

        let result = run_outline_subgraph(&planner, &critic, state, &OutlineBounds::default(), &CostContext::default()).unwrap();

        assert!(result.approved);
        let outline = result.current_outline.unwrap();
        assert_eq!(outline.chapters.len(), 2);
        assert_eq!(outline.chapters[0].number, 1);
        assert_eq!(outline.chapters[1].number, 2);
    }

    #[test]
    fn stops_at_max_turns_when_never_approved() {
        let planner = agent("Planner", AgentRole::OutlinePlanner, OUTLINE_JSON);
        let critic = agent("Critic", AgentRole::OutlineCritic, r#"{"approved": false, "feedback": ["needs more depth"]}"#);
        let state = OutlineState::new(vec!["src".into()], "Deep Work", "about focus", 3, "plainspoken");
        let bounds = OutlineBounds {
            max_turns: 2,
            max_tokens: 1_000_000,
            max_cost: 1000.0,
            timeout_seconds: 300,
        };

        let result = run_outline_subgraph(&planner, &critic, state, &bounds, &CostContext::default()).unwrap();

        assert!(!result.approved);
        assert_eq!(result.iteration, bounds.max_turns);
    }
}

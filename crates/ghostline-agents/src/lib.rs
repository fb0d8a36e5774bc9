//! # ghostline-agents
//!
//! C5 Agents: the shared `process(state) -> AgentOutput` contract and its
//! seven role-specialized variants (spec §4.5).

pub mod agent;
pub mod errors;
pub mod output;
pub mod parse;
pub mod roles;

pub use agent::Agent;
pub use errors::{AgentError, AgentResult};
pub use output::{AgentOutput, AgentRole};
pub use parse::parse_json_response;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ghostline_core::config::ModelConfig;
    use ghostline_core::cost_context::CostContext;
    use ghostline_core::model::Provider;
    use ghostline_cost::{CostLedger, SqliteCostLedger};
    use ghostline_modelclient::mock::MockProvider;
    use ghostline_modelclient::ModelClient;

    use super::*;
    use crate::roles::{plan_outline, OutlinePlannerInput};

    fn agent_with_response(json: &str) -> Agent {
        let ledger: Arc<dyn CostLedger> = Arc::new(SqliteCostLedger::open_in_memory().unwrap());
        let client = ModelClient::new(
            Arc::new(MockProvider::succeeding(Provider::Anthropic, json)),
            None,
            ModelConfig::default(),
            ledger,
            false,
        );
        Agent::new("OutlinePlanner-1", AgentRole::OutlinePlanner, client)
    }

    #[test]
    fn plan_outline_parses_structured_response() {
        let json = r#"{
            "title": "Deep Work",
            "premise": "A guide to focus.",
            "chapters": [{"number": 1, "title": "Intro", "summary": "s", "key_points": [], "estimated_words": 2000}],
            "themes": ["focus"],
            "target_audience": "professionals"
        }"#;
        let agent = agent_with_response(json);
        let input = OutlinePlannerInput {
            source_summaries: &["summary one".to_string()],
            title: "Deep Work",
            description: "about focus",
            target_chapters: 1,
            voice_guidance: "plainspoken",
            prior_outline: None,
            feedback: None,
        };
        let output = plan_outline(&agent, &input, &CostContext::default()).unwrap();
        let outline = output.structured_data.expect("outline should parse");
        assert_eq!(outline.title, "Deep Work");
        assert_eq!(outline.chapters.len(), 1);
        assert!(output.error.is_none());
    }

    #[test]
    fn malformed_response_surfaces_as_output_error_not_panic() {
        let agent = agent_with_response("not json at all, just prose");
        let input = OutlinePlannerInput {
            source_summaries: &[],
            title: "T",
            description: "D",
            target_chapters: 1,
            voice_guidance: "",
            prior_outline: None,
            feedback: None,
        };
        let output = plan_outline(&agent, &input, &CostContext::default()).unwrap();
        assert!(output.structured_data.is_none());
        assert!(output.error.is_some());
    }
}

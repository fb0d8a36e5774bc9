//! `Agent` — the shared invoke/parse machinery every role variant sits on
//! top of (spec §4.5).

use ghostline_core::cost_context::CostContext;
use ghostline_core::model::Provider;
use ghostline_modelclient::{InvokeOptions, ModelClient};
use serde::de::DeserializeOwned;

use crate::errors::AgentResult;
use crate::output::{AgentOutput, AgentRole};
use crate::parse::parse_json_response;

pub struct Agent {
    name: String,
    role: AgentRole,
    client: ModelClient,
}

impl Agent {
    pub fn new(name: impl Into<String>, role: AgentRole, client: ModelClient) -> Self {
        Self {
            name: name.into(),
            role,
            client,
        }
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    /// Calls the model and returns raw prose, for roles whose contract is
    /// markdown/text rather than JSON (ContentDrafter, VoiceEditor).
    pub fn invoke_text(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        cost_ctx: &CostContext,
    ) -> AgentResult<AgentOutput<()>> {
        let options = InvokeOptions {
            max_tokens,
            temperature: self.role.default_temperature(),
        };
        let started = std::time::Instant::now();
        let result = self.client.invoke(
            &self.name,
            Some(self.role.name()),
            system_prompt,
            user_prompt,
            &options,
            cost_ctx,
        )?;
        let duration_ms = started.elapsed().as_millis() as u64;
        Ok(AgentOutput {
            content: result.content,
            structured_data: None,
            confidence: 1.0,
            reasoning: None,
            tokens_used: result.input_tokens + result.output_tokens,
            estimated_cost: self.estimate_cost(result.is_fallback, result.input_tokens, result.output_tokens),
            duration_ms,
            error: None,
        })
    }

    /// Calls the model and tolerantly parses the response as `T` (spec §9
    /// Design Notes: the JSON parser strips code fences and embedded prose).
    pub fn invoke_json<T: DeserializeOwned>(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        cost_ctx: &CostContext,
    ) -> AgentResult<AgentOutput<T>> {
        let raw = self.invoke_text(system_prompt, user_prompt, max_tokens, cost_ctx)?;
        match parse_json_response::<T>(&raw.content) {
            Ok(parsed) => Ok(AgentOutput {
                content: raw.content,
                structured_data: Some(parsed),
                confidence: raw.confidence,
                reasoning: raw.reasoning,
                tokens_used: raw.tokens_used,
                estimated_cost: raw.estimated_cost,
                duration_ms: raw.duration_ms,
                error: None,
            }),
            Err(err) => Ok(AgentOutput {
                content: raw.content,
                structured_data: None,
                confidence: 0.0,
                reasoning: None,
                tokens_used: raw.tokens_used,
                estimated_cost: raw.estimated_cost,
                duration_ms: raw.duration_ms,
                error: Some(err.to_string()),
            }),
        }
    }

    /// Display-only cost estimate derived from the pricing table; the
    /// authoritative figure already landed in the cost ledger inside
    /// `ModelClient::invoke`. Primary is priced as Anthropic, fallback as
    /// OpenAI, matching this workspace's default `ModelConfig`.
    fn estimate_cost(&self, is_fallback: bool, input_tokens: u32, output_tokens: u32) -> f64 {
        let config = self.client.model_config();
        let (provider, model) = if is_fallback {
            (Provider::OpenAi, config.fallback_model.as_str())
        } else {
            (Provider::Anthropic, config.primary_model.as_str())
        };
        ghostline_cost::pricing::compute_cost(provider, model, input_tokens, output_tokens).total_cost
    }
}

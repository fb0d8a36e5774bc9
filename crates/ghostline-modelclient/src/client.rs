//! `ModelClient` — spec §4.2. One instance is constructed per calling agent
//! (not shared globally) so that "persist this switch on the agent
//! instance" (spec S5) falls naturally out of each agent owning its own
//! `ModelClient`, even though the underlying `ModelProvider` trait objects
//! are cheaply-`Arc`-shared across all of them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use ghostline_core::config::ModelConfig;
use ghostline_core::cost_context::CostContext;
use ghostline_core::model::{call_log::preview, CallLog, CallType, Provider};
use ghostline_cost::CostLedger;
use serde_json::json;
use tracing::{info, warn};

use crate::errors::{ModelError, ModelResult};
use crate::provider::{InvokeOptions, ModelProvider, RawCompletion};
use crate::quota::is_quota_error;

pub struct InvokeResult {
    pub content: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub stop_reason: String,
    pub is_fallback: bool,
}

pub struct ModelClient {
    primary: Arc<dyn ModelProvider>,
    fallback: Option<Arc<dyn ModelProvider>>,
    config: ModelConfig,
    cost_ledger: Arc<dyn CostLedger>,
    strict: bool,
    /// Set once a quota error forces this agent onto the fallback
    /// provider; every subsequent call on this instance skips straight to
    /// fallback instead of re-trying primary.
    locked_to_fallback: AtomicBool,
}

impl ModelClient {
    pub fn new(
        primary: Arc<dyn ModelProvider>,
        fallback: Option<Arc<dyn ModelProvider>>,
        config: ModelConfig,
        cost_ledger: Arc<dyn CostLedger>,
        strict: bool,
    ) -> Self {
        Self {
            primary,
            fallback,
            config,
            cost_ledger,
            strict,
            locked_to_fallback: AtomicBool::new(false),
        }
    }

    pub fn is_locked_to_fallback(&self) -> bool {
        self.locked_to_fallback.load(Ordering::SeqCst)
    }

    pub fn model_config(&self) -> &ModelConfig {
        &self.config
    }

    #[allow(clippy::too_many_arguments)]
    pub fn invoke(
        &self,
        agent_name: &str,
        agent_role: Option<&str>,
        system_prompt: &str,
        user_prompt: &str,
        options: &InvokeOptions,
        cost_ctx: &CostContext,
    ) -> ModelResult<InvokeResult> {
        let use_fallback_first = self.locked_to_fallback.load(Ordering::SeqCst);

        if use_fallback_first {
            let Some(fallback) = self.fallback.clone() else {
                return Err(ModelError::NoProvider);
            };
            return self.call_and_record(
                &fallback,
                &self.config.fallback_model.clone(),
                agent_name,
                agent_role,
                system_prompt,
                user_prompt,
                options,
                cost_ctx,
                true,
                None,
            );
        }

        let primary_model = self.config.primary_model.clone();
        match self.call_and_record(
            &self.primary,
            &primary_model,
            agent_name,
            agent_role,
            system_prompt,
            user_prompt,
            options,
            cost_ctx,
            false,
            None,
        ) {
            Ok(result) => Ok(result),
            Err(ModelError::Provider(message)) if is_quota_error(&message) => {
                self.attempt_fallback(
                    agent_name,
                    agent_role,
                    system_prompt,
                    user_prompt,
                    options,
                    cost_ctx,
                    message,
                )
            }
            Err(other) => Err(other),
        }
    }

    fn attempt_fallback(
        &self,
        agent_name: &str,
        agent_role: Option<&str>,
        system_prompt: &str,
        user_prompt: &str,
        options: &InvokeOptions,
        cost_ctx: &CostContext,
        quota_reason: String,
    ) -> ModelResult<InvokeResult> {
        if self.strict || !self.config.allow_fallback {
            warn!(agent_name, "primary provider quota exhausted; fallback disabled (strict mode or config)");
            return Err(ModelError::QuotaExhausted { reason: quota_reason });
        }
        let Some(fallback) = self.fallback.clone() else {
            return Err(ModelError::QuotaExhausted { reason: quota_reason });
        };

        info!(agent_name, reason = quota_reason.as_str(), "switching agent to fallback provider");
        let fallback_model = self.config.fallback_model.clone();
        let result = self.call_and_record(
            &fallback,
            &fallback_model,
            agent_name,
            agent_role,
            system_prompt,
            user_prompt,
            options,
            cost_ctx,
            true,
            Some(quota_reason),
        )?;
        self.locked_to_fallback.store(true, Ordering::SeqCst);
        Ok(result)
    }

    #[allow(clippy::too_many_arguments)]
    fn call_and_record(
        &self,
        provider: &Arc<dyn ModelProvider>,
        model: &str,
        agent_name: &str,
        agent_role: Option<&str>,
        system_prompt: &str,
        user_prompt: &str,
        options: &InvokeOptions,
        cost_ctx: &CostContext,
        is_fallback: bool,
        fallback_reason: Option<String>,
    ) -> ModelResult<InvokeResult> {
        let started = Instant::now();
        let outcome = call_with_timeout(
            provider.clone(),
            model.to_string(),
            system_prompt.to_string(),
            user_prompt.to_string(),
            options.clone(),
            Duration::from_secs(self.config.call_timeout_seconds),
        );
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(completion) => {
                self.record_call(
                    provider.kind(),
                    model,
                    agent_name,
                    agent_role,
                    &completion,
                    duration_ms,
                    true,
                    is_fallback,
                    fallback_reason,
                    user_prompt,
                    None,
                    cost_ctx,
                );
                Ok(InvokeResult {
                    content: completion.content,
                    input_tokens: completion.input_tokens,
                    output_tokens: completion.output_tokens,
                    stop_reason: completion.stop_reason,
                    is_fallback,
                })
            }
            Err(CallOutcomeError::Timeout) => {
                let msg = format!("call timed out after {}s", self.config.call_timeout_seconds);
                self.record_failure(
                    provider.kind(),
                    model,
                    agent_name,
                    agent_role,
                    duration_ms,
                    is_fallback,
                    fallback_reason,
                    user_prompt,
                    &msg,
                    cost_ctx,
                );
                Err(ModelError::Timeout {
                    timeout_seconds: self.config.call_timeout_seconds,
                })
            }
            Err(CallOutcomeError::Provider(e)) => {
                self.record_failure(
                    provider.kind(),
                    model,
                    agent_name,
                    agent_role,
                    duration_ms,
                    is_fallback,
                    fallback_reason,
                    user_prompt,
                    &e.message,
                    cost_ctx,
                );
                Err(ModelError::Provider(e.message))
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn record_call(
        &self,
        provider: Provider,
        model: &str,
        agent_name: &str,
        agent_role: Option<&str>,
        completion: &RawCompletion,
        duration_ms: u64,
        success: bool,
        is_fallback: bool,
        fallback_reason: Option<String>,
        prompt: &str,
        error: Option<String>,
        cost_ctx: &CostContext,
    ) {
        let cost = ghostline_cost::pricing::compute_cost(
            provider,
            model,
            completion.input_tokens,
            completion.output_tokens,
        );
        self.cost_ledger.record(CallLog {
            agent_name: agent_name.to_string(),
            agent_role: agent_role.map(|s| s.to_string()),
            model: model.to_string(),
            provider,
            call_type: CallType::Chat,
            input_tokens: completion.input_tokens,
            output_tokens: completion.output_tokens,
            input_price_per_1k: cost.input_price_per_1k,
            output_price_per_1k: cost.output_price_per_1k,
            input_cost: cost.input_cost,
            output_cost: cost.output_cost,
            total_cost: cost.total_cost,
            duration_ms,
            success,
            project_id: cost_ctx.project_id.clone(),
            task_id: cost_ctx.task_id.clone(),
            workflow_run_id: cost_ctx.workflow_run_id.clone(),
            chapter_number: cost_ctx.chapter_number,
            is_fallback,
            fallback_reason,
            prompt_preview: preview(prompt),
            response_preview: preview(&completion.content),
            error,
            metadata: json!({}),
            created_at: Utc::now(),
        });
    }

    #[allow(clippy::too_many_arguments)]
    fn record_failure(
        &self,
        provider: Provider,
        model: &str,
        agent_name: &str,
        agent_role: Option<&str>,
        duration_ms: u64,
        is_fallback: bool,
        fallback_reason: Option<String>,
        prompt: &str,
        error_message: &str,
        cost_ctx: &CostContext,
    ) {
        let cost = ghostline_cost::pricing::compute_cost(provider, model, 0, 0);
        self.cost_ledger.record(CallLog {
            agent_name: agent_name.to_string(),
            agent_role: agent_role.map(|s| s.to_string()),
            model: model.to_string(),
            provider,
            call_type: CallType::Chat,
            input_tokens: 0,
            output_tokens: 0,
            input_price_per_1k: cost.input_price_per_1k,
            output_price_per_1k: cost.output_price_per_1k,
            input_cost: 0.0,
            output_cost: 0.0,
            total_cost: 0.0,
            duration_ms,
            success: false,
            project_id: cost_ctx.project_id.clone(),
            task_id: cost_ctx.task_id.clone(),
            workflow_run_id: cost_ctx.workflow_run_id.clone(),
            chapter_number: cost_ctx.chapter_number,
            is_fallback,
            fallback_reason,
            prompt_preview: preview(prompt),
            response_preview: String::new(),
            error: Some(error_message.to_string()),
            metadata: json!({}),
            created_at: Utc::now(),
        });
    }
}

enum CallOutcomeError {
    Timeout,
    Provider(crate::provider::ProviderError),
}

/// Runs the (blocking) provider call on a worker thread so a per-call
/// timeout (spec §5, default 120s) can be enforced even though
/// `ModelProvider::generate` has no timeout parameter of its own.
fn call_with_timeout(
    provider: Arc<dyn ModelProvider>,
    model: String,
    system_prompt: String,
    user_prompt: String,
    options: InvokeOptions,
    timeout: Duration,
) -> Result<RawCompletion, CallOutcomeError> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let result = provider.generate(&model, &system_prompt, &user_prompt, &options);
        let _ = tx.send(result);
    });

    match rx.recv_timeout(timeout) {
        Ok(Ok(completion)) => Ok(completion),
        Ok(Err(e)) => Err(CallOutcomeError::Provider(e)),
        Err(_) => Err(CallOutcomeError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;
    use ghostline_cost::SqliteCostLedger;

    fn client_with(primary: MockProvider, fallback: Option<MockProvider>, strict: bool) -> ModelClient {
        let ledger: Arc<dyn CostLedger> = Arc::new(SqliteCostLedger::open_in_memory().unwrap());
        ModelClient::new(
            Arc::new(primary),
            fallback.map(|f| Arc::new(f) as Arc<dyn ModelProvider>),
            ModelConfig::default(),
            ledger,
            strict,
        )
    }

    #[test]
    fn successful_call_returns_content() {
        let client = client_with(MockProvider::succeeding(Provider::Anthropic, "hello"), None, false);
        let result = client
            .invoke("Drafter", Some("drafter"), "sys", "user", &InvokeOptions::default(), &CostContext::default())
            .unwrap();
        assert_eq!(result.content, "hello");
        assert!(!result.is_fallback);
    }

    #[test]
    fn quota_error_fails_over_to_fallback_and_locks() {
        let primary = MockProvider::failing(
            Provider::Anthropic,
            "Your credit balance is too low — see Plans & Billing on Anthropic",
        );
        let fallback = MockProvider::succeeding(Provider::OpenAi, "from fallback");
        let client = client_with(primary, Some(fallback), false);

        let result = client
            .invoke("Drafter", None, "sys", "user", &InvokeOptions::default(), &CostContext::default())
            .unwrap();
        assert_eq!(result.content, "from fallback");
        assert!(result.is_fallback);
        assert!(client.is_locked_to_fallback());

        // Second call should go straight to fallback without retrying primary.
        let second = client
            .invoke("Drafter", None, "sys", "user2", &InvokeOptions::default(), &CostContext::default())
            .unwrap();
        assert_eq!(second.content, "from fallback");
    }

    #[test]
    fn strict_mode_disables_fallback_on_quota_error() {
        let primary = MockProvider::failing(Provider::Anthropic, "insufficient credits");
        let fallback = MockProvider::succeeding(Provider::OpenAi, "from fallback");
        let client = client_with(primary, Some(fallback), true);

        let err = client
            .invoke("Drafter", None, "sys", "user", &InvokeOptions::default(), &CostContext::default())
            .unwrap_err();
        assert!(matches!(err, ModelError::QuotaExhausted { .. }));
    }

    #[test]
    fn non_quota_error_is_fatal_without_fallback_attempt() {
        let primary = MockProvider::failing(Provider::Anthropic, "connection reset");
        let client = client_with(primary, None, false);
        let err = client
            .invoke("Drafter", None, "sys", "user", &InvokeOptions::default(), &CostContext::default())
            .unwrap_err();
        assert!(matches!(err, ModelError::Provider(_)));
    }
}

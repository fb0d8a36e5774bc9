//! `MockProvider` — a `ModelProvider` for tests, grounded on the
//! trait-object injection pattern in `cortex-drift-bridge::traits`
//! (`IBridgeStorage`), which is likewise exercised in tests via an
//! in-memory stand-in rather than a live backend.

use ghostline_core::model::Provider;

use crate::provider::{InvokeOptions, ModelProvider, ProviderError, RawCompletion};

pub struct MockProvider {
    kind: Provider,
    response: Result<String, String>,
}

impl MockProvider {
    pub fn succeeding(kind: Provider, response: impl Into<String>) -> Self {
        Self {
            kind,
            response: Ok(response.into()),
        }
    }

    pub fn failing(kind: Provider, error_message: impl Into<String>) -> Self {
        Self {
            kind,
            response: Err(error_message.into()),
        }
    }
}

impl ModelProvider for MockProvider {
    fn kind(&self) -> Provider {
        self.kind
    }

    fn generate(
        &self,
        _model: &str,
        system_prompt: &str,
        user_prompt: &str,
        _options: &InvokeOptions,
    ) -> Result<RawCompletion, ProviderError> {
        match &self.response {
            Ok(content) => Ok(RawCompletion {
                content: content.clone(),
                input_tokens: (system_prompt.len() + user_prompt.len()) as u32 / 4,
                output_tokens: content.len() as u32 / 4,
                stop_reason: "end_turn".to_string(),
            }),
            Err(message) => Err(ProviderError {
                message: message.clone(),
            }),
        }
    }
}

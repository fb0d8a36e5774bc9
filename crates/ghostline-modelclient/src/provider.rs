//! `ModelProvider` — the capability each vendor SDK is abstracted behind
//! (spec §6 "ProviderSDKs"). Never import a vendor SDK directly outside an
//! implementation of this trait.

use ghostline_core::model::Provider;

#[derive(Debug, Clone)]
pub struct InvokeOptions {
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for InvokeOptions {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RawCompletion {
    pub content: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub stop_reason: String,
}

#[derive(Debug, Clone)]
pub struct ProviderError {
    pub message: String,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ProviderError {}

/// `invoke(system_prompt, user_prompt, options) -> {content, input_tokens,
/// output_tokens, stop_reason}` (spec §4.2). Implementations wrap a single
/// vendor SDK and must be `Send + Sync` so they can be shared across
/// concurrently-running workflows.
pub trait ModelProvider: Send + Sync {
    fn kind(&self) -> Provider;

    fn generate(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        options: &InvokeOptions,
    ) -> Result<RawCompletion, ProviderError>;
}

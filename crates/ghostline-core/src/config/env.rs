//! Environment-flag parsing (spec §6). Parsed once into `GhostlineConfig`
//! at process start; never re-read ad hoc mid-workflow.

use std::env;

use super::GhostlineConfig;

fn truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(v) => truthy(&v),
        Err(_) => default,
    }
}

pub fn from_env() -> GhostlineConfig {
    let mut config = GhostlineConfig::default();

    config.strict_mode.enabled = flag("GHOSTLINE_STRICT_MODE", false);

    let mut allow_fallback = flag("GHOSTLINE_ALLOW_LLM_FALLBACK", true);
    if config.strict_mode.enabled {
        // Strict mode disables fallback unconditionally (spec §4.2).
        allow_fallback = false;
    }
    config.model.allow_fallback = allow_fallback;

    if let Ok(model) = env::var("OPENAI_FALLBACK_MODEL") {
        if !model.is_empty() {
            config.model.fallback_model = model;
        }
    }

    config.retrieval.rerank_enabled = flag("GHOSTLINE_RAG_RERANK", true);
    config.grounding.destructive_sanitizer = flag("GHOSTLINE_DESTRUCTIVE_SANITIZER", false);

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn strict_mode_disables_fallback_even_if_requested() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("GHOSTLINE_STRICT_MODE", "true");
        std::env::set_var("GHOSTLINE_ALLOW_LLM_FALLBACK", "true");
        let config = from_env();
        assert!(config.strict_mode.enabled);
        assert!(!config.model.allow_fallback);
        std::env::remove_var("GHOSTLINE_STRICT_MODE");
        std::env::remove_var("GHOSTLINE_ALLOW_LLM_FALLBACK");
    }

    #[test]
    fn truthy_accepts_common_spellings() {
        for v in ["1", "true", "YES", "On"] {
            assert!(truthy(v));
        }
        assert!(!truthy("0"));
        assert!(!truthy("false"));
    }
}

//! Static pricing table keyed by `(provider, model)`, grounded on
//! `original_source`'s `cost_tracker.py` `ANTHROPIC_PRICING` /
//! `OPENAI_PRICING` / `EMBEDDING_PRICING` tables. Unknown models fall back
//! to a conservative default and are logged once (spec §4.1).

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use ghostline_core::model::Provider;
use tracing::warn;

/// Input/output price per 1K tokens. Embedding models have `output = 0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRow {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

const DEFAULT_ANTHROPIC: PriceRow = PriceRow {
    input_per_1k: 0.003,
    output_per_1k: 0.015,
};

const DEFAULT_OPENAI: PriceRow = PriceRow {
    input_per_1k: 0.0025,
    output_per_1k: 0.01,
};

fn table() -> &'static HashMap<(Provider, &'static str), PriceRow> {
    static TABLE: OnceLock<HashMap<(Provider, &'static str), PriceRow>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut m = HashMap::new();
        m.insert(
            (Provider::Anthropic, "claude-sonnet-4-20250514"),
            PriceRow { input_per_1k: 0.003, output_per_1k: 0.015 },
        );
        m.insert(
            (Provider::Anthropic, "claude-3-5-sonnet-20241022"),
            PriceRow { input_per_1k: 0.003, output_per_1k: 0.015 },
        );
        m.insert(
            (Provider::Anthropic, "claude-3-opus-20240229"),
            PriceRow { input_per_1k: 0.015, output_per_1k: 0.075 },
        );
        m.insert(
            (Provider::Anthropic, "claude-3-haiku-20240307"),
            PriceRow { input_per_1k: 0.00025, output_per_1k: 0.00125 },
        );
        m.insert(
            (Provider::OpenAi, "gpt-4o"),
            PriceRow { input_per_1k: 0.0025, output_per_1k: 0.01 },
        );
        m.insert(
            (Provider::OpenAi, "gpt-4o-mini"),
            PriceRow { input_per_1k: 0.00015, output_per_1k: 0.0006 },
        );
        m.insert(
            (Provider::OpenAi, "gpt-4-turbo"),
            PriceRow { input_per_1k: 0.01, output_per_1k: 0.03 },
        );
        m.insert(
            (Provider::OpenAi, "gpt-4"),
            PriceRow { input_per_1k: 0.03, output_per_1k: 0.06 },
        );
        m.insert(
            (Provider::OpenAi, "text-embedding-3-small"),
            PriceRow { input_per_1k: 0.00002, output_per_1k: 0.0 },
        );
        m.insert(
            (Provider::OpenAi, "text-embedding-3-large"),
            PriceRow { input_per_1k: 0.00013, output_per_1k: 0.0 },
        );
        m
    })
}

fn warned_unknown_models() -> &'static RwLock<std::collections::HashSet<String>> {
    static SEEN: OnceLock<RwLock<std::collections::HashSet<String>>> = OnceLock::new();
    SEEN.get_or_init(|| RwLock::new(std::collections::HashSet::new()))
}

/// Look up the price row for a provider/model pair, falling back to a
/// conservative default when the model is unknown.
pub fn price_for(provider: Provider, model: &str) -> PriceRow {
    if let Some(row) = table().get(&(provider, model)) {
        return *row;
    }

    let key = format!("{}:{model}", provider.as_str());
    let already_warned = warned_unknown_models().read().unwrap().contains(&key);
    if !already_warned {
        warn!(provider = provider.as_str(), model, "unknown model; using conservative default pricing");
        warned_unknown_models().write().unwrap().insert(key);
    }

    match provider {
        Provider::Anthropic => DEFAULT_ANTHROPIC,
        Provider::OpenAi => {
            if model.to_ascii_lowercase().contains("embedding") {
                PriceRow { input_per_1k: 0.0001, output_per_1k: 0.0 }
            } else {
                DEFAULT_OPENAI
            }
        }
    }
}

/// Computed cost for one call: `(input_cost, output_cost, total_cost)`.
pub struct ComputedCost {
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
    pub input_price_per_1k: f64,
    pub output_price_per_1k: f64,
}

pub fn compute_cost(provider: Provider, model: &str, input_tokens: u32, output_tokens: u32) -> ComputedCost {
    let row = price_for(provider, model);
    let input_cost = (input_tokens as f64 / 1000.0) * row.input_per_1k;
    let output_cost = (output_tokens as f64 / 1000.0) * row.output_per_1k;
    ComputedCost {
        input_cost,
        output_cost,
        total_cost: input_cost + output_cost,
        input_price_per_1k: row.input_per_1k,
        output_price_per_1k: row.output_per_1k,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_model_uses_table_price() {
        let row = price_for(Provider::Anthropic, "claude-3-opus-20240229");
        assert_eq!(row.input_per_1k, 0.015);
        assert_eq!(row.output_per_1k, 0.075);
    }

    #[test]
    fn unknown_model_falls_back_to_default() {
        let row = price_for(Provider::Anthropic, "claude-unreleased-9000");
        assert_eq!(row, DEFAULT_ANTHROPIC);
    }

    #[test]
    fn unknown_embedding_model_has_zero_output_price() {
        let row = price_for(Provider::OpenAi, "text-embedding-unreleased");
        assert_eq!(row.output_per_1k, 0.0);
    }
}

//! Stylometry feature extraction (spec §4.6).

use std::collections::HashMap;
use std::sync::OnceLock;

use ghostline_core::model::Stylometry;
use regex::Regex;

fn sentence_splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+[\s\n]+").unwrap())
}

fn word_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w+\b").unwrap())
}

fn words(text: &str) -> Vec<String> {
    word_pattern()
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Extracts the 11 stylometry features from raw text (spec §4.6).
/// Empty or whitespace-only text yields all-zero features.
pub fn extract_features(text: &str) -> Stylometry {
    if text.trim().is_empty() {
        return zero_stylometry();
    }

    let paragraphs: Vec<&str> = text.split("\n\n").map(|p| p.trim()).filter(|p| !p.is_empty()).collect();
    let paragraphs = if paragraphs.is_empty() { vec![text] } else { paragraphs };

    let sentences: Vec<&str> = sentence_splitter()
        .split(text)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    let sentences = if sentences.is_empty() { vec![text] } else { sentences };

    let all_words = words(text);
    if all_words.is_empty() {
        return zero_stylometry();
    }

    let sentence_lengths: Vec<f64> = sentences
        .iter()
        .map(|s| words(s).len() as f64)
        .filter(|&len| len > 0.0)
        .collect();

    let avg_sentence_length = mean(&sentence_lengths);
    let sentence_length_std = stdev(&sentence_lengths);

    let word_lengths: Vec<f64> = all_words.iter().map(|w| w.chars().count() as f64).collect();
    let avg_word_length = mean(&word_lengths);

    let unique_words: std::collections::HashSet<&str> = all_words.iter().map(|w| w.as_str()).collect();
    let vocabulary_complexity = unique_words.len() as f64 / all_words.len() as f64;

    let mut counts: HashMap<&str, u32> = HashMap::new();
    for w in &all_words {
        *counts.entry(w.as_str()).or_insert(0) += 1;
    }
    let hapax = counts.values().filter(|&&c| c == 1).count();
    let vocabulary_richness = if unique_words.is_empty() {
        0.0
    } else {
        hapax as f64 / unique_words.len() as f64
    };

    let punctuation_count = text.chars().filter(|c| ".,;:!?\"'-".contains(*c)).count();
    let punctuation_density = punctuation_count as f64 / all_words.len() as f64 * 100.0;

    let question_count = text.matches('?').count();
    let exclamation_count = text.matches('!').count();
    let question_ratio = question_count as f64 / sentences.len() as f64;
    let exclamation_ratio = exclamation_count as f64 / sentences.len() as f64;

    let comma_count = text.matches(',').count();
    let semicolon_count = text.matches(';').count();
    let comma_density = comma_count as f64 / all_words.len() as f64 * 100.0;
    let semicolon_density = semicolon_count as f64 / all_words.len() as f64 * 100.0;

    let avg_paragraph_length = sentences.len() as f64 / paragraphs.len() as f64;

    Stylometry {
        avg_sentence_length,
        sentence_length_std,
        avg_word_length,
        vocabulary_complexity,
        vocabulary_richness,
        punctuation_density,
        question_ratio,
        exclamation_ratio,
        comma_density,
        semicolon_density,
        avg_paragraph_length,
    }
}

fn zero_stylometry() -> Stylometry {
    Stylometry {
        avg_sentence_length: 0.0,
        sentence_length_std: 0.0,
        avg_word_length: 0.0,
        vocabulary_complexity: 0.0,
        vocabulary_richness: 0.0,
        punctuation_density: 0.0,
        question_ratio: 0.0,
        exclamation_ratio: 0.0,
        comma_density: 0.0,
        semicolon_density: 0.0,
        avg_paragraph_length: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_zero_features() {
        let f = extract_features("   ");
        assert_eq!(f.avg_sentence_length, 0.0);
        assert_eq!(f.vocabulary_complexity, 0.0);
    }

    #[test]
    fn simple_text_has_plausible_features() {
        let f = extract_features("The cat sat. The dog ran! Did the bird fly?");
        assert!(f.avg_sentence_length > 0.0);
        assert!(f.question_ratio > 0.0);
        assert!(f.exclamation_ratio > 0.0);
        assert!(f.vocabulary_complexity > 0.0 && f.vocabulary_complexity <= 1.0);
    }

    #[test]
    fn repeated_vocabulary_lowers_richness() {
        let repetitive = extract_features("cat cat cat cat cat.");
        let varied = extract_features("cat dog bird fish frog.");
        assert!(repetitive.vocabulary_richness < varied.vocabulary_richness);
    }
}

//! `compute_style_issues` — the deterministic style gate (spec §4.7).

use std::sync::OnceLock;

use regex::Regex;

use crate::marker::{count_markers_any_form, parse_markers};
use crate::normalize::normalize_text;

fn heading_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^##[^#]").unwrap())
}

fn framework_name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Z]{3,}\s+Framework").unwrap())
}

fn meta_language_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(framework|toolkit|arsenal)\b").unwrap())
}

fn sentence_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^.!?]+[.!?]+").unwrap())
}

fn digit_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d").unwrap())
}

fn medical_statistical_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(percent|diagnos\w*|symptom\w*|clinical\w*|patients?|treatment\w*|medication\w*|significant(ly)?|correlat\w*|studies|research shows)\b").unwrap()
    })
}

fn first_person_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bI\b").unwrap())
}

/// Removes `[citation: ...]` markers (and their matched quoted span) from
/// text, leaving the surrounding prose so patterns don't false-positive
/// on text that only appears inside a citation's own quote.
fn strip_markers(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for marker in parse_markers(content) {
        out.push_str(&content[last..marker.start]);
        last = marker.end;
    }
    out.push_str(&content[last..]);
    out
}

pub fn compute_style_issues(content: &str) -> Vec<String> {
    let mut issues = Vec::new();

    let heading_count = heading_pattern().find_iter(content).count();
    if heading_count > 3 {
        issues.push(format!("more than 3 level-2 headings ({heading_count} found)"));
    }

    let words = content.split_whitespace().count().max(1);
    let dash_count = content.matches('\u{2014}').count() + content.matches('\u{2013}').count() + content.matches("--").count();
    let dash_rate = dash_count as f64 / words as f64 * 1000.0;
    if dash_rate > 2.0 {
        issues.push(format!("excessive dash usage ({dash_rate:.2} per 1000 words)"));
    }

    if framework_name_pattern().is_match(content) {
        issues.push("named framework pattern detected (e.g. \"XYZ Framework\")".to_string());
    }

    let meta_count = meta_language_pattern().find_iter(content).count();
    if meta_count >= 6 {
        issues.push(format!("overuse of meta-language (framework/toolkit/arsenal) x{meta_count}"));
    }

    if count_markers_any_form(content) == 0 {
        issues.push("no citation markers present".to_string());
    }

    let stripped = strip_markers(content);
    let uncited_factual_sentences = sentence_pattern()
        .find_iter(&stripped)
        .filter(|m| digit_pattern().is_match(m.as_str()) || medical_statistical_pattern().is_match(m.as_str()))
        .count();
    if uncited_factual_sentences > 0 {
        issues.push(format!(
            "{uncited_factual_sentences} factual-looking sentence(s) outside any citation marker"
        ));
    }

    let mut unsupported_quote_paragraphs = 0;
    for paragraph in content.split("\n\n") {
        if paragraph.split_whitespace().count() < 20 {
            continue;
        }
        let paragraph_prose = normalize_text(&strip_markers(paragraph));
        for marker in parse_markers(paragraph) {
            let normalized_quote = normalize_text(&marker.quote);
            if !normalized_quote.is_empty() && !paragraph_prose.contains(&normalized_quote) {
                unsupported_quote_paragraphs += 1;
                break;
            }
        }
    }
    if unsupported_quote_paragraphs > 0 {
        issues.push(format!(
            "{unsupported_quote_paragraphs} paragraph(s) cite a quote that does not appear verbatim in the prose"
        ));
    }

    if first_person_pattern().is_match(&stripped) {
        issues.push("first-person language (\"I\") in model-authored prose".to_string());
    }

    issues
}

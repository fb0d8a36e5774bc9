//! Citation marker parsing: `[citation: <filename> - "<exact quote>"]`
//! (spec §4.7). Quotes may be straight or curly.

use std::sync::OnceLock;

use regex::Regex;

/// A successfully-parsed marker, byte-offset span inclusive of brackets.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMarker {
    pub filename: String,
    pub quote: String,
    pub start: usize,
    pub end: usize,
}

fn marker_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\[citation:").unwrap())
}

fn strict_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)\[citation:\s*([^\]]+?)\s*-\s*["“]([^"”]+)["”]\s*\]"#).unwrap()
    })
}

/// Count of `[citation:` occurrences in any form, case-insensitive —
/// includes markers that fail to fully parse.
pub fn count_markers_any_form(content: &str) -> usize {
    marker_prefix().find_iter(content).count()
}

/// Strips every strictly-parsed marker span from `content` and collapses
/// any resulting run of whitespace to a single space (spec §4.10
/// `finalize`: "`content_clean` by stripping markers and normalizing runs
/// of spaces").
pub fn strip_markers_and_normalize(content: &str) -> String {
    let mut stripped = String::with_capacity(content.len());
    let mut last = 0;
    for marker in parse_markers(content) {
        stripped.push_str(&content[last..marker.start]);
        last = marker.end;
    }
    stripped.push_str(&content[last..]);

    let mut out = String::with_capacity(stripped.len());
    let mut last_was_space = false;
    for ch in stripped.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out.trim().to_string()
}

/// Strictly-parseable markers, in document order.
pub fn parse_markers(content: &str) -> Vec<ParsedMarker> {
    strict_marker()
        .captures_iter(content)
        .map(|caps| {
            let whole = caps.get(0).unwrap();
            ParsedMarker {
                filename: caps.get(1).unwrap().as_str().trim().to_string(),
                quote: caps.get(2).unwrap().as_str().trim().to_string(),
                start: whole.start(),
                end: whole.end(),
            }
        })
        .collect()
}


#[cfg(test)]
mod strip_and_normalize_tests {
    use super::*;

    #[test]
    fn strips_markers_and_collapses_whitespace() {
        let content = "The sky is blue [citation: a.txt - \"the sky is blue\"].   \n\n  More text.";
        let out = strip_markers_and_normalize(content);
        assert_eq!(out, "The sky is blue . More text.");
    }
}

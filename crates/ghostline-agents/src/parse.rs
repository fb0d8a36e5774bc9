//! Tolerant JSON-response parsing (spec §4.5, §9 Design Notes): model
//! output routinely arrives wrapped in a ```json fence or padded with
//! explanatory prose around the payload. Strip both before deserializing.

use serde::de::DeserializeOwned;

use crate::errors::{AgentError, AgentResult};

pub fn parse_json_response<T: DeserializeOwned>(raw: &str) -> AgentResult<T> {
    let candidate = strip_code_fence(raw);
    if let Ok(parsed) = serde_json::from_str(candidate) {
        return Ok(parsed);
    }

    let extracted = extract_json_span(candidate)
        .ok_or_else(|| AgentError::MalformedJson(raw.chars().take(200).collect()))?;
    serde_json::from_str(extracted).map_err(|_| AgentError::MalformedJson(raw.chars().take(200).collect()))
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let after_open = after_open.strip_prefix("json").unwrap_or(after_open);
    let after_open = after_open.trim_start_matches('\n');
    match after_open.rfind("```") {
        Some(end) => after_open[..end].trim(),
        None => after_open.trim(),
    }
}

/// Finds the first balanced `{...}` or `[...]` span, for responses that
/// embed JSON inside prose ("Here is the outline:\n{...}\nLet me know...").
fn extract_json_span(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = text.find(['{', '['])?;
    let open = bytes[start];
    let close = if open == b'{' { b'}' } else { b']' };

    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b if b == open => depth += 1,
            b if b == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        ok: bool,
        n: i32,
    }

    #[test]
    fn parses_plain_json() {
        let out: Sample = parse_json_response(r#"{"ok": true, "n": 3}"#).unwrap();
        assert_eq!(out, Sample { ok: true, n: 3 });
    }

    #[test]
    fn parses_json_code_fence() {
        let raw = "```json\n{\"ok\": true, \"n\": 5}\n```";
        let out: Sample = parse_json_response(raw).unwrap();
        assert_eq!(out, Sample { ok: true, n: 5 });
    }

    #[test]
    fn parses_json_embedded_in_prose() {
        let raw = "Sure, here is the result:\n{\"ok\": false, \"n\": 1}\nLet me know if you need more.";
        let out: Sample = parse_json_response(raw).unwrap();
        assert_eq!(out, Sample { ok: false, n: 1 });
    }

    #[test]
    fn rejects_unparseable_text() {
        let err = parse_json_response::<Sample>("no json here at all").unwrap_err();
        assert!(matches!(err, AgentError::MalformedJson(_)));
    }

    #[test]
    fn handles_nested_braces_and_strings() {
        let raw = r#"{"ok": true, "n": 1, "note": "a { literal } brace in a string"}"#;
        let out: Sample = parse_json_response(raw).unwrap();
        assert_eq!(out, Sample { ok: true, n: 1 });
    }
}

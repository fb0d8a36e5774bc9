//! Quota/credit error detection (spec §4.2, S5): a primary-provider error
//! message matching one of these phrases triggers fallback rather than
//! being treated as a generic transient failure.

const QUOTA_SIGNALS: &[&str] = &[
    "credit balance too low",
    "insufficient credits",
    "insufficient_quota",
    "plans & billing",
    "billing",
    "quota exceeded",
];

pub fn is_quota_error(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    QUOTA_SIGNALS.iter().any(|signal| lower.contains(signal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_anthropic_credit_message() {
        assert!(is_quota_error(
            "Your credit balance is too low — see Plans & Billing on Anthropic"
        ));
    }

    #[test]
    fn detects_openai_insufficient_quota() {
        assert!(is_quota_error("Error code 429: insufficient_quota"));
    }

    #[test]
    fn does_not_flag_unrelated_errors() {
        assert!(!is_quota_error("connection reset by peer"));
    }
}

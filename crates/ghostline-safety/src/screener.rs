//! `SafetyScreener::check_content` (spec §4.8).

use ghostline_core::model::SafetyFinding;

use crate::patterns::all_patterns;

const MENTAL_HEALTH_DISCLAIMER: &str = "IMPORTANT DISCLAIMER: This content is for informational and \
educational purposes only. It is not intended to be a substitute for professional medical advice, \
diagnosis, or treatment. If you are experiencing a mental health crisis, please contact a mental \
health professional or call a crisis helpline immediately. In the US, you can call 988 (Suicide & \
Crisis Lifeline) or text HOME to 741741 (Crisis Text Line).";

const MEDICAL_DISCLAIMER: &str = "MEDICAL DISCLAIMER: The information in this content should not be \
considered medical advice. Always consult with a qualified healthcare provider before making any \
changes to medication or treatment plans.";

const MENTAL_HEALTH_KEYWORDS: &[&str] = &[
    "mental health", "anxiety", "depression", "therapy", "counseling", "stress", "trauma",
    "coping", "wellness", "self-care", "mindfulness", "emotional", "psychological",
];

#[derive(Debug, Clone, PartialEq)]
pub struct SafetyCheckResult {
    pub is_safe: bool,
    pub findings: Vec<SafetyFinding>,
    pub requires_disclaimer: bool,
    pub suggested_disclaimer: Option<String>,
}

impl SafetyCheckResult {
    pub fn critical_findings(&self) -> Vec<&SafetyFinding> {
        self.findings
            .iter()
            .filter(|f| f.severity == "critical" || f.severity == "high")
            .collect()
    }
}

/// `strict`: in strict mode any finding (including low severity) blocks;
/// otherwise only critical/high findings block (spec §4.8).
pub fn check_content(content: &str, strict: bool) -> SafetyCheckResult {
    let mut findings = Vec::new();

    for rule in all_patterns() {
        for m in rule.regex.find_iter(content) {
            findings.push(SafetyFinding {
                category: rule.category.to_string(),
                severity: rule.severity.as_str().to_string(),
                excerpt: m.as_str().to_string(),
                detail: rule.recommendation.to_string(),
            });
        }
    }

    let has_blocking = findings
        .iter()
        .any(|f| f.severity == "critical" || f.severity == "high");
    let is_safe = if strict {
        findings.is_empty()
    } else {
        !has_blocking
    };

    let content_lower = content.to_lowercase();
    let mentions_mental_health = MENTAL_HEALTH_KEYWORDS.iter().any(|kw| content_lower.contains(kw));
    let mentions_drug_recommendation = findings.iter().any(|f| f.category == "drug_recommendation");

    let (requires_disclaimer, suggested_disclaimer) = if mentions_drug_recommendation {
        (true, Some(MEDICAL_DISCLAIMER.to_string()))
    } else if mentions_mental_health {
        (true, Some(MENTAL_HEALTH_DISCLAIMER.to_string()))
    } else {
        (false, None)
    };

    SafetyCheckResult {
        is_safe,
        findings,
        requires_disclaimer,
        suggested_disclaimer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_content_is_safe() {
        let result = check_content("The garden bloomed in spring with tulips and daffodils.", false);
        assert!(result.is_safe);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn crisis_language_blocks_in_normal_mode() {
        let result = check_content("Some people think about wanting to kill myself when overwhelmed.", false);
        assert!(!result.is_safe);
        assert!(!result.critical_findings().is_empty());
    }

    #[test]
    fn low_severity_trigger_does_not_block_in_normal_mode() {
        let result = check_content("The memoir includes childhood abuse recounted with care.", false);
        assert!(result.is_safe);
        assert!(!result.findings.is_empty());
    }

    #[test]
    fn low_severity_finding_blocks_in_strict_mode() {
        let result = check_content("The memoir includes childhood abuse recounted with care.", true);
        assert!(!result.is_safe);
    }

    #[test]
    fn drug_recommendation_triggers_medical_disclaimer() {
        let result = check_content("You should start taking medication for this right away.", false);
        assert!(result.requires_disclaimer);
        assert_eq!(result.suggested_disclaimer.as_deref(), Some(MEDICAL_DISCLAIMER));
    }

    #[test]
    fn mental_health_topic_without_findings_still_suggests_disclaimer() {
        let result = check_content("This chapter explores anxiety and practical coping strategies.", false);
        assert!(result.requires_disclaimer);
        assert_eq!(result.suggested_disclaimer.as_deref(), Some(MENTAL_HEALTH_DISCLAIMER));
    }
}

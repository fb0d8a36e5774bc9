//! The three compiled pattern sets (spec §4.8): crisis, medical-advice
//! overreach, and trigger topics.

use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn is_blocking_by_default(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

pub struct PatternRule {
    pub regex: Regex,
    pub category: &'static str,
    pub severity: Severity,
    pub recommendation: &'static str,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("safety pattern must compile")
}

fn crisis_patterns() -> &'static Vec<PatternRule> {
    static RULES: OnceLock<Vec<PatternRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            PatternRule {
                regex: compile(r"\b(kill|end)\s+(my|your)?self\b"),
                category: "suicide_mention",
                severity: Severity::Critical,
                recommendation: "Add crisis resources. Consider rewording to focus on hope and recovery.",
            },
            PatternRule {
                regex: compile(r"\b(suicide|suicidal)\b"),
                category: "suicide_mention",
                severity: Severity::High,
                recommendation: "Add crisis resources. Consider rewording to focus on hope and recovery.",
            },
            PatternRule {
                regex: compile(r"\b(cut|cutting|hurt)\s+(my|your)?self\b"),
                category: "self_harm",
                severity: Severity::High,
                recommendation: "Add content warning and crisis resources. Ensure context is supportive.",
            },
            PatternRule {
                regex: compile(r"\bself[\s-]?harm\b"),
                category: "self_harm",
                severity: Severity::High,
                recommendation: "Add content warning and crisis resources. Ensure context is supportive.",
            },
            PatternRule {
                regex: compile(r"\bwant\s+to\s+die\b"),
                category: "crisis_language",
                severity: Severity::Critical,
                recommendation: "Review for tone. Add crisis hotline information.",
            },
            PatternRule {
                regex: compile(r"\b(no|not)\s+worth\s+living\b"),
                category: "crisis_language",
                severity: Severity::High,
                recommendation: "Review for tone. Add crisis hotline information.",
            },
        ]
    })
}

fn medical_patterns() -> &'static Vec<PatternRule> {
    static RULES: OnceLock<Vec<PatternRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            PatternRule {
                regex: compile(r"\byou\s+should\s+(take|start|stop)\s+\w*\s*(medication|medicine|drug|pill)"),
                category: "drug_recommendation",
                severity: Severity::High,
                recommendation: "Reword to suggest consulting a healthcare provider. Add medical disclaimer.",
            },
            PatternRule {
                regex: compile(r"\b(increase|decrease|adjust)\s+your\s+(dose|dosage|medication)"),
                category: "drug_recommendation",
                severity: Severity::High,
                recommendation: "Reword to suggest consulting a healthcare provider. Add medical disclaimer.",
            },
            PatternRule {
                regex: compile(r"\byou\s+(have|are|suffer\s+from)\s+(depression|anxiety|bipolar|schizophrenia|ptsd|ocd)"),
                category: "diagnosis_claim",
                severity: Severity::Medium,
                recommendation: "Reword to suggest seeing a professional for diagnosis.",
            },
            PatternRule {
                regex: compile(r"\bthis\s+(is|means)\s+you\s+are\s+(depressed|anxious|mentally\s+ill)"),
                category: "diagnosis_claim",
                severity: Severity::Medium,
                recommendation: "Reword to suggest seeing a professional for diagnosis.",
            },
            PatternRule {
                regex: compile(r"\binstead\s+of\s+(therapy|counseling|seeing\s+a\s+therapist)"),
                category: "therapy_substitute",
                severity: Severity::Medium,
                recommendation: "Emphasize that content complements, not replaces, professional help.",
            },
            PatternRule {
                regex: compile(r"\byou\s+don'?t\s+need\s+(therapy|a\s+therapist|professional\s+help)"),
                category: "therapy_substitute",
                severity: Severity::High,
                recommendation: "Emphasize that content complements, not replaces, professional help.",
            },
        ]
    })
}

fn trigger_patterns() -> &'static Vec<PatternRule> {
    static RULES: OnceLock<Vec<PatternRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            PatternRule {
                regex: compile(r"\b(graphic|detailed)\s+(description|account)\s+of\s+(trauma|abuse|violence)"),
                category: "trigger_content",
                severity: Severity::Medium,
                recommendation: "Add content warning at the beginning of the section.",
            },
            PatternRule {
                regex: compile(r"\b(childhood|sexual|physical)\s+(abuse|trauma)"),
                category: "trigger_content",
                severity: Severity::Low,
                recommendation: "Add content warning at the beginning of the section.",
            },
            PatternRule {
                regex: compile(r"\b(eating\s+disorder|anorexia|bulimia)\b"),
                category: "trigger_content",
                severity: Severity::Low,
                recommendation: "Add content warning at the beginning of the section.",
            },
        ]
    })
}

pub fn all_patterns() -> impl Iterator<Item = &'static PatternRule> {
    crisis_patterns()
        .iter()
        .chain(medical_patterns().iter())
        .chain(trigger_patterns().iter())
}

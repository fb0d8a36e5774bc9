//! Final quality-gate conjunction (spec §4.7).

use ghostline_core::model::{CitationReport, QualityGateReport};

pub fn evaluate_quality_gate(
    voice_score: f64,
    voice_threshold: f64,
    citation_report: &CitationReport,
    style_issues: Vec<String>,
) -> QualityGateReport {
    let voice_ok = voice_score >= voice_threshold;

    let citations_ok = citation_report.inline_parsed > 0
        && citation_report.inline_invalid_format == 0
        && citation_report.inline_unverified == 0
        && citation_report.inline_quality >= 0.99
        && citation_report.inline_total > 0;

    let style_ok = style_issues.is_empty();

    QualityGateReport {
        voice_ok,
        citations_ok,
        style_ok,
        style_issues,
        passed: voice_ok && citations_ok && style_ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passing_report() -> CitationReport {
        CitationReport {
            inline_total: 2,
            inline_parsed: 2,
            inline_invalid_format: 0,
            inline_verified: 2,
            inline_unverified: 0,
            inline_quality: 1.0,
            citations: vec![],
        }
    }

    #[test]
    fn all_conditions_met_passes() {
        let gate = evaluate_quality_gate(0.9, 0.85, &passing_report(), vec![]);
        assert!(gate.passed);
    }

    #[test]
    fn low_voice_score_fails_gate() {
        let gate = evaluate_quality_gate(0.5, 0.85, &passing_report(), vec![]);
        assert!(!gate.voice_ok);
        assert!(!gate.passed);
    }

    #[test]
    fn any_unverified_citation_fails_gate() {
        let mut report = passing_report();
        report.inline_unverified = 1;
        report.inline_verified = 1;
        report.inline_quality = 0.5;
        let gate = evaluate_quality_gate(0.9, 0.85, &report, vec![]);
        assert!(!gate.citations_ok);
    }

    #[test]
    fn any_style_issue_fails_gate() {
        let gate = evaluate_quality_gate(0.9, 0.85, &passing_report(), vec!["issue".to_string()]);
        assert!(!gate.style_ok);
        assert!(!gate.passed);
    }

    #[test]
    fn zero_citations_fails_gate() {
        let mut report = passing_report();
        report.inline_total = 0;
        report.inline_parsed = 0;
        report.inline_quality = 0.0;
        let gate = evaluate_quality_gate(0.9, 0.85, &report, vec![]);
        assert!(!gate.citations_ok);
    }
}

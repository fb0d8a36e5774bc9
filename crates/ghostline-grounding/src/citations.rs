//! `verify_inline_citations` (spec §4.7).

use ghostline_core::model::{Citation, CitationReport, SourceChunk};

use crate::marker::{count_markers_any_form, parse_markers};
use crate::normalize::{normalize_filename, normalize_text};

/// Verifies every strictly-parsed citation marker in `content` against the
/// source chunks it claims to quote. Chunks are grouped by (normalized)
/// filename and concatenated to stand in for "full extracted text" when
/// no single chunk covers the whole quote.
pub fn verify_inline_citations(content: &str, chunks: &[SourceChunk]) -> CitationReport {
    let inline_total = count_markers_any_form(content);
    let markers = parse_markers(content);
    let inline_parsed = markers.len();
    let inline_invalid_format = inline_total.saturating_sub(inline_parsed);

    let mut citations = Vec::with_capacity(markers.len());
    let mut inline_verified = 0usize;

    for marker in &markers {
        let target_filename = normalize_filename(&marker.filename);
        let normalized_quote = normalize_text(&marker.quote);

        let matching_chunks: Vec<&SourceChunk> = chunks
            .iter()
            .filter(|c| normalize_filename(&c.filename) == target_filename)
            .collect();

        let source_text = matching_chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let normalized_source = normalize_text(&source_text);

        let verified = !normalized_quote.is_empty() && normalized_source.contains(&normalized_quote);
        if verified {
            inline_verified += 1;
        }

        let quote_start = normalized_source.find(&normalized_quote);
        let quote_end = quote_start.map(|s| s + normalized_quote.len());

        citations.push(Citation {
            filename: marker.filename.clone(),
            quote: marker.quote.clone(),
            marker_start: marker.start,
            marker_end: marker.end,
            quote_start,
            quote_end,
            verified,
            source_material_id: matching_chunks.first().map(|c| c.source_material_id.clone()),
        });
    }

    let inline_unverified = inline_parsed - inline_verified;
    let inline_quality = if inline_parsed == 0 {
        0.0
    } else {
        inline_verified as f64 / inline_parsed as f64
    };

    CitationReport {
        inline_total: inline_total as u32,
        inline_parsed: inline_parsed as u32,
        inline_invalid_format: inline_invalid_format as u32,
        inline_verified: inline_verified as u32,
        inline_unverified: inline_unverified as u32,
        inline_quality,
        citations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(filename: &str, content: &str) -> SourceChunk {
        SourceChunk::new("id", "proj", "mat-1", filename, content, 0, vec![])
    }

    #[test]
    fn verified_quote_is_counted() {
        let chunks = vec![chunk("report.pdf", "The sky is blue and the grass is green.")];
        let content = r#"[citation: report.pdf - "the sky is blue"]"#;
        let report = verify_inline_citations(content, &chunks);
        assert_eq!(report.inline_total, 1);
        assert_eq!(report.inline_parsed, 1);
        assert_eq!(report.inline_verified, 1);
        assert_eq!(report.inline_unverified, 0);
        assert!((report.inline_quality - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fabricated_quote_is_unverified() {
        let chunks = vec![chunk("report.pdf", "Completely unrelated content here.")];
        let content = r#"[citation: report.pdf - "the sky is blue"]"#;
        let report = verify_inline_citations(content, &chunks);
        assert_eq!(report.inline_unverified, 1);
        assert!(!report.citations[0].verified);
    }

    #[test]
    fn malformed_marker_counts_toward_invalid_format() {
        let content = "[citation: missing the quote part]";
        let report = verify_inline_citations(content, &[]);
        assert_eq!(report.inline_total, 1);
        assert_eq!(report.inline_parsed, 0);
        assert_eq!(report.inline_invalid_format, 1);
    }

    #[test]
    fn no_citations_has_zero_quality_not_nan() {
        let report = verify_inline_citations("No markers here.", &[]);
        assert_eq!(report.inline_quality, 0.0);
    }
}

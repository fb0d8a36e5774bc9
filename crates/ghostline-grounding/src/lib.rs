//! # ghostline-grounding
//!
//! C7 GroundingVerifier: citation marker parsing, inline citation
//! verification, the deterministic style gate, and the final
//! voice/citations/style quality-gate conjunction (spec §4.7).

pub mod citations;
pub mod marker;
pub mod normalize;
pub mod quality_gate;
pub mod sanitize;
pub mod style;

pub use citations::verify_inline_citations;
pub use marker::{count_markers_any_form, parse_markers, strip_markers_and_normalize, ParsedMarker};
pub use quality_gate::evaluate_quality_gate;
pub use sanitize::sanitize_grounding;
pub use style::compute_style_issues;

//! Rewrite engine
//!
//! Resolves overlapping spans and rebuilds the text in one forward pass over
//! the original. Span offsets are always read against the original text, never
//! against the partially built output.

use crate::anonymization::anonymizer::apply_operator;
use crate::anonymization::anonymizer::encryption::SpanCipher;
use crate::anonymization::models::DetectionSpan;
use crate::anonymization::pipeline::rewrite_order;
use crate::anonymization::report::AnonymizationReport;
use crate::anonymization::resolver::OperatorResolver;
use crate::domain::{Result, SecurePasteError};
use std::collections::BTreeMap;

/// Reduce `spans` to a strictly ordered, non-overlapping sequence
///
/// Of the spans sharing a start, only the highest scoring one is kept (longer
/// wins a tie). A span starting inside an already kept span is dropped.
pub fn resolve_overlaps(mut spans: Vec<DetectionSpan>) -> Vec<DetectionSpan> {
    spans.sort_by(rewrite_order);

    let mut kept: Vec<DetectionSpan> = Vec::with_capacity(spans.len());
    // furthest end retained so far; spans are never empty, so this also
    // rejects later spans sharing a kept span's start
    let mut cursor = 0;
    for span in spans {
        if span.start < cursor {
            continue;
        }
        cursor = cursor.max(span.end);
        kept.push(span);
    }

    kept
}

/// Apply resolved operators to `spans` and build the report
///
/// # Errors
///
/// Returns [`SecurePasteError::DetectionFailure`] if a span does not belong to
/// `text`, or the operator error if an operator fails.
pub fn apply(
    text: &str,
    spans: Vec<DetectionSpan>,
    resolver: &OperatorResolver<'_>,
    cipher: &SpanCipher,
) -> Result<AnonymizationReport> {
    let spans = resolve_overlaps(spans);

    let mut output = String::with_capacity(text.len());
    let mut counts = BTreeMap::new();
    let mut operators = BTreeMap::new();
    let mut position = 0;

    for span in &spans {
        let original = text.get(span.start..span.end).ok_or_else(|| {
            SecurePasteError::DetectionFailure(format!(
                "Span {}..{} ({}) is not a valid range of the input",
                span.start, span.end, span.category
            ))
        })?;

        let spec = resolver.resolve(&span.category);
        output.push_str(&text[position..span.start]);
        output.push_str(&apply_operator(&spec, original, cipher)?);
        position = span.end;

        *counts.entry(span.category.clone()).or_insert(0) += 1;
        operators.entry(span.category.clone()).or_insert_with(|| spec.kind());
    }
    output.push_str(&text[position..]);

    tracing::debug!(
        applied = spans.len(),
        input_len = text.len(),
        output_len = output.len(),
        "Rewrite finished"
    );

    Ok(AnonymizationReport {
        anonymized_text: output,
        counts,
        spans,
        operators,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::config::{AnonymizationConfig, AnonymizationRequest};
    use crate::anonymization::models::{DetectionMethod, OperatorKind};
    use crate::anonymization::resolver::OperatorDefaults;
    use crate::anonymization::validator::validate;

    fn span(category: &str, text: &str, start: usize, end: usize, score: f32) -> DetectionSpan {
        DetectionSpan::from_text(category, text, start, end, score, DetectionMethod::Semantic).unwrap()
    }

    fn config(json: &str) -> AnonymizationConfig {
        validate(&AnonymizationRequest::from_json(json).unwrap()).unwrap()
    }

    #[test]
    fn test_same_start_keeps_highest_score() {
        let text = "abcdefghij";
        let kept = resolve_overlaps(vec![
            span("LOW", text, 2, 8, 0.4),
            span("HIGH", text, 2, 5, 0.9),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].category, "HIGH");
    }

    #[test]
    fn test_same_start_same_score_keeps_longer() {
        let text = "abcdefghij";
        let kept = resolve_overlaps(vec![span("SHORT", text, 0, 3, 0.7), span("LONG", text, 0, 6, 0.7)]);
        assert_eq!(kept[0].category, "LONG");
    }

    #[test]
    fn test_nested_and_straddling_spans_dropped() {
        let text = "abcdefghijklmnop";
        let kept = resolve_overlaps(vec![
            span("OUTER", text, 0, 10, 0.5),
            span("NESTED", text, 2, 4, 0.9),
            span("STRADDLE", text, 8, 12, 0.9),
            span("ADJACENT", text, 10, 12, 0.5),
        ]);
        let categories: Vec<&str> = kept.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(categories, vec!["OUTER", "ADJACENT"]);
        assert!(kept.windows(2).all(|w| w[0].end <= w[1].start));
    }

    #[test]
    fn test_cursor_tracks_furthest_end() {
        let text = "abcdefghijklmnop";
        // the middle span is dropped but the cursor still comes from the first
        let kept = resolve_overlaps(vec![
            span("A", text, 0, 10, 0.5),
            span("B", text, 3, 6, 0.5),
            span("C", text, 7, 12, 0.5),
        ]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_apply_mixed_operators_without_drift() {
        let text = "a=SECRET1 b=SECRET2 c=SECRET3";
        let config = config(
            r#"{"entities":[
                {"type":"A","anonymization_method":"redact"},
                {"type":"B","anonymization_method":"replace","custom_replacement":"<a much longer marker>"},
                {"type":"C","anonymization_method":"mask"}
            ]}"#,
        );
        let defaults = OperatorDefaults::default();
        let resolver = OperatorResolver::new(&config, &defaults);
        let cipher = SpanCipher::generate();

        let report = apply(
            text,
            vec![
                span("C", text, 22, 29, 0.9),
                span("A", text, 2, 9, 0.9),
                span("B", text, 12, 19, 0.9),
            ],
            &resolver,
            &cipher,
        )
        .unwrap();

        assert_eq!(report.anonymized_text, "a= b=<a much longer marker> c=*******");
        assert_eq!(report.total(), 3);
        assert_eq!(report.operators.get("B"), Some(&OperatorKind::Replace));
    }

    #[test]
    fn test_counts_reflect_applied_spans() {
        let text = "token value here";
        let config = config(r#"{"entities":[{"type":"X","anonymization_method":"redact"},{"type":"Y","anonymization_method":"redact"}]}"#);
        let defaults = OperatorDefaults::default();
        let resolver = OperatorResolver::new(&config, &defaults);
        let cipher = SpanCipher::generate();

        let report = apply(
            text,
            vec![span("X", text, 0, 5, 0.9), span("Y", text, 0, 11, 0.6)],
            &resolver,
            &cipher,
        )
        .unwrap();

        assert_eq!(report.counts.get("X"), Some(&1));
        assert!(report.counts.get("Y").is_none());
        assert_eq!(report.anonymized_text, " value here");
    }

    #[test]
    fn test_no_spans_returns_text_unchanged() {
        let config = config(r#"{"entities":[]}"#);
        let defaults = OperatorDefaults::default();
        let resolver = OperatorResolver::new(&config, &defaults);
        let report = apply("héllo wörld", Vec::new(), &resolver, &SpanCipher::generate()).unwrap();
        assert_eq!(report.anonymized_text, "héllo wörld");
        assert!(report.counts.is_empty());
    }

    #[test]
    fn test_span_from_other_text_rejected() {
        let config = config(r#"{"entities":[]}"#);
        let defaults = OperatorDefaults::default();
        let resolver = OperatorResolver::new(&config, &defaults);
        let long = "a much longer text";
        let result = apply("short", vec![span("X", long, 3, 12, 0.9)], &resolver, &SpanCipher::generate());
        assert!(matches!(result, Err(SecurePasteError::DetectionFailure(_))));
    }
}

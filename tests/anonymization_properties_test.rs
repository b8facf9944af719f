//! Property tests over generated text: idempotence, non-overlap, length
//! accounting, threshold monotonicity and no-match round trips

use fake::faker::lorem::en::Words;
use fake::Fake;
use securepaste::anonymization::{AnonymizationConfig, AnonymizationEngine};
use securepaste::config::SecurePasteConfig;
use test_case::test_case;

const SECRETS: &[&str] = &[
    "password: mySecretPass123",
    "pwd=hunter2000",
    r#"token password="quoted Pass 99""#,
    "my pass is abcdef123",
    "login: alice password: s3cr3tpass",
    "password: password: hunter2000",
    "mail bob@example.com",
    "call 555-123-4567",
    "server 192.168.10.20",
];

fn engine() -> AnonymizationEngine {
    AnonymizationEngine::new(&SecurePasteConfig::default()).unwrap()
}

fn request(engine: &AnonymizationEngine, method: &str, threshold: f32) -> AnonymizationConfig {
    let json = format!(
        r#"{{"entities":[
            {{"type":"PASSWORD","anonymization_method":"{method}","custom_replacement":"<gone>"}},
            {{"type":"EMAIL_ADDRESS","anonymization_method":"{method}","custom_replacement":"<gone>"}},
            {{"type":"PHONE_NUMBER","anonymization_method":"{method}","custom_replacement":"<gone>"}},
            {{"type":"IP_ADDRESS","anonymization_method":"{method}","custom_replacement":"<gone>"}}
        ],"confidence_threshold":{threshold}}}"#
    );
    engine.validate_request(&json).unwrap()
}

/// Lorem words with secrets spliced in, one per line
fn generated_text(secret_count: usize) -> String {
    let mut lines = Vec::new();
    for secret in SECRETS.iter().cycle().take(secret_count) {
        let before: Vec<String> = Words(1..6).fake();
        lines.push(format!("{} {secret}", before.join(" ")));
    }
    let tail: Vec<String> = Words(3..10).fake();
    lines.push(tail.join(" "));
    lines.join("\n")
}

#[test]
fn test_no_match_text_round_trips() {
    let engine = engine();
    let config = request(&engine, "replace", 0.35);

    for _ in 0..20 {
        let words: Vec<String> = Words(5..40).fake();
        let text = words.join(" ");
        let report = engine.anonymize(&text, &config).unwrap();
        assert_eq!(report.anonymized_text, text);
        assert_eq!(report.total(), 0);
    }
}

#[test]
fn test_applied_spans_never_overlap() {
    let engine = engine();
    let config = request(&engine, "hash", 0.35);

    for count in 1..=SECRETS.len() * 2 {
        let text = generated_text(count);
        let report = engine.anonymize(&text, &config).unwrap();
        assert!(report.total() > 0);
        for pair in report.spans.windows(2) {
            assert!(pair[0].end <= pair[1].start, "{:?} overlaps {:?}", pair[0], pair[1]);
        }
    }
}

#[test_case("redact", 0 ; "redact removes the span")]
#[test_case("replace", "<gone>".len() ; "replace inserts the literal")]
fn test_length_accounting(method: &str, inserted: usize) {
    let engine = engine();
    let config = request(&engine, method, 0.35);
    let text = generated_text(SECRETS.len());

    let report = engine.anonymize(&text, &config).unwrap();
    let removed: usize = report.spans.iter().map(|s| s.end - s.start).sum();

    assert_eq!(
        report.anonymized_text.len(),
        text.len() - removed + inserted * report.total()
    );
}

#[test]
fn test_mask_preserves_length() {
    let engine = engine();
    let config = request(&engine, "mask", 0.35);
    let text = generated_text(SECRETS.len());

    let report = engine.anonymize(&text, &config).unwrap();
    assert!(report.total() > 0);
    assert_eq!(report.anonymized_text.chars().count(), text.chars().count());
}

#[test]
fn test_redaction_is_idempotent() {
    let engine = engine();
    let config = request(&engine, "redact", 0.35);

    for text in SECRETS {
        let once = engine.anonymize(text, &config).unwrap();
        assert!(once.total() > 0, "nothing detected in {text:?}");

        let twice = engine.anonymize(&once.anonymized_text, &config).unwrap();
        assert_eq!(twice.total(), 0, "{:?} still matches", once.anonymized_text);
        assert_eq!(twice.anonymized_text, once.anonymized_text);
    }
}

#[test]
fn test_threshold_monotonicity() {
    let engine = engine();
    let text = generated_text(SECRETS.len() * 2);

    let mut previous = usize::MAX;
    for step in 0..=10 {
        let threshold = step as f32 / 10.0;
        let spans = engine.detect(&text, &request(&engine, "redact", threshold)).unwrap();
        assert!(spans.iter().all(|s| s.score >= threshold));
        assert!(spans.len() <= previous, "threshold {threshold} found more spans");
        previous = spans.len();
    }
}

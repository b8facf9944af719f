//! Request validation
//!
//! Checks run in a fixed order and the first failure is returned. A request that
//! passes is converted into an [`AnonymizationConfig`] with typed operators.

use crate::anonymization::config::{
    AnonymizationConfig, AnonymizationRequest, CategoryConfig, CustomPatternRequest,
    PatternDescriptor, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_LANGUAGE,
};
use crate::anonymization::models::OperatorKind;
use crate::domain::ValidationError;

/// Lowest accepted per-rule score
pub const MIN_RULE_SCORE: f32 = 0.1;

/// Highest accepted per-rule score
pub const MAX_RULE_SCORE: f32 = 1.0;

/// Validate a request and convert it into an [`AnonymizationConfig`]
///
/// # Errors
///
/// Returns the first [`ValidationError`] found:
/// - `entities` missing
/// - an entity with an empty `type`
/// - a custom pattern missing `name`, `pattern` or `entity_type`
/// - a custom pattern whose regex does not compile
/// - a `confidence_score` outside `[0.1, 1.0]`
/// - an unknown `anonymization_method`
/// - a `confidence_threshold` outside `[0.0, 1.0]` or an empty `language`
pub fn validate(request: &AnonymizationRequest) -> Result<AnonymizationConfig, ValidationError> {
    let entities = request
        .entities
        .as_ref()
        .ok_or(ValidationError::MissingEntities)?;

    let mut categories = Vec::with_capacity(entities.len());
    for (index, entity) in entities.iter().enumerate() {
        if entity.entity_type.trim().is_empty() {
            return Err(ValidationError::EmptyEntityType { index });
        }
        let method = parse_method(
            entity.anonymization_method.as_deref(),
            || format!("entity '{}'", entity.entity_type),
        )?;
        categories.push(CategoryConfig {
            category: entity.entity_type.clone(),
            method,
            custom_replacement: entity.custom_replacement.clone(),
        });
    }

    let custom_patterns = request
        .custom_patterns
        .iter()
        .enumerate()
        .map(|(index, pattern)| validate_pattern(index, pattern))
        .collect::<Result<Vec<_>, _>>()?;

    let confidence_threshold = match request.confidence_threshold {
        Some(threshold) if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) => {
            return Err(ValidationError::ThresholdOutOfRange(threshold));
        }
        Some(threshold) => threshold,
        None => DEFAULT_CONFIDENCE_THRESHOLD,
    };

    let language = match request.language.as_deref() {
        Some(language) if language.trim().is_empty() => return Err(ValidationError::EmptyLanguage),
        Some(language) => language.to_string(),
        None => DEFAULT_LANGUAGE.to_string(),
    };

    Ok(AnonymizationConfig {
        categories,
        confidence_threshold,
        language,
        custom_patterns,
    })
}

fn validate_pattern(
    index: usize,
    pattern: &CustomPatternRequest,
) -> Result<PatternDescriptor, ValidationError> {
    for (field, value) in [
        ("name", &pattern.name),
        ("pattern", &pattern.pattern),
        ("entity_type", &pattern.entity_type),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingPatternField { index, field });
        }
    }

    fancy_regex::Regex::new(&pattern.pattern).map_err(|e| ValidationError::InvalidRegex {
        name: pattern.name.clone(),
        message: e.to_string(),
    })?;

    if let Some(score) = pattern.confidence_score {
        if !score.is_finite() || !(MIN_RULE_SCORE..=MAX_RULE_SCORE).contains(&score) {
            return Err(ValidationError::ScoreOutOfRange {
                name: pattern.name.clone(),
                value: score,
            });
        }
    }

    let method = parse_method(pattern.anonymization_method.as_deref(), || {
        format!("custom pattern '{}'", pattern.name)
    })?;

    Ok(PatternDescriptor {
        name: pattern.name.clone(),
        regex_source: pattern.pattern.clone(),
        category: pattern.entity_type.clone(),
        score: pattern.confidence_score,
        enabled: pattern.enabled.unwrap_or(true),
        context_hints: pattern.context.clone(),
        method,
        custom_replacement: pattern.custom_replacement.clone(),
    })
}

fn parse_method(
    method: Option<&str>,
    context: impl FnOnce() -> String,
) -> Result<Option<OperatorKind>, ValidationError> {
    method
        .map(|m| {
            m.parse::<OperatorKind>()
                .map_err(|_| ValidationError::InvalidOperator {
                    context: context(),
                    method: m.to_string(),
                })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::config::EntityRequest;

    fn request(json: &str) -> AnonymizationRequest {
        AnonymizationRequest::from_json(json).unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let config = validate(&request(r#"{"entities":[{"type":"PASSWORD","anonymization_method":"redact"}]}"#)).unwrap();
        assert_eq!(config.confidence_threshold, DEFAULT_CONFIDENCE_THRESHOLD);
        assert_eq!(config.language, "en");
        assert_eq!(config.categories[0].method, Some(OperatorKind::Redact));
    }

    #[test]
    fn test_missing_entities() {
        let request = AnonymizationRequest::default();
        assert_eq!(validate(&request).unwrap_err(), ValidationError::MissingEntities);
    }

    #[test]
    fn test_empty_entity_type() {
        let request = AnonymizationRequest {
            entities: Some(vec![
                EntityRequest {
                    entity_type: "PASSWORD".to_string(),
                    ..EntityRequest::default()
                },
                EntityRequest::default(),
            ]),
            ..AnonymizationRequest::default()
        };
        assert_eq!(
            validate(&request).unwrap_err(),
            ValidationError::EmptyEntityType { index: 1 }
        );
    }

    #[test]
    fn test_unknown_entity_method() {
        let err = validate(&request(r#"{"entities":[{"type":"PASSWORD","anonymization_method":"shred"}]}"#)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidOperator { ref method, .. } if method == "shred"));
    }

    #[test]
    fn test_invalid_regex() {
        let err = validate(&request(
            r#"{"entities":[],"custom_patterns":[{"name":"broken","pattern":"(","entity_type":"X"}]}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidRegex { ref name, .. } if name == "broken"));
    }

    #[test]
    fn test_missing_pattern_fields() {
        let err = validate(&request(
            r#"{"entities":[],"custom_patterns":[{"name":"n","pattern":"x"}]}"#,
        ))
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingPatternField {
                index: 0,
                field: "entity_type"
            }
        );
    }

    #[test]
    fn test_score_out_of_range() {
        for score in ["0.05", "1.5"] {
            let json = format!(
                r#"{{"entities":[],"custom_patterns":[{{"name":"n","pattern":"x","entity_type":"X","confidence_score":{score}}}]}}"#
            );
            assert!(matches!(
                validate(&request(&json)).unwrap_err(),
                ValidationError::ScoreOutOfRange { .. }
            ));
        }
    }

    #[test]
    fn test_score_bounds_inclusive() {
        for score in ["0.1", "1.0"] {
            let json = format!(
                r#"{{"entities":[],"custom_patterns":[{{"name":"n","pattern":"x","entity_type":"X","confidence_score":{score}}}]}}"#
            );
            assert!(validate(&request(&json)).is_ok());
        }
    }

    #[test]
    fn test_first_failure_wins() {
        // both the entity method and the pattern regex are invalid; entities are checked first
        let err = validate(&request(
            r#"{"entities":[{"type":"A","anonymization_method":"nope"}],"custom_patterns":[{"name":"n","pattern":"(","entity_type":"X"}]}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidOperator { .. }));
    }

    #[test]
    fn test_threshold_and_language() {
        assert_eq!(
            validate(&request(r#"{"entities":[],"confidence_threshold":1.2}"#)).unwrap_err(),
            ValidationError::ThresholdOutOfRange(1.2)
        );
        assert_eq!(
            validate(&request(r#"{"entities":[],"language":" "}"#)).unwrap_err(),
            ValidationError::EmptyLanguage
        );
    }

    #[test]
    fn test_pattern_descriptor_defaults() {
        let config = validate(&request(
            r#"{"entities":[],"custom_patterns":[{"name":"ticket","pattern":"TCK-\\d+","entity_type":"TICKET"}]}"#,
        ))
        .unwrap();
        let descriptor = &config.custom_patterns[0];
        assert!(descriptor.enabled);
        assert!(descriptor.score.is_none());
        assert!(descriptor.method.is_none());
    }
}

//! Built-in credential detection rules
//!
//! Every rule emits the `PASSWORD` category. Quoted and paired forms are
//! unambiguous and score high; the bare `password is value` form is the most
//! likely false positive and scores lowest, so the request threshold decides how
//! strict detection is. A paired `user: name password: value` line yields two
//! spans, one for the username and one for the password.

use super::PatternRule;
use crate::anonymization::models::PASSWORD_CATEGORY;

/// (name, regex, score)
const CREDENTIAL_RULES: &[(&str, &str, f32)] = &[
    (
        "password_assignment",
        r#"(?i)\b(?:password|pwd|pass)\b\s*[:=]\s*(?!(?:password|pwd|pass)\s*[:=])(?P<value>[^\s"']{6,})"#,
        0.8,
    ),
    (
        "password_is",
        r#"(?i)\b(?:password|pwd|pass)\s+is\s+(?P<value>[^\s"']{6,})"#,
        0.7,
    ),
    (
        "password_double_quoted",
        r#"(?i)\b(?:password|pwd|pass)\b\s*[:=]\s*"(?P<value>[^"\r\n]+)""#,
        0.9,
    ),
    (
        "password_single_quoted",
        r#"(?i)\b(?:password|pwd|pass)\b\s*[:=]\s*'(?P<value>[^'\r\n]+)'"#,
        0.9,
    ),
    (
        "paired_username",
        r#"(?i)\b(?:user(?:name)?|login)[ \t]*[:=][ \t]*(?P<value>[^\s"',;]+)(?=[ \t,;]+(?:password|pwd|pass)\b[ \t]*[:=][ \t]*[^\s"']{6,})"#,
        0.85,
    ),
    (
        "paired_credentials",
        r#"(?i)\b(?:user(?:name)?|login)[ \t]*[:=][ \t]*[^\s"',;]+[ \t,;]+(?:password|pwd|pass)\b[ \t]*[:=][ \t]*(?!(?:password|pwd|pass)\s*[:=])(?P<value>[^\s"']{6,})"#,
        0.85,
    ),
];

/// Compile the built-in credential rules
///
/// # Errors
///
/// Only fails if a built-in regex is broken, which the unit tests rule out.
pub fn builtin_rules() -> Result<Vec<PatternRule>, fancy_regex::Error> {
    CREDENTIAL_RULES
        .iter()
        .map(|(name, regex, score)| {
            PatternRule::new(*name, PASSWORD_CATEGORY, regex, *score, Vec::new())
        })
        .collect()
}

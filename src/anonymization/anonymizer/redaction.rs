//! Redact and replace operators

/// Elide the value entirely
pub fn redact(_value: &str) -> String {
    String::new()
}

/// Substitute a fixed literal for the value
pub fn replace(_value: &str, replacement: &str) -> String {
    replacement.to_string()
}

//! Span operators
//!
//! One function per operator kind, dispatched by [`apply_operator`]. Every
//! operator takes the matched text of one span and returns its replacement.

pub mod encryption;
pub mod hash;
pub mod mask;
pub mod redaction;

use crate::anonymization::models::OperatorSpec;
use crate::domain::Result;
use encryption::SpanCipher;

/// Transform `value` with the operator described by `spec`
///
/// # Errors
///
/// Only `Encrypt` can fail, if the cipher rejects the input.
pub fn apply_operator(spec: &OperatorSpec, value: &str, cipher: &SpanCipher) -> Result<String> {
    Ok(match spec {
        OperatorSpec::Redact => redaction::redact(value),
        OperatorSpec::Replace { replacement } => redaction::replace(value, replacement),
        OperatorSpec::Mask {
            mask_char,
            count,
            anchor,
        } => mask::mask(value, *mask_char, *count, *anchor),
        OperatorSpec::Hash => hash::sha256_hex(value),
        OperatorSpec::Encrypt => cipher.encrypt(value)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::MaskAnchor;

    #[test]
    fn test_apply_each_operator() {
        let cipher = SpanCipher::generate();
        let value = "hunter2000";

        assert_eq!(apply_operator(&OperatorSpec::Redact, value, &cipher).unwrap(), "");
        assert_eq!(
            apply_operator(
                &OperatorSpec::Replace {
                    replacement: "[PW]".to_string()
                },
                value,
                &cipher
            )
            .unwrap(),
            "[PW]"
        );
        assert_eq!(
            apply_operator(
                &OperatorSpec::Mask {
                    mask_char: '*',
                    count: 7,
                    anchor: MaskAnchor::Start
                },
                value,
                &cipher
            )
            .unwrap(),
            "*******000"
        );
        assert_eq!(apply_operator(&OperatorSpec::Hash, value, &cipher).unwrap().len(), 64);

        let token = apply_operator(&OperatorSpec::Encrypt, value, &cipher).unwrap();
        assert_ne!(token, value);
        assert_eq!(cipher.decrypt(&token).unwrap(), value);
    }
}

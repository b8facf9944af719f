//! Key material held in settings
//!
//! The `encrypt` operator key comes from TOML or `SECUREPASTE_ENCRYPTION_KEY`
//! and is kept as a [`SecretString`]. The value is zeroed on drop, `Debug`
//! shows `[REDACTED]`, and serializing settings writes a placeholder instead
//! of the key.
//!
//! ```rust
//! use securepaste::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let key = secret_string("c2VjcmV0".to_string());
//! assert_eq!(key.expose_secret().as_str(), "c2VjcmV0");
//! assert!(!format!("{key:?}").contains("c2VjcmV0"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Written in place of a secret when settings are serialized
pub const SERIALIZED_PLACEHOLDER: &str = "[REDACTED]";

/// Secret text, zeroed on drop
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl SecretValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Still contains a `${VAR}` reference
    pub fn is_placeholder(&self) -> bool {
        self.0.contains("${")
    }
}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(SERIALIZED_PLACEHOLDER)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Secret string from settings; read it with `expose_secret()`
pub type SecretString = Secret<SecretValue>;

/// Wrap `value` as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_debug_redacted() {
        let secret = secret_string("sensitive-data".to_string());
        let debug_output = format!("{secret:?}");
        assert!(!debug_output.contains("sensitive-data"));
        assert!(debug_output.contains("REDACTED"));
    }

    #[test]
    fn test_checks() {
        assert!(secret_string("  ".to_string()).expose_secret().is_blank());
        assert!(secret_string("${KEY}".to_string()).expose_secret().is_placeholder());
        assert!(!secret_string("a2V5".to_string()).expose_secret().is_placeholder());
    }

    #[test]
    fn test_serde_never_writes_secret() {
        #[derive(Serialize, Deserialize)]
        struct Section {
            key: SecretString,
        }

        let section: Section = serde_json::from_str(r#"{"key":"test123"}"#).unwrap();
        assert_eq!(section.key.expose_secret().as_str(), "test123");

        let json = serde_json::to_string(&section).unwrap();
        assert!(!json.contains("test123"));
        assert!(json.contains(SERIALIZED_PLACEHOLDER));
    }
}

//! Encrypt operator
//!
//! AES-256-GCM with a fresh 96-bit nonce per value. Tokens are standard base64
//! of `nonce || ciphertext || tag`, so equal values encrypt to different tokens.

use crate::config::SecretString;
use crate::domain::{Result, SecurePasteError};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::ExposeSecret;
use std::fmt;
use zeroize::Zeroizing;

/// Key length in bytes
pub const KEY_LEN: usize = 32;

/// Nonce length in bytes
pub const NONCE_LEN: usize = 12;

/// Keyed cipher for span values
#[derive(Clone)]
pub struct SpanCipher {
    cipher: Aes256Gcm,
    ephemeral: bool,
}

impl SpanCipher {
    /// Create a cipher from a base64-encoded 32-byte key
    ///
    /// # Errors
    ///
    /// Returns [`SecurePasteError::Settings`] if the key is not valid base64 or
    /// does not decode to 32 bytes.
    pub fn from_base64_key(key: &SecretString) -> Result<Self> {
        let encoded = key.expose_secret().as_str();
        let bytes = Zeroizing::new(
            STANDARD
                .decode(encoded.trim())
                .map_err(|e| SecurePasteError::Settings(format!("Encryption key is not valid base64: {e}")))?,
        );
        if bytes.len() != KEY_LEN {
            return Err(SecurePasteError::Settings(format!(
                "Encryption key must decode to {KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let cipher = Aes256Gcm::new_from_slice(&bytes)
            .map_err(|e| SecurePasteError::Settings(format!("Invalid encryption key: {e}")))?;
        Ok(Self {
            cipher,
            ephemeral: false,
        })
    }

    /// Create a cipher with a random key that lives as long as this value
    pub fn generate() -> Self {
        let key = Zeroizing::new(random_key());
        Self {
            cipher: Aes256Gcm::new(&(*key).into()),
            ephemeral: true,
        }
    }

    /// Generate a new base64-encoded key suitable for `encryption.key`
    pub fn generate_key_base64() -> String {
        let key = Zeroizing::new(random_key());
        STANDARD.encode(*key)
    }

    /// Whether the key was generated for this process only
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    /// Encrypt `value` into a base64 token
    pub fn encrypt(&self, value: &str) -> Result<String> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), value.as_bytes())
            .map_err(|_| SecurePasteError::Operator("Encryption failed".to_string()))?;

        let mut token = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        token.extend_from_slice(&nonce);
        token.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(token))
    }

    /// Decrypt a token produced by [`encrypt`](Self::encrypt)
    ///
    /// # Errors
    ///
    /// Returns [`SecurePasteError::Operator`] if the token is malformed or was
    /// encrypted under a different key.
    pub fn decrypt(&self, token: &str) -> Result<String> {
        let bytes = STANDARD
            .decode(token.trim())
            .map_err(|e| SecurePasteError::Operator(format!("Token is not valid base64: {e}")))?;
        if bytes.len() <= NONCE_LEN {
            return Err(SecurePasteError::Operator("Token is too short".to_string()));
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        let plaintext = Zeroizing::new(
            self.cipher
                .decrypt(Nonce::from_slice(nonce), ciphertext)
                .map_err(|_| {
                    SecurePasteError::Operator("Token does not decrypt under this key".to_string())
                })?,
        );

        String::from_utf8(plaintext.to_vec())
            .map_err(|_| SecurePasteError::Operator("Decrypted token is not UTF-8".to_string()))
    }
}

fn random_key() -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut key);
    key
}

impl fmt::Debug for SpanCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpanCipher")
            .field("algorithm", &"AES-256-GCM")
            .field("ephemeral", &self.ephemeral)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[test]
    fn test_roundtrip_with_configured_key() {
        let key = secret_string(SpanCipher::generate_key_base64());
        let cipher = SpanCipher::from_base64_key(&key).unwrap();
        assert!(!cipher.is_ephemeral());

        let token = cipher.encrypt("hunter2000").unwrap();
        assert_eq!(cipher.decrypt(&token).unwrap(), "hunter2000");

        // same key, new instance
        let again = SpanCipher::from_base64_key(&key).unwrap();
        assert_eq!(again.decrypt(&token).unwrap(), "hunter2000");
    }

    #[test]
    fn test_nonce_randomized() {
        let cipher = SpanCipher::generate();
        assert_ne!(cipher.encrypt("same").unwrap(), cipher.encrypt("same").unwrap());
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = SpanCipher::generate().encrypt("hunter2000").unwrap();
        let other = SpanCipher::generate();
        assert!(matches!(other.decrypt(&token), Err(SecurePasteError::Operator(_))));
        assert!(other.decrypt("AAAA").is_err());
    }

    #[test]
    fn test_bad_keys() {
        assert!(SpanCipher::from_base64_key(&secret_string("not base64!".to_string())).is_err());
        assert!(SpanCipher::from_base64_key(&secret_string(STANDARD.encode([1u8; 16]))).is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let debug = format!("{:?}", SpanCipher::generate());
        assert!(debug.contains("AES-256-GCM"));
    }
}

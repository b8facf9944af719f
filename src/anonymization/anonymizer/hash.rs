//! Hash operator

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of `value`
pub fn sha256_hex(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

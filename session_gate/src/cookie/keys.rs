//! Key derivation for the session cookie.
//!
//! Operators supply passphrases of any length; both keys are the SHA-256
//! digest of their secret. Derivation depends on nothing but the secret, so
//! cookies issued before a restart keep verifying after it.

use std::fmt;

use sha2::{Digest, Sha256};

pub const KEY_LEN: usize = 32;

/// HMAC-SHA256 key used to sign cookie payloads
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey([u8; KEY_LEN]);

/// AES-256-GCM key used to seal cookie payloads
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey([u8; KEY_LEN]);

impl SigningKey {
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl EncryptionKey {
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

fn digest_secret(secret: &str) -> [u8; KEY_LEN] {
    Sha256::digest(secret.as_bytes()).into()
}

pub fn derive_signing_key(secret: &str) -> SigningKey {
    SigningKey(digest_secret(secret))
}

pub fn derive_encryption_key(secret: &str) -> EncryptionKey {
    EncryptionKey(digest_secret(secret))
}

//! Signed, optionally encrypted, session cookie values
//!
//! Wire format, stable across restarts:
//!
//! * signed: `b64(json) "." b64(hmac(json))`
//! * signed and encrypted: `b64(nonce || aes_gcm(json)) "." b64(hmac(nonce || aes_gcm(json)))`
//!
//! `b64` is unpadded base64url and `hmac` is HMAC-SHA256 under the signing key.

use hmac::{Hmac, Mac};
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::CookieError;
use super::keys::{EncryptionKey, SigningKey, derive_encryption_key, derive_signing_key};
use super::types::SessionPayload;
use crate::utils::{base64url_decode, base64url_encode, gen_random_bytes};

type HmacSha256 = Hmac<Sha256>;

const SEPARATOR: char = '.';

#[derive(Clone, Debug)]
pub struct CookieCodec {
    signing_key: SigningKey,
    encryption_key: Option<EncryptionKey>,
}

impl CookieCodec {
    pub fn new(signing_key: SigningKey, encryption_key: Option<EncryptionKey>) -> Self {
        Self {
            signing_key,
            encryption_key,
        }
    }

    pub fn from_secrets(signing_secret: &str, encryption_secret: Option<&str>) -> Self {
        Self::new(
            derive_signing_key(signing_secret),
            encryption_secret.map(derive_encryption_key),
        )
    }

    pub fn is_encrypted(&self) -> bool {
        self.encryption_key.is_some()
    }

    pub fn encode(&self, payload: &SessionPayload) -> Result<String, CookieError> {
        let json = serde_json::to_vec(payload)?;
        let body = match &self.encryption_key {
            Some(key) => seal(key, json)?,
            None => json,
        };
        let tag = self.sign(&body)?;
        Ok(format!(
            "{}{SEPARATOR}{}",
            base64url_encode(&body),
            base64url_encode(&tag)
        ))
    }

    /// Returns the payload only if the value verifies, decrypts and parses.
    ///
    /// Every failure is reported the same way, as `None`.
    pub fn decode(&self, value: &str) -> Option<SessionPayload> {
        match self.try_decode(value) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::debug!("Discarding session cookie: {e}");
                None
            }
        }
    }

    fn try_decode(&self, value: &str) -> Result<SessionPayload, CookieError> {
        let (body, tag) = value
            .split_once(SEPARATOR)
            .ok_or_else(|| CookieError::Format("missing signature".to_string()))?;
        let body = base64url_decode(body)?;
        let tag = base64url_decode(tag)?;

        self.verify(&body, &tag)?;

        let json = match &self.encryption_key {
            Some(key) => open(key, body)?,
            None => body,
        };
        Ok(serde_json::from_slice(&json)?)
    }

    fn mac(&self) -> Result<HmacSha256, CookieError> {
        HmacSha256::new_from_slice(self.signing_key.as_bytes())
            .map_err(|e| CookieError::Crypto(e.to_string()))
    }

    fn sign(&self, body: &[u8]) -> Result<Vec<u8>, CookieError> {
        let mut mac = self.mac()?;
        mac.update(body);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn verify(&self, body: &[u8], tag: &[u8]) -> Result<(), CookieError> {
        let expected = self.sign(body)?;
        if bool::from(expected.as_slice().ct_eq(tag)) {
            Ok(())
        } else {
            Err(CookieError::Signature)
        }
    }
}

fn aead_key(key: &EncryptionKey) -> Result<LessSafeKey, CookieError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key.as_bytes())
        .map_err(|_| CookieError::Crypto("invalid encryption key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

fn seal(key: &EncryptionKey, mut in_out: Vec<u8>) -> Result<Vec<u8>, CookieError> {
    let key = aead_key(key)?;
    let nonce_bytes = gen_random_bytes::<NONCE_LEN>()?;
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce_bytes),
        Aad::empty(),
        &mut in_out,
    )?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&in_out);
    Ok(sealed)
}

fn open(key: &EncryptionKey, sealed: Vec<u8>) -> Result<Vec<u8>, CookieError> {
    if sealed.len() < NONCE_LEN + AES_256_GCM.tag_len() {
        return Err(CookieError::Format("sealed payload too short".to_string()));
    }
    let key = aead_key(key)?;
    let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce)?;
    let mut in_out = ciphertext.to_vec();
    let plaintext = key.open_in_place(nonce, Aad::empty(), &mut in_out)?;
    Ok(plaintext.to_vec())
}

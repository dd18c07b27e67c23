use thiserror::Error;

use crate::utils::UtilError;

/// Failures inside the cookie codec.
///
/// Decode failures never leave the codec: [`super::CookieCodec::decode`]
/// folds them into "no session data". Only encoding and header rendering
/// report these to callers.
#[derive(Debug, Error, Clone)]
pub enum CookieError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Invalid cookie format: {0}")]
    Format(String),

    #[error("Signature mismatch")]
    Signature,

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Cookie header error: {0}")]
    Header(String),

    #[error("Invalid cookie attribute: {0}")]
    Attribute(String),

    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}

impl From<serde_json::Error> for CookieError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

impl From<ring::error::Unspecified> for CookieError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::Crypto("AEAD operation failed".to_string())
    }
}

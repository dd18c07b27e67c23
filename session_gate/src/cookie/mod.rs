mod attributes;
mod codec;
mod errors;
mod keys;
mod types;

pub use attributes::{CookieAttributes, SameSite};
pub use codec::CookieCodec;
pub use errors::CookieError;
pub use keys::{EncryptionKey, SigningKey, derive_encryption_key, derive_signing_key};
pub use types::SessionPayload;

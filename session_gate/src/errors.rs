use thiserror::Error;

use crate::config::ConfigError;
use crate::cookie::CookieError;
use crate::store::StoreError;
use crate::title::TitleError;

/// Startup failures. Any of these leaves the deployment unusable.
#[derive(Debug, Error, Clone)]
pub enum GateError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cookie error: {0}")]
    Cookie(#[from] CookieError),

    #[error("Session store error: {0}")]
    Store(#[from] StoreError),

    #[error("Title lookup error: {0}")]
    Title(#[from] TitleError),
}

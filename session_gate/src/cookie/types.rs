use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session fields carried in the signed cookie.
///
/// Fields absent from a decoded cookie come back empty; the validator treats
/// an empty `auth_type`, `session_id` or `user_agent` as missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    /// Identity provider used at login
    #[serde(default)]
    pub auth_type: String,
    /// Key of the session record in the shared store
    #[serde(default)]
    pub session_id: String,
    /// `User-Agent` captured at login
    #[serde(default)]
    pub user_agent: String,
    /// Session creation time in seconds since the epoch
    #[serde(default)]
    pub timestamp: i64,
}

impl SessionPayload {
    pub fn new(
        auth_type: impl Into<String>,
        session_id: impl Into<String>,
        user_agent: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            auth_type: auth_type.into(),
            session_id: session_id.into(),
            user_agent: user_agent.into(),
            timestamp,
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    pub(crate) fn is_complete(&self) -> bool {
        !self.auth_type.is_empty() && !self.session_id.is_empty() && !self.user_agent.is_empty()
    }
}

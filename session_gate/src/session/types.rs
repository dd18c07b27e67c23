use std::fmt;

use http::HeaderMap;

use crate::cookie::SessionPayload;

/// Outcome of validating a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow(SessionPayload),
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }
}

/// Which check turned a request away.
///
/// For diagnostics only. Callers must answer every reason with the same
/// client-visible response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    MissingUserAgent,
    MissingCookie,
    InvalidCookie,
    IncompleteSession,
    UserAgentMismatch,
    SessionNotFound,
    StoreTimeout,
    StoreUnavailable,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            DenyReason::MissingUserAgent => "missing user agent header",
            DenyReason::MissingCookie => "missing session cookie",
            DenyReason::InvalidCookie => "session cookie failed verification",
            DenyReason::IncompleteSession => "session cookie lacks required fields",
            DenyReason::UserAgentMismatch => "user agent mismatch",
            DenyReason::SessionNotFound => "session not found in store",
            DenyReason::StoreTimeout => "session store timed out",
            DenyReason::StoreUnavailable => "session store unavailable",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// No session id in the cookie; nothing to do
    NoSession,
    /// Cookie cleared and store record deleted (or already gone)
    LoggedOut,
    /// Cookie cleared, store deletion failed; the record lingers until it expires
    StoreDeleteFailed,
    /// The clearing cookie could not be produced
    CookieNotCleared,
}

/// Result of a logout. The caller always answers with the redirect page,
/// attaching `headers` (which carry the clearing `Set-Cookie` when produced).
#[derive(Debug, Clone)]
pub struct LogoutResponse {
    pub headers: HeaderMap,
    pub outcome: LogoutOutcome,
}

impl LogoutResponse {
    pub(super) fn new(outcome: LogoutOutcome) -> Self {
        Self {
            headers: HeaderMap::new(),
            outcome,
        }
    }

    pub fn cookie_cleared(&self) -> bool {
        matches!(
            self.outcome,
            LogoutOutcome::LoggedOut | LogoutOutcome::StoreDeleteFailed
        )
    }
}

use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Privileged upstream credential (Tradovate access token).
///
/// Has no `Serialize` impl and its `Debug` output is redacted. Read the raw
/// value with `expose` only when talking to Tradovate.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw token, for building upstream Authorization headers only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Session record handed to the directory by the login flow
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub username: String,
    pub user_id: Option<i64>,
    pub access_token: Credential,
    pub md_access_token: Option<Credential>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NewSession {
    /// Builds a record whose lifetime starts at `now`
    pub fn new(
        username: String,
        user_id: Option<i64>,
        access_token: Credential,
        md_access_token: Option<Credential>,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            username,
            user_id,
            access_token,
            md_access_token,
            created_at: now,
            expires_at: now
                .checked_add_signed(lifetime)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }
}

/// A live session held by the directory
#[derive(Debug, Clone, PartialEq)]
pub struct SessionModel {
    pub id: String, // Opaque identifier, also the cookie value
    pub username: String,
    pub user_id: Option<i64>,
    pub access_token: Credential,
    pub md_access_token: Option<Credential>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl SessionModel {
    pub fn from_new(id: String, session: NewSession, now: DateTime<Utc>) -> Self {
        Self {
            id,
            username: session.username,
            user_id: session.user_id,
            access_token: session.access_token,
            md_access_token: session.md_access_token,
            created_at: session.created_at,
            expires_at: session.expires_at,
            last_activity: now,
        }
    }

    /// Checks if the session lifetime has passed at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Time elapsed since the last successful lookup
    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_activity
    }

    /// Updates the last activity timestamp
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }
}

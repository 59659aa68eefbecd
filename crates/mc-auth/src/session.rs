use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The triple `mc-client` actually consumes: everything the auth chain
/// produces beyond this (Xbox tokens, XSTS tokens, refresh token) stays
/// inside `mc-auth`.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub uuid: Uuid,
    pub username: String,
    pub expires_at: SystemTime,
}

impl AuthSession {
    #[must_use]
    pub fn is_valid(&self, buffer: Duration) -> bool {
        SystemTime::now() + buffer < self.expires_at
    }
}

/// The on-disk record, a superset of [`AuthSession`] carrying the refresh
/// token needed to silently renew it, plus a schema version so the loader
/// can detect and migrate older formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedSession {
    pub schema_version: u32,
    pub access_token: String,
    pub refresh_token: String,
    pub uuid: Uuid,
    pub username: String,
    pub expires_at_unix: i64,
}

pub const CURRENT_SCHEMA_VERSION: u32 = 2;

impl CachedSession {
    #[must_use]
    pub fn new(
        access_token: String,
        refresh_token: String,
        uuid: Uuid,
        username: String,
        expires_at: SystemTime,
    ) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            access_token,
            refresh_token,
            uuid,
            username,
            expires_at_unix: expires_at
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0),
        }
    }

    #[must_use]
    pub fn expires_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.expires_at_unix.max(0) as u64)
    }

    #[must_use]
    pub fn is_valid(&self, buffer: Duration) -> bool {
        SystemTime::now() + buffer < self.expires_at()
    }

    #[must_use]
    pub fn to_session(&self) -> AuthSession {
        AuthSession {
            access_token: self.access_token.clone(),
            uuid: self.uuid,
            username: self.username.clone(),
            expires_at: self.expires_at(),
        }
    }
}

/// The legacy on-disk format this project's earliest versions wrote: just a
/// bare refresh token, with everything else obtained by immediately
/// refreshing on load. `FileCredentialStore::load` recognizes and migrates
/// this shape transparently (spec open question: migration is mandatory,
/// not opt-in).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacySession {
    pub refresh_token: String,
}

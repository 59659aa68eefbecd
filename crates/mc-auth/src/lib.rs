//! The Microsoft → Xbox Live → XSTS → Minecraft-services authentication
//! chain, the Mojang session-server join, and an on-disk session cache.
//!
//! `mc-client` consumes only [`AuthSession`] — everything upstream of it
//! (Xbox tokens, XSTS tokens, the Microsoft refresh token) is this crate's
//! business. Per this workspace's scope, browser launching and SRV
//! resolution are left to the caller and to `mc-client` respectively; this
//! crate only builds the authorize URL and listens for its redirect.

pub mod config;
pub mod error;
pub mod minecraft;
pub mod oauth;
pub mod session;
pub mod sessionserver;
pub mod store;
pub mod xbox;

pub use config::AuthConfig;
pub use error::{AuthError, Result, XstsFailure};
pub use session::{AuthSession, CachedSession};
pub use store::{CredentialStore, FileCredentialStore, StoredSession};

use md5::{Digest, Md5};
use uuid::Uuid;

/// Run the full interactive chain: wait for the user to complete the
/// Microsoft OAuth2 consent prompt (the caller is responsible for opening
/// [`oauth::authorize_url`] in a browser), then walk Xbox Live → XSTS →
/// Minecraft-services → entitlement → profile.
pub async fn login_with_microsoft(http: &reqwest::Client, config: &AuthConfig) -> Result<(AuthSession, String)> {
    let (listener, bound_port) = oauth::bind_redirect_listener(config.redirect_port).await?;
    let (authorize_url, redirect_uri) = oauth::authorize_url(config, bound_port);
    tracing::info!(%authorize_url, "open this URL in a browser to sign in");

    let code = oauth::await_authorization_code(&listener).await?;
    let tokens = oauth::exchange_code(http, config, &code, &redirect_uri).await?;

    let session = complete_chain_from_microsoft_token(http, &tokens.access_token).await?;
    Ok((session, tokens.refresh_token))
}

/// Refresh an expired session using a previously stored Microsoft refresh
/// token, replaying the Xbox/XSTS/Minecraft-services hops without
/// re-prompting the user.
pub async fn refresh(
    http: &reqwest::Client,
    config: &AuthConfig,
    refresh_token: &str,
) -> Result<(AuthSession, String)> {
    let tokens = oauth::refresh_token(http, config, refresh_token).await?;
    let session = complete_chain_from_microsoft_token(http, &tokens.access_token).await?;
    Ok((session, tokens.refresh_token))
}

async fn complete_chain_from_microsoft_token(
    http: &reqwest::Client,
    microsoft_access_token: &str,
) -> Result<AuthSession> {
    let xbl = xbox::authenticate_xbox_live(http, microsoft_access_token).await?;
    let xsts = xbox::authorize_xsts(http, &xbl.token).await?;
    let identity_token = xbox::identity_token(&xsts);

    let mc_login = minecraft::login_with_xbox(http, &identity_token).await?;
    minecraft::check_entitlements(http, &mc_login.access_token).await?;
    let profile = minecraft::fetch_profile(http, &mc_login.access_token).await?;

    Ok(AuthSession {
        access_token: mc_login.access_token,
        uuid: profile.id,
        username: profile.name,
        expires_at: minecraft::expires_at_from_now(mc_login.expires_in),
    })
}

/// Load a cached session for `account`, refreshing it (and migrating a
/// legacy-format record, or an expired current-format one) as needed, and
/// persisting whatever the chain produces back to `store`.
pub async fn load_or_refresh(
    http: &reqwest::Client,
    config: &AuthConfig,
    store: &impl CredentialStore,
    account: &str,
) -> Result<AuthSession> {
    match store.load(account)? {
        Some(StoredSession::Current(cached)) if cached.is_valid(config.session_expiry_buffer) => {
            Ok(cached.to_session())
        }
        Some(StoredSession::Current(cached)) => {
            refresh_and_store(http, config, store, account, &cached.refresh_token).await
        }
        Some(StoredSession::Legacy(legacy)) => {
            refresh_and_store(http, config, store, account, &legacy.refresh_token).await
        }
        None => {
            let (session, refresh_token) = login_with_microsoft(http, config).await?;
            persist(store, account, &session, &refresh_token)?;
            Ok(session)
        }
    }
}

async fn refresh_and_store(
    http: &reqwest::Client,
    config: &AuthConfig,
    store: &impl CredentialStore,
    account: &str,
    refresh_token: &str,
) -> Result<AuthSession> {
    let (session, new_refresh_token) = refresh(http, config, refresh_token).await?;
    persist(store, account, &session, &new_refresh_token)?;
    Ok(session)
}

fn persist(
    store: &impl CredentialStore,
    account: &str,
    session: &AuthSession,
    refresh_token: &str,
) -> Result<()> {
    let cached = CachedSession::new(
        session.access_token.clone(),
        refresh_token.to_string(),
        session.uuid,
        session.username.clone(),
        session.expires_at,
    );
    store.save(account, &cached)
}

/// Offline-mode UUID: a deterministic id derived from the username, used
/// when no online-mode session is available. Matches vanilla's
/// `UUID.nameUUIDFromBytes(("OfflinePlayer:" + name).getBytes(UTF_8))` — the
/// MD5 digest of the name bytes alone (no namespace UUID prepended, unlike
/// RFC 4122 v3) with the version/variant bits forced to mark it a v3 id.
#[must_use]
pub fn offline_uuid(username: &str) -> Uuid {
    let name = format!("OfflinePlayer:{username}");
    let mut digest: [u8; 16] = Md5::digest(name.as_bytes()).into();
    digest[6] = (digest[6] & 0x0f) | 0x30;
    digest[8] = (digest[8] & 0x3f) | 0x80;
    Uuid::from_bytes(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_uuid_is_deterministic() {
        assert_eq!(offline_uuid("Notch"), offline_uuid("Notch"));
        assert_ne!(offline_uuid("Notch"), offline_uuid("jeb_"));
    }
}

//! The `api.minecraftservices.com` hops: exchanging the Xbox identity token
//! for a Minecraft access token, then checking entitlement, profile and the
//! chat-signing certificate (spec §6).

use std::time::{Duration, SystemTime};

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{AuthError, Result};

const LOGIN_WITH_XBOX_URL: &str = "https://api.minecraftservices.com/authentication/login_with_xbox";
const ENTITLEMENTS_URL: &str = "https://api.minecraftservices.com/entitlements/mcstore";
const PROFILE_URL: &str = "https://api.minecraftservices.com/minecraft/profile";
const CERTIFICATES_URL: &str = "https://api.minecraftservices.com/player/certificates";

#[derive(Debug, Deserialize)]
pub struct MinecraftLoginResponse {
    pub access_token: String,
    pub expires_in: u64,
}

pub async fn login_with_xbox(
    http: &reqwest::Client,
    identity_token: &str,
) -> Result<MinecraftLoginResponse> {
    let response = http
        .post(LOGIN_WITH_XBOX_URL)
        .json(&json!({ "identityToken": identity_token }))
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::HttpStatus { status, body });
    }

    Ok(response.json().await?)
}

#[derive(Debug, Deserialize)]
struct EntitlementsResponse {
    items: Vec<EntitlementItem>,
}

#[derive(Debug, Deserialize)]
struct EntitlementItem {
    name: String,
}

/// Confirm the account owns both `product_minecraft` and `game_minecraft` —
/// accounts that only purchased one (e.g. a gifted copy pending transfer)
/// must not be treated as fully entitled.
pub async fn check_entitlements(http: &reqwest::Client, access_token: &str) -> Result<()> {
    let response = http
        .get(ENTITLEMENTS_URL)
        .bearer_auth(access_token)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::HttpStatus { status, body });
    }

    let parsed: EntitlementsResponse = response.json().await?;
    let names: Vec<&str> = parsed.items.iter().map(|item| item.name.as_str()).collect();

    if names.contains(&"product_minecraft") && names.contains(&"game_minecraft") {
        Ok(())
    } else {
        Err(AuthError::NoEntitlement)
    }
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
}

pub async fn fetch_profile(http: &reqwest::Client, access_token: &str) -> Result<Profile> {
    let response = http.get(PROFILE_URL).bearer_auth(access_token).send().await?;

    let status = response.status();
    if status.as_u16() == 404 {
        return Err(AuthError::NoProfile);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json().await?)
}

#[derive(Debug, Deserialize)]
pub struct ChatSigningCertificate {
    #[serde(rename = "publicKeySignatureV2")]
    pub public_key_signature: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: String,
}

/// Fetch the short-lived key pair used to sign chat messages. Not required
/// to join a server, but part of the same Minecraft-services surface.
pub async fn fetch_chat_signing_certificate(
    http: &reqwest::Client,
    access_token: &str,
) -> Result<ChatSigningCertificate> {
    let response = http
        .post(CERTIFICATES_URL)
        .bearer_auth(access_token)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::HttpStatus { status, body });
    }

    Ok(response.json().await?)
}

#[must_use]
pub fn expires_at_from_now(expires_in: u64) -> SystemTime {
    SystemTime::now() + Duration::from_secs(expires_in)
}

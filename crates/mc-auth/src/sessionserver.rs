//! The Mojang session-server `join` call (spec §6), performed by the client
//! right before sending its Encryption-Response — this is what lets the
//! server's own session-server query confirm the player's identity.

use serde_json::json;
use uuid::Uuid;

use crate::error::{AuthError, Result};

const JOIN_URL: &str = "https://sessionserver.mojang.com/session/minecraft/join";

/// Tell Mojang's session server this account is joining a server identified
/// by `server_hash` (see `mc_protocol::crypto::server_hash`).
pub async fn join(
    http: &reqwest::Client,
    access_token: &str,
    uuid: Uuid,
    server_hash: &str,
) -> Result<()> {
    let response = http
        .post(JOIN_URL)
        .json(&json!({
            "accessToken": access_token,
            "selectedProfile": uuid.simple().to_string(),
            "serverId": server_hash,
        }))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(AuthError::HttpStatus { status, body })
    }
}

//! Xbox Live user authentication and XSTS authorization (spec §6), the two
//! hops between a Microsoft access token and the "XBL3.0" identity token
//! `api.minecraftservices.com` expects.

use serde::Deserialize;
use serde_json::json;

use crate::error::{AuthError, Result, XstsFailure};

const XBL_AUTHENTICATE_URL: &str = "https://user.auth.xboxlive.com/user/authenticate";
const XSTS_AUTHORIZE_URL: &str = "https://xsts.auth.xboxlive.com/xsts/authorize";

#[derive(Debug, Deserialize)]
struct DisplayClaims {
    xui: Vec<Xui>,
}

#[derive(Debug, Deserialize)]
struct Xui {
    uhs: String,
}

#[derive(Debug, Deserialize)]
struct XboxTokenResponse {
    #[serde(rename = "Token")]
    token: String,
    #[serde(rename = "DisplayClaims")]
    display_claims: DisplayClaims,
}

#[derive(Debug, Deserialize)]
struct XstsErrorResponse {
    #[serde(rename = "XErr")]
    xerr: i64,
}

/// A bearer token plus the "user hash" it was issued under — both are
/// needed to build the `XBL3.0 x=<uhs>;<token>` identity token.
#[derive(Debug, Clone)]
pub struct XboxToken {
    pub token: String,
    pub user_hash: String,
}

pub async fn authenticate_xbox_live(
    http: &reqwest::Client,
    microsoft_access_token: &str,
) -> Result<XboxToken> {
    let body = json!({
        "Properties": {
            "AuthMethod": "RPS",
            "SiteName": "user.auth.xboxlive.com",
            "RpsTicket": format!("d={microsoft_access_token}"),
        },
        "RelyingParty": "http://auth.xboxlive.com",
        "TokenType": "JWT",
    });

    let response = http
        .post(XBL_AUTHENTICATE_URL)
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        return Err(AuthError::XboxAuth(format!("HTTP {status}: {text}")));
    }

    let parsed: XboxTokenResponse = response.json().await?;
    let user_hash = parsed
        .display_claims
        .xui
        .first()
        .map(|xui| xui.uhs.clone())
        .ok_or_else(|| AuthError::XboxAuth("response carried no user hash".to_string()))?;

    Ok(XboxToken {
        token: parsed.token,
        user_hash,
    })
}

pub async fn authorize_xsts(http: &reqwest::Client, xbl_token: &str) -> Result<XboxToken> {
    let body = json!({
        "Properties": {
            "SandboxId": "RETAIL",
            "UserTokens": [xbl_token],
        },
        "RelyingParty": "rp://api.minecraftservices.com/",
        "TokenType": "JWT",
    });

    let response = http.post(XSTS_AUTHORIZE_URL).json(&body).send().await?;
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    if !status.is_success() {
        if let Ok(err) = serde_json::from_str::<XstsErrorResponse>(&text) {
            return Err(AuthError::XstsAuth {
                reason: XstsFailure::from_xerr(err.xerr),
                raw_xerr: err.xerr,
            });
        }
        return Err(AuthError::XboxAuth(format!("HTTP {status}: {text}")));
    }

    let parsed: XboxTokenResponse =
        serde_json::from_str(&text).map_err(|e| AuthError::XboxAuth(e.to_string()))?;
    let user_hash = parsed
        .display_claims
        .xui
        .first()
        .map(|xui| xui.uhs.clone())
        .ok_or_else(|| AuthError::XboxAuth("response carried no user hash".to_string()))?;

    Ok(XboxToken {
        token: parsed.token,
        user_hash,
    })
}

/// Build the `XBL3.0 x=<uhs>;<xsts token>` identity token Minecraft-services
/// expects as the body of `login_with_xbox`.
#[must_use]
pub fn identity_token(xsts: &XboxToken) -> String {
    format!("XBL3.0 x={};{}", xsts.user_hash, xsts.token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xerr_classification_matches_known_codes() {
        assert_eq!(XstsFailure::from_xerr(2_148_916_233), XstsFailure::NoXboxAccount);
        assert_eq!(
            XstsFailure::from_xerr(2_148_916_238),
            XstsFailure::ChildAccountNeedsAdultConsent
        );
        assert_eq!(XstsFailure::from_xerr(0), XstsFailure::Other);
    }

    #[test]
    fn identity_token_has_expected_shape() {
        let token = identity_token(&XboxToken {
            token: "T".to_string(),
            user_hash: "H".to_string(),
        });
        assert_eq!(token, "XBL3.0 x=H;T");
    }
}

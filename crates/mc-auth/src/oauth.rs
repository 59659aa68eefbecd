//! Microsoft OAuth2: the loopback-redirect authorization code flow plus
//! token exchange and refresh (spec §6). Opening the authorize URL in a
//! browser is left to the caller — this crate only builds the URL, listens
//! for the redirect, and speaks the token endpoint.

use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::config::AuthConfig;
use crate::error::{AuthError, Result};

const AUTHORIZE_URL: &str = "https://login.live.com/oauth20_authorize.srf";
const TOKEN_URL: &str = "https://login.live.com/oauth20_token.srf";

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

/// Build the URL the user should open in a browser to grant consent, and
/// the loopback redirect URI that must match it exactly.
#[must_use]
pub fn authorize_url(config: &AuthConfig, redirect_port: u16) -> (String, String) {
    let redirect_uri = format!("http://127.0.0.1:{redirect_port}");
    let scope = config.scopes.join(" ");
    let url = format!(
        "{AUTHORIZE_URL}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&scope={scope}&prompt=select_account",
        client_id = config.client_id,
    );
    (url, redirect_uri)
}

/// Bind the loopback listener (resolving `AuthConfig::redirect_port == 0` to
/// whatever the OS assigns) and return it alongside the port actually bound.
pub async fn bind_redirect_listener(port: u16) -> Result<(TcpListener, u16)> {
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;
    let bound_port = listener
        .local_addr()
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?
        .port();
    Ok((listener, bound_port))
}

/// Accept exactly one HTTP request on `listener`, extract the `code` (or
/// `error`) query parameter from its request line, and reply with a short
/// confirmation page.
pub async fn await_authorization_code(listener: &TcpListener) -> Result<String> {
    let (mut stream, _) = listener
        .accept()
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    let mut buf = vec![0u8; 8192];
    let n = stream
        .read(&mut buf)
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;
    let request = String::from_utf8_lossy(&buf[..n]);
    let request_line = request.lines().next().unwrap_or_default();

    let query = request_line
        .split_whitespace()
        .nth(1)
        .and_then(|path| path.split_once('?'))
        .map(|(_, q)| q)
        .unwrap_or_default();

    let response_body = "<html><body>You may close this window and return to the game.</body></html>";
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: text/html\r\n\r\n{}",
        response_body.len(),
        response_body
    );
    let _ = stream.write_all(response.as_bytes()).await;

    for pair in query.split('&') {
        if let Some(code) = pair.strip_prefix("code=") {
            return Ok(urlencoding_decode(code));
        }
        if pair.starts_with("error=access_denied") {
            return Err(AuthError::OAuthDenied);
        }
    }
    Err(AuthError::TokenExchange(
        "redirect carried neither a code nor an error".to_string(),
    ))
}

fn urlencoding_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(byte) = u8::from_str_radix(&s[i + 1..i + 3], 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

pub async fn exchange_code(
    http: &reqwest::Client,
    config: &AuthConfig,
    code: &str,
    redirect_uri: &str,
) -> Result<TokenResponse> {
    let form = [
        ("client_id", config.client_id.as_str()),
        ("code", code),
        ("grant_type", "authorization_code"),
        ("redirect_uri", redirect_uri),
    ];
    post_token_form(http, &form).await
}

pub async fn refresh_token(
    http: &reqwest::Client,
    config: &AuthConfig,
    refresh_token: &str,
) -> Result<TokenResponse> {
    let form = [
        ("client_id", config.client_id.as_str()),
        ("refresh_token", refresh_token),
        ("grant_type", "refresh_token"),
    ];
    post_token_form(http, &form).await
}

async fn post_token_form(http: &reqwest::Client, form: &[(&str, &str)]) -> Result<TokenResponse> {
    let response = http.post(TOKEN_URL).form(form).send().await?;
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::HttpStatus { status, body });
    }
    Ok(response.json().await?)
}

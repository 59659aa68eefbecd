use std::time::Duration;

/// Tunables for the auth chain. `client_id`/`scopes` identify the Azure AD
/// application registration driving the OAuth2 flow; the rest govern HTTP
/// and session-cache behavior.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub client_id: String,
    pub scopes: Vec<String>,
    pub http_timeout: Duration,
    /// A cached session is treated as expired `session_expiry_buffer` before
    /// its actual `expires_at`, so a request doesn't start mid-flight on a
    /// token that dies in transit. Tunable rather than a hard constant: a
    /// caller running against a slow network may want more headroom.
    pub session_expiry_buffer: Duration,
    /// Local port the loopback OAuth2 redirect listens on. `0` lets the OS
    /// assign one, which is then substituted into the `redirect_uri`.
    pub redirect_port: u16,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            scopes: vec!["XboxLive.signin".to_string(), "offline_access".to_string()],
            http_timeout: Duration::from_secs(20),
            session_expiry_buffer: Duration::from_secs(5 * 60),
            redirect_port: 0,
        }
    }
}

use thiserror::Error;

/// Errors from the Microsoft → Xbox Live → XSTS → Minecraft-services chain
/// and the Mojang session-server join. Never interpolates a token or secret
/// value — only status codes, error codes and bodies that are themselves
/// already non-secret.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("user denied the Microsoft OAuth consent prompt")]
    OAuthDenied,
    #[error("token exchange with login.live.com failed: {0}")]
    TokenExchange(String),
    #[error("Xbox Live authentication failed: {0}")]
    XboxAuth(String),
    #[error("XSTS authorization failed: {reason}")]
    XstsAuth { reason: XstsFailure, raw_xerr: i64 },
    #[error("account has no Minecraft entitlement")]
    NoEntitlement,
    #[error("account has no Minecraft profile")]
    NoProfile,
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("session store error: {0}")]
    Store(String),
}

/// The XSTS service encodes *why* authorization failed in the numeric
/// `XErr` field of its error body; these are the only two sub-cases a
/// client needs to show the user something actionable for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XstsFailure {
    NoXboxAccount,
    ChildAccountNeedsAdultConsent,
    Other,
}

impl XstsFailure {
    /// Classify Xbox's numeric `XErr` code, per the values Xbox documents
    /// for XSTS authorize failures.
    #[must_use]
    pub fn from_xerr(xerr: i64) -> Self {
        match xerr {
            2_148_916_233 => Self::NoXboxAccount,
            2_148_916_238 => Self::ChildAccountNeedsAdultConsent,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for XstsFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoXboxAccount => write!(f, "no Xbox Live account for this Microsoft account"),
            Self::ChildAccountNeedsAdultConsent => {
                write!(f, "child account requires adult consent")
            }
            Self::Other => write!(f, "unclassified XSTS failure"),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;

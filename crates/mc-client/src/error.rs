use thiserror::Error;

/// Errors surfaced by a live connection: transport, codec, protocol-state,
/// and authentication failures all land here so callers have one type to
/// match on.
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Codec(#[from] mc_protocol::CodecError),
    #[error(transparent)]
    Framing(#[from] mc_protocol::FramingError),
    #[error(transparent)]
    Protocol(#[from] mc_protocol::ProtocolError),
    #[error(transparent)]
    Crypto(#[from] mc_protocol::CryptoError),
    #[error(transparent)]
    Auth(#[from] mc_auth::AuthError),
    #[error("disconnected by peer: {0}")]
    Disconnected(String),
    #[error("connection closed")]
    Closed,
    #[error("operation cancelled")]
    Cancelled,
    #[error("address resolution failed: {0}")]
    Resolve(#[from] hickory_resolver::error::ResolveError),
}

pub type Result<T> = std::result::Result<T, ConnectionError>;

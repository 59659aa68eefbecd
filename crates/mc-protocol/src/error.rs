use std::io;

use thiserror::Error;

/// Errors arising from decoding or encoding a single wire value.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("VarInt did not terminate within 5 bytes")]
    OverlongVarInt,
    #[error("VarLong did not terminate within 10 bytes")]
    OverlongVarLong,
    #[error("unexpected end of buffer")]
    Truncated,
    #[error("string length {len} exceeds max {max}")]
    LengthExceedsMax { len: usize, max: usize },
    #[error("negative length encountered where a non-negative length was required")]
    NegativeLength,
    #[error("invalid UTF-8 string: {0}")]
    BadString(#[from] std::string::FromUtf8Error),
    #[error("unknown NBT tag id {0}")]
    BadTag(u8),
    #[error("invalid enum/variant discriminant: {0}")]
    InvalidEnumVariant(i32),
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors arising from packet framing (length prefix + optional compression).
#[derive(Error, Debug)]
pub enum FramingError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("frame length {0} exceeds the 2_097_151 byte limit")]
    OversizeFrame(i32),
    #[error("uncompressed body length {0} exceeds the 8_388_608 byte limit")]
    OversizeBody(i32),
    #[error("inflated body was {actual} bytes, expected {expected}")]
    InflateMismatch { expected: i32, actual: usize },
}

/// Errors arising from the connection state machine.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("packet fingerprint (state={state:?}, direction={direction:?}, id={id}) does not match the connection's current state")]
    UnexpectedState {
        state: crate::state::ConnectionState,
        direction: crate::Direction,
        id: i32,
    },
    #[error("unknown packet id {id} in state {state:?}/{direction:?}")]
    UnknownPacket {
        state: crate::state::ConnectionState,
        direction: crate::Direction,
        id: i32,
    },
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
}

/// Errors arising from cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("failed to parse key material: {0}")]
    KeyParse(String),
    #[error("decryption failed")]
    Decrypt,
    #[error("server hash did not match the expected value")]
    HashMismatch,
}

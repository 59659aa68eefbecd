//! Async transport, framing and login-sequence driver for talking to a
//! Minecraft: Java Edition server as a client.
//!
//! This crate owns everything downstream of the wire codec in
//! `mc-protocol`: DNS/SRV resolution, the split read/write TCP connection
//! (compression, encryption, packet fingerprinting), the handful of
//! Handshake/Status/Login packets needed to drive a session up through the
//! Configuration state, and the login sequence itself. It does not carry a
//! generated Play-state packet registry or a game-state/ECS layer — those
//! are out of scope here.

pub mod connection;
pub mod error;
pub mod login;
pub mod packets;
pub mod resolve;

pub use connection::{Connection, ReadConnection, WriteConnection};
pub use error::{ConnectionError, Result};
pub use login::{login, LoginOutcome};
pub use resolve::{resolve_address, ResolvedAddress, DEFAULT_PORT};

/// The protocol version this crate's packet set (`packets.rs`) is written
/// against. The teacher generated this constant (and its whole packet
/// registry) from game data at build time via `mc-data`; this crate has no
/// such registry, so the single version it targets is pinned by hand.
///
/// 1.21.4.
pub const PROTOCOL_VERSION: i32 = 769;

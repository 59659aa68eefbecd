//! Wire-type codec, NBT codec, crypto primitives, packet framing and the
//! connection state machine for the Minecraft: Java Edition protocol.
//!
//! This crate has no socket I/O of its own — every operation here reads from
//! or writes to an in-memory buffer (`std::io::Read`/`Write`). The `mc-client`
//! crate drives these over a live TCP connection.

pub mod composites;
pub mod crypto;
pub mod error;
pub mod framing;
pub mod nbt;
pub mod placeholders;
pub mod primitives;
pub mod state;
pub mod varint;

use std::io::{Read, Write};

#[cfg(feature = "derive")]
pub use mc_protocol_derive::{Decode, Encode, NbtDecode, NbtEncode};

pub use serde;

pub use composites::{Either, FixedBitSet, IdOrInline, IdSet, PrefixedOptional};
pub use error::{CodecError, CryptoError, FramingError, ProtocolError, Result};
pub use nbt::{NbtCompound, NbtDecode, NbtEncode, NbtList, NbtValue};
pub use primitives::{Angle, BitSet, Identifier, Position, Uuid};
pub use state::{ConnectionState, PacketFingerprint, StateMachine};
pub use varint::{read_varint, read_varlong, write_varint, write_varlong, VarInt, VarLong};

/// Packet direction relative to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    Clientbound,
    Serverbound,
}

/// Implemented by every typed packet. `ID`/`STATE`/`DIRECTION` together form
/// the packet's fingerprint, checked against the connection's current state
/// before a packet is encoded or dispatched after decode (see
/// [`state::ConnectionState`]).
pub trait Packet {
    const ID: i32;
    const NAME: &'static str;
    const STATE: ConnectionState;
    const DIRECTION: Direction;
}

/// A value that can append itself to a byte stream.
pub trait Encode {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()>;
}

/// A value that can be read back off a byte stream.
///
/// Decoding never needs to hold a loan on the input (every implementation in
/// this crate allocates), so unlike the upstream trait this generalizes from,
/// `Decode` carries no input lifetime.
pub trait Decode: Sized {
    fn decode<R: Read>(reader: &mut R) -> Result<Self>;
}

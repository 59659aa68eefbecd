//! The handful of Handshake/Status/Login-state packets needed to drive a
//! connection from TCP accept through to the Configuration state. Play-state
//! gameplay packets are out of scope — their types come from the external
//! data registry this workspace's teacher generated from game data, which
//! this crate does not embed (see the workspace's non-goals).

use std::io::{Read, Write};

use mc_protocol::{ConnectionState, Decode, Direction, Encode, Packet, Result, Uuid, VarInt};

macro_rules! packet {
    ($name:ident, $id:expr, $state:expr, $direction:expr, { $($field:ident : $ty:ty),* $(,)? }) => {
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $(pub $field: $ty,)*
        }

        impl Packet for $name {
            const ID: i32 = $id;
            const NAME: &'static str = stringify!($name);
            const STATE: ConnectionState = $state;
            const DIRECTION: Direction = $direction;
        }

        impl Encode for $name {
            fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
                $(Encode::encode(&self.$field, writer)?;)*
                Ok(())
            }
        }

        impl Decode for $name {
            fn decode<R: Read>(reader: &mut R) -> Result<Self> {
                Ok(Self {
                    $($field: Decode::decode(reader)?,)*
                })
            }
        }
    };
}

packet!(Handshake, 0x00, ConnectionState::Handshake, Direction::Serverbound, {
    protocol_version: VarInt,
    server_address: String,
    server_port: u16,
    next_state: VarInt,
});

packet!(StatusRequest, 0x00, ConnectionState::Status, Direction::Serverbound, {});

packet!(StatusResponse, 0x00, ConnectionState::Status, Direction::Clientbound, {
    json: String,
});

packet!(PingRequest, 0x01, ConnectionState::Status, Direction::Serverbound, {
    payload: i64,
});

packet!(PongResponse, 0x01, ConnectionState::Status, Direction::Clientbound, {
    payload: i64,
});

packet!(LoginDisconnect, 0x00, ConnectionState::Login, Direction::Clientbound, {
    reason: String,
});

packet!(LoginStart, 0x00, ConnectionState::Login, Direction::Serverbound, {
    name: String,
    uuid: Uuid,
});

packet!(EncryptionRequest, 0x01, ConnectionState::Login, Direction::Clientbound, {
    server_id: String,
    public_key: Vec<u8>,
    verify_token: Vec<u8>,
});

packet!(EncryptionResponse, 0x01, ConnectionState::Login, Direction::Serverbound, {
    shared_secret: Vec<u8>,
    verify_token: Vec<u8>,
});

packet!(LoginSuccess, 0x02, ConnectionState::Login, Direction::Clientbound, {
    uuid: Uuid,
    username: String,
});

packet!(SetCompression, 0x03, ConnectionState::Login, Direction::Clientbound, {
    threshold: VarInt,
});

packet!(LoginAcknowledged, 0x03, ConnectionState::Login, Direction::Serverbound, {});

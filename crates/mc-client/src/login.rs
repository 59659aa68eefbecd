//! Drives a freshly-opened [`Connection`] through the Handshake and Login
//! states: handshake, login start, the optional encryption exchange (online
//! mode), the optional compression switch, and login success, leaving the
//! connection in [`ConnectionState::Configuration`].

use std::io::Cursor;

use mc_protocol::{ConnectionState, Decode, Direction, Packet, ProtocolError, VarInt};
use rand::RngCore;

use crate::connection::Connection;
use crate::error::{ConnectionError, Result};
use crate::packets::{
    EncryptionRequest, EncryptionResponse, Handshake, LoginAcknowledged, LoginDisconnect,
    LoginStart, LoginSuccess, SetCompression,
};

/// What a completed login sequence resolved to: the profile the server
/// accepted, which in offline mode is the deterministic name-derived id
/// rather than whatever the client asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub uuid: mc_protocol::Uuid,
    pub username: String,
}

/// Run the login sequence. `session` is `None` for an offline-mode server;
/// when `Some`, its access token is used both to answer the encryption
/// request (via the Mojang session-server join) and to prove the account
/// owns `username`.
pub async fn login(
    conn: &mut Connection,
    http: &reqwest::Client,
    server_address: &str,
    server_port: u16,
    username: &str,
    session: Option<&mc_auth::AuthSession>,
) -> Result<LoginOutcome> {
    conn.write_packet(&Handshake {
        protocol_version: VarInt(crate::PROTOCOL_VERSION),
        server_address: server_address.to_string(),
        server_port,
        next_state: VarInt(2),
    })
    .await?;
    conn.transition(ConnectionState::Login)?;

    let uuid = match session {
        Some(session) => to_protocol_uuid(session.uuid),
        None => to_protocol_uuid(mc_auth::offline_uuid(username)),
    };
    conn.write_packet(&LoginStart {
        name: username.to_string(),
        uuid,
    })
    .await?;

    loop {
        let body = conn.reader.read_frame().await?;
        let mut cursor = Cursor::new(body);
        let id = mc_protocol::read_varint(&mut cursor)?;

        match id {
            LoginDisconnect::ID => {
                let packet = LoginDisconnect::decode(&mut cursor)?;
                return Err(ConnectionError::Disconnected(packet.reason));
            }
            EncryptionRequest::ID => {
                let packet = EncryptionRequest::decode(&mut cursor)?;
                handle_encryption_request(conn, http, &packet, session).await?;
            }
            SetCompression::ID => {
                let packet = SetCompression::decode(&mut cursor)?;
                conn.set_compression(packet.threshold.0);
            }
            LoginSuccess::ID => {
                let packet = LoginSuccess::decode(&mut cursor)?;
                conn.write_packet(&LoginAcknowledged {}).await?;
                conn.transition(ConnectionState::Configuration)?;
                return Ok(LoginOutcome {
                    uuid: packet.uuid,
                    username: packet.username,
                });
            }
            id => {
                return Err(ConnectionError::Protocol(ProtocolError::UnknownPacket {
                    state: conn.state(),
                    direction: Direction::Clientbound,
                    id,
                }))
            }
        }
    }
}

async fn handle_encryption_request(
    conn: &mut Connection,
    http: &reqwest::Client,
    packet: &EncryptionRequest,
    session: Option<&mc_auth::AuthSession>,
) -> Result<()> {
    let public_key = mc_protocol::crypto::parse_rsa_public_key_der(&packet.public_key)?;

    let mut shared_secret = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut shared_secret);

    if let Some(session) = session {
        let hash = mc_protocol::crypto::server_hash(&packet.server_id, &shared_secret, &packet.public_key);
        mc_auth::sessionserver::join(http, &session.access_token, session.uuid, &hash).await?;
    }

    let mut rng = rand::thread_rng();
    let encrypted_secret = mc_protocol::crypto::rsa_encrypt(&public_key, &shared_secret, &mut rng)?;
    let encrypted_verify_token = mc_protocol::crypto::rsa_encrypt(&public_key, &packet.verify_token, &mut rng)?;

    conn.write_packet(&EncryptionResponse {
        shared_secret: encrypted_secret,
        verify_token: encrypted_verify_token,
    })
    .await?;

    conn.set_encryption(&shared_secret);
    Ok(())
}

fn to_protocol_uuid(uuid: uuid::Uuid) -> mc_protocol::Uuid {
    mc_protocol::Uuid(uuid.as_u128())
}

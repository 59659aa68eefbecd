//! A live connection to a Minecraft server: TCP transport, optional zlib
//! compression, optional AES-128/CFB8 encryption, and the protocol state
//! machine, all folded into one split read/write pair.
//!
//! Grounded in azalea's `Connection`/`ReadConnection`/`WriteConnection` split
//! (each half owns its own half of the socket and its own cipher direction),
//! adapted here to work over untyped packet bodies since this crate carries
//! no generated play-packet registry.

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use mc_protocol::crypto::{create_cipher, Aes128CfbDec, Aes128CfbEnc};
use mc_protocol::framing::{check_frame_len, decode_frame, encode_frame};
use mc_protocol::{ConnectionState, Decode, Encode, Packet, PacketFingerprint, ProtocolError, StateMachine};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use crate::error::{ConnectionError, Result};

/// Negative means "compression disabled" — the same convention the wire
/// protocol uses for the Set-Compression threshold itself, so no separate
/// `Option` wrapper is needed to share this across the atomic.
const COMPRESSION_DISABLED: i64 = -1;

/// Compression threshold shared between both halves of a split connection.
/// A single atomic store is enough (per the scheduling model's "compression
/// threshold is written at most once per update" note) — no lock needed even
/// though the read and write halves may live on different tasks.
#[derive(Clone)]
struct CompressionThreshold(Arc<AtomicI64>);

impl CompressionThreshold {
    fn disabled() -> Self {
        Self(Arc::new(AtomicI64::new(COMPRESSION_DISABLED)))
    }

    fn set(&self, threshold: i32) {
        let value = if threshold >= 0 { i64::from(threshold) } else { COMPRESSION_DISABLED };
        self.0.store(value, Ordering::SeqCst);
    }

    fn get(&self) -> Option<i32> {
        let value = self.0.load(Ordering::SeqCst);
        (value >= 0).then_some(value as i32)
    }
}

/// The read half: owns the socket's read side and the decrypt-direction
/// cipher.
pub struct ReadConnection {
    stream: OwnedReadHalf,
    compression_threshold: CompressionThreshold,
    dec_cipher: Option<Aes128CfbDec>,
}

/// The write half: owns the socket's write side and the encrypt-direction
/// cipher.
pub struct WriteConnection {
    stream: OwnedWriteHalf,
    compression_threshold: CompressionThreshold,
    enc_cipher: Option<Aes128CfbEnc>,
}

/// A connection to a Minecraft server, including the shared protocol state
/// machine both halves are validated against.
pub struct Connection {
    pub reader: ReadConnection,
    pub writer: WriteConnection,
    state: StateMachine,
}

impl Connection {
    /// Open a TCP connection to `addr`, starting in [`ConnectionState::Handshake`].
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        let (read_half, write_half) = stream.into_split();
        let compression_threshold = CompressionThreshold::disabled();

        Ok(Self {
            reader: ReadConnection {
                stream: read_half,
                compression_threshold: compression_threshold.clone(),
                dec_cipher: None,
            },
            writer: WriteConnection {
                stream: write_half,
                compression_threshold,
                enc_cipher: None,
            },
            state: StateMachine::new(),
        })
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state.current()
    }

    /// Move to a new protocol state, per the table in [`ConnectionState::can_transition_to`].
    pub fn transition(&mut self, to: ConnectionState) -> Result<()> {
        self.state.transition(to)?;
        Ok(())
    }

    /// Enable zlib compression for bodies at or above `threshold` bytes.
    /// Passing a negative threshold (as servers do to disable it again)
    /// turns compression back off.
    pub fn set_compression(&mut self, threshold: i32) {
        self.reader.compression_threshold.set(threshold);
        self.writer.compression_threshold.set(threshold);
    }

    /// Install the AES-128/CFB8 ciphers derived from `shared_secret` for
    /// both directions. Called once, immediately after the encryption
    /// handshake completes.
    pub fn set_encryption(&mut self, shared_secret: &[u8; 16]) {
        let (enc_cipher, dec_cipher) = create_cipher(shared_secret);
        self.writer.enc_cipher = Some(enc_cipher);
        self.reader.dec_cipher = Some(dec_cipher);
    }

    /// Read one packet, checking its fingerprint against the connection's
    /// current state.
    pub async fn read_packet<P: Packet + Decode>(&mut self) -> Result<P> {
        self.state.expect::<P>()?;
        let body = self.reader.read_frame().await?;

        let mut cursor = Cursor::new(body);
        let id = mc_protocol::read_varint(&mut cursor)?;
        if id != P::ID {
            return Err(ConnectionError::Protocol(ProtocolError::UnknownPacket {
                state: self.state.current(),
                direction: P::DIRECTION,
                id,
            }));
        }

        Ok(P::decode(&mut cursor)?)
    }

    /// Write one packet, checking its fingerprint against the connection's
    /// current state.
    pub async fn write_packet<P: Packet + Encode>(&mut self, packet: &P) -> Result<()> {
        self.state.expect::<P>()?;

        let mut body = Vec::new();
        mc_protocol::write_varint(&mut body, P::ID)?;
        packet.encode(&mut body)?;

        self.writer.write_frame(&body).await
    }

    /// Fingerprint of the packet that would currently be expected to decode
    /// as `P`, for callers building their own dispatch over raw frames.
    #[must_use]
    pub fn fingerprint<P: Packet>(&self) -> PacketFingerprint {
        PacketFingerprint::of::<P>()
    }
}

impl ReadConnection {
    /// Read one complete frame off the socket, decrypting and decompressing
    /// it, and return its body (packet id `VarInt` followed by payload).
    pub async fn read_frame(&mut self) -> Result<Vec<u8>> {
        let frame_len = self.read_varint_decrypted().await?;
        check_frame_len(frame_len)?;

        let mut frame = vec![0u8; frame_len as usize];
        self.stream.read_exact(&mut frame).await?;
        if let Some(cipher) = &mut self.dec_cipher {
            cipher.decrypt_in_place(&mut frame);
        }

        Ok(decode_frame(&frame, self.compression_threshold.get().is_some())?)
    }

    /// Read a `VarInt` one byte at a time, decrypting each byte as it
    /// arrives — the cipher covers the length prefix too, so it can't be
    /// buffered and decrypted as a whole like the frame body can.
    async fn read_varint_decrypted(&mut self) -> Result<i32> {
        let mut value: i32 = 0;
        for position in 0..5 {
            let mut byte = match self.stream.read_u8().await {
                Ok(byte) => byte,
                Err(e) if position == 0 && e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    return Err(ConnectionError::Closed)
                }
                Err(e) => return Err(e.into()),
            };
            if let Some(cipher) = &mut self.dec_cipher {
                let mut one = [byte];
                cipher.decrypt_in_place(&mut one);
                byte = one[0];
            }

            value |= i32::from(byte & 0x7F) << (7 * position);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ConnectionError::Codec(mc_protocol::CodecError::OverlongVarInt))
    }
}

impl WriteConnection {
    /// Frame, compress and encrypt `body`, then write it to the socket.
    pub async fn write_frame(&mut self, body: &[u8]) -> Result<()> {
        let mut frame = encode_frame(body, self.compression_threshold.get())?;
        if let Some(cipher) = &mut self.enc_cipher {
            cipher.encrypt_in_place(&mut frame);
        }
        self.stream.write_all(&frame).await?;
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        self.stream.shutdown().await?;
        Ok(())
    }
}

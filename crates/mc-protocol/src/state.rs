//! The five protocol states and the transitions between them (spec §4.7).

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::{Direction, Packet};

/// One of the five states a connection can be in. Initial state is
/// `Handshake`; terminal on transport close (there's no `Closed` variant —
/// closing is a transport-level concern, not a protocol state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionState {
    Handshake,
    Status,
    Login,
    Configuration,
    Play,
}

impl Default for ConnectionState {
    fn default() -> Self {
        ConnectionState::Handshake
    }
}

impl ConnectionState {
    /// Whether the table in spec §4.7 permits `self -> to`.
    #[must_use]
    pub fn can_transition_to(self, to: ConnectionState) -> bool {
        use ConnectionState::{Configuration, Handshake, Login, Play, Status};
        matches!(
            (self, to),
            (Handshake, Status)
                | (Handshake, Login)
                | (Login, Configuration)
                | (Configuration, Play)
                | (Play, Configuration)
        )
    }
}

/// Identifies a packet type within one protocol version: the tuple
/// `(state, direction, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketFingerprint {
    pub state: ConnectionState,
    pub direction: Direction,
    pub id: i32,
}

impl PacketFingerprint {
    #[must_use]
    pub fn of<P: Packet>() -> Self {
        PacketFingerprint {
            state: P::STATE,
            direction: P::DIRECTION,
            id: P::ID,
        }
    }
}

/// A pure (no I/O) tracker of a connection's current state, enforcing the
/// transition table in spec §4.7. `mc-client`'s `Connection` owns one of
/// these and consults it before encoding/after decoding every packet.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateMachine {
    current: ConnectionState,
}

impl StateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> ConnectionState {
        self.current
    }

    /// Move to `to`, failing if the table in §4.7 doesn't permit it.
    pub fn transition(&mut self, to: ConnectionState) -> Result<(), ProtocolError> {
        if self.current.can_transition_to(to) {
            self.current = to;
            Ok(())
        } else {
            Err(ProtocolError::ProtocolViolation(format!(
                "invalid state transition {:?} -> {:?}",
                self.current, to
            )))
        }
    }

    /// Assert that `P`'s declared fingerprint matches the connection's
    /// current state, without inspecting its direction relative to us — the
    /// caller already knows whether it's encoding (serverbound) or has just
    /// read (clientbound) a frame.
    pub fn expect<P: Packet>(&self) -> Result<(), ProtocolError> {
        if P::STATE == self.current {
            Ok(())
        } else {
            Err(ProtocolError::UnexpectedState {
                state: P::STATE,
                direction: P::DIRECTION,
                id: P::ID,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;

    #[test]
    fn handshake_transitions() {
        assert!(ConnectionState::Handshake.can_transition_to(ConnectionState::Status));
        assert!(ConnectionState::Handshake.can_transition_to(ConnectionState::Login));
        assert!(!ConnectionState::Handshake.can_transition_to(ConnectionState::Play));
    }

    #[test]
    fn full_login_sequence() {
        let mut sm = StateMachine::new();
        assert_eq!(sm.current(), ConnectionState::Handshake);
        sm.transition(ConnectionState::Login).unwrap();
        sm.transition(ConnectionState::Configuration).unwrap();
        sm.transition(ConnectionState::Play).unwrap();
        sm.transition(ConnectionState::Configuration).unwrap();
    }

    #[test]
    fn invalid_transition_is_rejected() {
        let mut sm = StateMachine::new();
        assert!(sm.transition(ConnectionState::Play).is_err());
    }

    struct DummyHandshake;
    impl Packet for DummyHandshake {
        const ID: i32 = 0;
        const NAME: &'static str = "Handshake";
        const STATE: ConnectionState = ConnectionState::Handshake;
        const DIRECTION: Direction = Direction::Serverbound;
    }

    #[test]
    fn expect_checks_fingerprint_state() {
        let sm = StateMachine::new();
        assert!(sm.expect::<DummyHandshake>().is_ok());

        let mut sm2 = StateMachine::new();
        sm2.transition(ConnectionState::Login).unwrap();
        assert!(sm2.expect::<DummyHandshake>().is_err());
    }
}

use thiserror::Error;

use crate::domain::challenge::ChallengeError;
use crate::domain::params::{MAX_CHALLENGE_LEN, MIN_CHALLENGE_LEN};
use crate::domain::verdict::VerdictError;
use crate::protocol::frame::FrameError;
use crate::protocol::mac::MacError;

/// Peer behaved out of contract. Always fatal to the session; never retried
/// within it.
#[derive(Debug, Error)]
pub enum ProtocolViolation {
    #[error("declared frame length {declared} exceeds maximum {max}")]
    FrameTooLarge { declared: usize, max: usize },
    #[error("response tag length mismatch: expected {expected}, got {actual}")]
    TagLength { expected: usize, actual: usize },
    #[error("challenge length {actual} outside allowed range {min}..={max}")]
    ChallengeLength {
        actual: usize,
        min: usize,
        max: usize,
    },
    #[error("empty verdict frame")]
    EmptyVerdict,
    #[error("unknown verdict code 0x{0:02x}")]
    UnknownVerdict(u8),
}

/// Session-boundary error taxonomy. Every variant is fatal to the session:
/// the owned connection is released (dropped) and any retry is a fresh
/// session with a fresh challenge.
///
/// A MAC mismatch is deliberately absent — it is the `Verdict::Rejected`
/// outcome, reported to the peer, not an error.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Connection closed, short read/write, or per-operation timeout.
    #[error("transport failure: {0}")]
    Transport(#[source] std::io::Error),
    /// Peer sent something the protocol does not allow.
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),
    /// Secure randomness unavailable; the verifier cannot start a session.
    #[error("secure random source failed: {0}")]
    Entropy(#[source] rand::Error),
    /// Internal state machine misuse (wrong role/order). Indicates a driver
    /// bug, not peer behavior.
    #[error("invalid session transition: {0}")]
    State(String),
}

impl From<FrameError> for SessionError {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::Io(io) => SessionError::Transport(io),
            FrameError::TooLarge { declared, max } => {
                SessionError::Protocol(ProtocolViolation::FrameTooLarge { declared, max })
            }
        }
    }
}

impl From<MacError> for SessionError {
    fn from(e: MacError) -> Self {
        match e {
            MacError::LengthMismatch { expected, actual } => {
                SessionError::Protocol(ProtocolViolation::TagLength { expected, actual })
            }
        }
    }
}

impl From<ChallengeError> for SessionError {
    fn from(e: ChallengeError) -> Self {
        match e {
            ChallengeError::Entropy(err) => SessionError::Entropy(err),
            ChallengeError::Length { requested, .. } => {
                SessionError::Protocol(ProtocolViolation::ChallengeLength {
                    actual: requested,
                    min: MIN_CHALLENGE_LEN,
                    max: MAX_CHALLENGE_LEN,
                })
            }
        }
    }
}

impl From<VerdictError> for SessionError {
    fn from(e: VerdictError) -> Self {
        match e {
            VerdictError::Empty => SessionError::Protocol(ProtocolViolation::EmptyVerdict),
            VerdictError::UnknownCode(c) => {
                SessionError::Protocol(ProtocolViolation::UnknownVerdict(c))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_errors_map_by_kind() {
        let io = FrameError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "closed",
        ));
        assert!(matches!(SessionError::from(io), SessionError::Transport(_)));

        let big = FrameError::TooLarge {
            declared: 4096,
            max: 1024,
        };
        assert!(matches!(
            SessionError::from(big),
            SessionError::Protocol(ProtocolViolation::FrameTooLarge {
                declared: 4096,
                max: 1024
            })
        ));
    }

    #[test]
    fn challenge_errors_split_between_entropy_and_protocol() {
        let len = ChallengeError::Length {
            requested: 200,
            min: MIN_CHALLENGE_LEN,
            max: MAX_CHALLENGE_LEN,
        };
        assert!(matches!(
            SessionError::from(len),
            SessionError::Protocol(ProtocolViolation::ChallengeLength { actual: 200, .. })
        ));
    }

    #[test]
    fn verdict_errors_are_protocol_violations() {
        assert!(matches!(
            SessionError::from(VerdictError::UnknownCode(0xee)),
            SessionError::Protocol(ProtocolViolation::UnknownVerdict(0xee))
        ));
    }
}

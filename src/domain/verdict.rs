use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Terminal outcome of a session, as decided by the verifier.
///
/// A MAC mismatch is not an error: the verifier always answers with a
/// definite verdict frame so both sides observe the same result. Transport
/// and protocol failures are a separate channel (`SessionError`) and never
/// appear on the wire.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Authenticated = 0x01,
    Rejected = 0x02,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerdictError {
    #[error("empty verdict frame")]
    Empty,
    #[error("unknown verdict code: 0x{0:02x}")]
    UnknownCode(u8),
}

impl Verdict {
    /// Human-readable trailer carried after the code byte, mainly for
    /// interactive inspection of the wire.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Verdict::Authenticated => "Authentication successful. Welcome!",
            Verdict::Rejected => "Authentication failed.",
        }
    }

    /// Encode as a verdict frame payload: one code byte followed by the
    /// human-readable trailer.
    #[must_use]
    pub fn to_frame(self) -> Vec<u8> {
        let msg = self.message().as_bytes();
        let mut out = Vec::with_capacity(1 + msg.len());
        out.push(self as u8);
        out.extend_from_slice(msg);
        out
    }

    /// Decode a verdict frame payload. Only the leading code byte is
    /// significant; any trailer is ignored.
    ///
    /// # Errors
    /// `VerdictError::Empty` on an empty payload, `VerdictError::UnknownCode`
    /// on an unrecognized code byte.
    pub fn from_frame(payload: &[u8]) -> Result<Self, VerdictError> {
        match payload.first().copied() {
            None => Err(VerdictError::Empty),
            Some(0x01) => Ok(Verdict::Authenticated),
            Some(0x02) => Ok(Verdict::Rejected),
            Some(other) => Err(VerdictError::UnknownCode(other)),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Authenticated => write!(f, "authenticated"),
            Verdict::Rejected => write!(f, "rejected"),
        }
    }
}

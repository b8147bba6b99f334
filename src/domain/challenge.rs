use core::{convert::TryFrom, fmt};

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::params::{MAX_CHALLENGE_LEN, MIN_CHALLENGE_LEN};

/// Failure modes of challenge construction.
#[derive(Debug, Error)]
pub enum ChallengeError {
    /// Requested or received length outside the validated bound.
    #[error("challenge length {requested} outside allowed range {min}..={max}")]
    Length {
        requested: usize,
        min: usize,
        max: usize,
    },
    /// The secure random source could not supply bytes. Never degraded to a
    /// non-cryptographic generator.
    #[error("secure random source failed: {0}")]
    Entropy(#[source] rand::Error),
}

/// Per-session freshness challenge issued by the verifier.
///
/// Sampled uniformly at random once per session and bound to exactly one
/// verification attempt (the session state machine enforces the single
/// bind/take; see `application::fsm`).
///
/// Construction options:
/// - `Challenge::generate(rng, len)` for cryptographically strong randomness.
/// - `Challenge::try_from(&[u8])` for fallible decoding from a received frame.
///
/// Invariants:
/// - Length always within `MIN_CHALLENGE_LEN..=MAX_CHALLENGE_LEN`.
/// - Opaque: `Debug` redacts the inner value to avoid accidental logging of
///   raw session entropy.
///
/// Security:
/// - Never reuse a `Challenge` across sessions; a replayed challenge makes a
///   recorded response tag valid again.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Challenge(Vec<u8>);

impl fmt::Debug for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Challenge({} bytes)", self.0.len())
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact full value; show first 4 bytes hex for trace correlation.
        for b in self.0.iter().take(4) {
            write!(f, "{b:02x}")?;
        }
        write!(f, "…")
    }
}

impl Challenge {
    /// Generate a fresh challenge of `len` bytes from the supplied CSPRNG.
    ///
    /// The caller provides the RNG (dependency inversion for testability);
    /// production code passes `rand::rngs::OsRng`. The fallible fill is used
    /// deliberately so an exhausted entropy source surfaces as
    /// `ChallengeError::Entropy` rather than silently weakening the nonce.
    ///
    /// # Errors
    /// `ChallengeError::Length` if `len` is outside the validated bound,
    /// `ChallengeError::Entropy` if the random source fails.
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R, len: usize) -> Result<Self, ChallengeError> {
        if !(MIN_CHALLENGE_LEN..=MAX_CHALLENGE_LEN).contains(&len) {
            return Err(ChallengeError::Length {
                requested: len,
                min: MIN_CHALLENGE_LEN,
                max: MAX_CHALLENGE_LEN,
            });
        }
        let mut buf = vec![0u8; len];
        rng.try_fill_bytes(&mut buf).map_err(ChallengeError::Entropy)?;
        Ok(Challenge(buf))
    }

    /// Access the inner bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the challenge in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a validly constructed challenge; provided for
    /// `len`/`is_empty` pairing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<&[u8]> for Challenge {
    type Error = ChallengeError;

    /// Attempt to adopt received bytes as a challenge.
    ///
    /// # Errors
    /// `ChallengeError::Length` if the slice length is outside the bound.
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if !(MIN_CHALLENGE_LEN..=MAX_CHALLENGE_LEN).contains(&value.len()) {
            return Err(ChallengeError::Length {
                requested: value.len(),
                min: MIN_CHALLENGE_LEN,
                max: MAX_CHALLENGE_LEN,
            });
        }
        Ok(Challenge(value.to_vec()))
    }
}

impl AsRef<[u8]> for Challenge {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::params::{
    CHALLENGE_LEN, DEFAULT_IO_TIMEOUT, MAX_CHALLENGE_LEN, MAX_FRAME_LEN, MIN_CHALLENGE_LEN,
};
use crate::protocol::mac::MacAlgorithm;

/// Per-endpoint protocol configuration. Both ends must agree on `algorithm`;
/// the remaining fields are local policy.
///
/// The shared secret is intentionally not part of this struct — it is
/// provisioned out of band and passed explicitly to the role constructors,
/// never through serialized configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Keyed-hash construction for the challenge response.
    pub algorithm: MacAlgorithm,
    /// Challenge length in bytes, validated against the protocol bound.
    pub challenge_len: usize,
    /// Cap on any declared frame length, ours or the peer's.
    pub max_frame_len: usize,
    /// Per-operation read/write timeout applied by transport adapters so a
    /// stalled peer cannot hold a session unit indefinitely.
    pub io_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            algorithm: MacAlgorithm::default(),
            challenge_len: CHALLENGE_LEN,
            max_frame_len: MAX_FRAME_LEN,
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("challenge length {requested} outside allowed range {min}..={max}")]
    ChallengeLength {
        requested: usize,
        min: usize,
        max: usize,
    },
    #[error("maximum frame length {max} cannot carry a {required}-byte protocol message")]
    FrameCapTooSmall { max: usize, required: usize },
    #[error("i/o timeout must be non-zero")]
    ZeroTimeout,
}

impl AuthConfig {
    /// Check internal consistency. Role constructors call this, so an
    /// invalid configuration is rejected before any connection is touched.
    ///
    /// # Errors
    /// See `ConfigError`; each variant names the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_CHALLENGE_LEN..=MAX_CHALLENGE_LEN).contains(&self.challenge_len) {
            return Err(ConfigError::ChallengeLength {
                requested: self.challenge_len,
                min: MIN_CHALLENGE_LEN,
                max: MAX_CHALLENGE_LEN,
            });
        }
        // Every protocol message (largest challenge, tag, verdict, greeting)
        // must fit under the frame cap or the session can never complete.
        let required = MAX_CHALLENGE_LEN.max(self.algorithm.tag_len());
        if self.max_frame_len < required {
            return Err(ConfigError::FrameCapTooSmall {
                max: self.max_frame_len,
                required,
            });
        }
        if self.io_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

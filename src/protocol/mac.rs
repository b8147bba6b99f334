//! Keyed MAC engine shared by both roles.
//!
//! `compute_tag` is a pure function of (algorithm, secret, message);
//! `verify_tag` recomputes and compares with a constant-time equality so the
//! comparison's running time is independent of where the first mismatching
//! byte sits. A variable-time comparison here would let a network attacker
//! forge a tag byte-by-byte, which is why this is a correctness requirement
//! and not a style choice.

use core::fmt;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::domain::secret::SharedSecret;

/// Keyed-hash construction used for the challenge response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MacAlgorithm {
    /// HMAC-SHA1, 20-byte tag. Default for compatibility with existing
    /// deployments.
    #[default]
    HmacSha1,
    /// HMAC-SHA256, 32-byte tag.
    HmacSha256,
}

impl MacAlgorithm {
    /// Fixed tag length in bytes for this construction.
    #[must_use]
    pub const fn tag_len(self) -> usize {
        match self {
            MacAlgorithm::HmacSha1 => 20,
            MacAlgorithm::HmacSha256 => 32,
        }
    }
}

impl fmt::Display for MacAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacAlgorithm::HmacSha1 => write!(f, "hmac-sha1"),
            MacAlgorithm::HmacSha256 => write!(f, "hmac-sha256"),
        }
    }
}

/// Computed authentication tag.
///
/// `Debug`/`Display` are redacted to a short hex prefix: within a session a
/// valid tag is a credential, and full tags in logs would let log readers
/// replay a response.
#[derive(Clone, PartialEq, Eq)]
pub struct Tag(Vec<u8>);

impl Tag {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({} bytes)", self.0.len())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0.iter().take(4) {
            write!(f, "{b:02x}")?;
        }
        write!(f, "…")
    }
}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MacError {
    /// Candidate tag has the wrong length for the configured algorithm.
    /// Mismatched content is not an error; only malformed input is.
    #[error("candidate tag length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Compute the keyed tag over `message`.
///
/// Deterministic and side-effect free: identical inputs always yield the
/// identical tag.
#[must_use]
pub fn compute_tag(alg: MacAlgorithm, secret: &SharedSecret, message: &[u8]) -> Tag {
    match alg {
        MacAlgorithm::HmacSha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(secret.as_bytes())
                .expect("HMAC accepts arbitrary key lengths");
            mac.update(message);
            Tag(mac.finalize().into_bytes().to_vec())
        }
        MacAlgorithm::HmacSha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
                .expect("HMAC accepts arbitrary key lengths");
            mac.update(message);
            Tag(mac.finalize().into_bytes().to_vec())
        }
    }
}

/// Recompute the expected tag and compare against `candidate` in constant
/// time. Returns `Ok(false)` on mismatch; mismatch is never an error.
///
/// # Errors
/// `MacError::LengthMismatch` if `candidate` is not exactly `alg.tag_len()`
/// bytes.
pub fn verify_tag(
    alg: MacAlgorithm,
    secret: &SharedSecret,
    message: &[u8],
    candidate: &[u8],
) -> Result<bool, MacError> {
    if candidate.len() != alg.tag_len() {
        return Err(MacError::LengthMismatch {
            expected: alg.tag_len(),
            actual: candidate.len(),
        });
    }
    let expected = compute_tag(alg, secret, message);
    Ok(bool::from(expected.as_bytes().ct_eq(candidate)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALGS: [MacAlgorithm; 2] = [MacAlgorithm::HmacSha1, MacAlgorithm::HmacSha256];

    #[test]
    fn verify_accepts_own_tag() {
        for alg in ALGS {
            let secret = SharedSecret::new("pass123");
            let tag = compute_tag(alg, &secret, b"some challenge bytes");
            assert_eq!(tag.len(), alg.tag_len());
            assert!(verify_tag(alg, &secret, b"some challenge bytes", tag.as_bytes()).unwrap());
        }
    }

    #[test]
    fn compute_is_deterministic() {
        for alg in ALGS {
            let secret = SharedSecret::new("pass123");
            let a = compute_tag(alg, &secret, b"msg");
            let b = compute_tag(alg, &secret, b"msg");
            assert_eq!(a, b);
        }
    }

    #[test]
    fn wrong_secret_rejected() {
        for alg in ALGS {
            let tag = compute_tag(alg, &SharedSecret::new("wrong"), b"challenge");
            let ok = verify_tag(alg, &SharedSecret::new("pass123"), b"challenge", tag.as_bytes())
                .unwrap();
            assert!(!ok);
        }
    }

    #[test]
    fn wrong_message_rejected() {
        for alg in ALGS {
            let secret = SharedSecret::new("pass123");
            let tag = compute_tag(alg, &secret, b"challenge-a");
            assert!(!verify_tag(alg, &secret, b"challenge-b", tag.as_bytes()).unwrap());
        }
    }

    // Functional contract behind the constant-time comparison: a mismatch at
    // any offset, first or last byte included, yields false (never a panic,
    // never an error).
    #[test]
    fn mismatch_at_every_offset_rejected() {
        for alg in ALGS {
            let secret = SharedSecret::new("pass123");
            let good = compute_tag(alg, &secret, b"challenge");
            for i in 0..good.len() {
                let mut bad = good.as_bytes().to_vec();
                bad[i] ^= 0x01;
                assert!(
                    !verify_tag(alg, &secret, b"challenge", &bad).unwrap(),
                    "offset {i}"
                );
            }
        }
    }

    #[test]
    fn malformed_candidate_length_is_error() {
        for alg in ALGS {
            let secret = SharedSecret::new("pass123");
            for len in [0usize, alg.tag_len() - 1, alg.tag_len() + 1] {
                let err =
                    verify_tag(alg, &secret, b"challenge", &vec![0u8; len]).unwrap_err();
                assert_eq!(
                    err,
                    MacError::LengthMismatch {
                        expected: alg.tag_len(),
                        actual: len
                    }
                );
            }
        }
    }

    // RFC 2202 test case 1.
    #[test]
    fn hmac_sha1_known_answer() {
        let secret = SharedSecret::new(vec![0x0bu8; 20]);
        let tag = compute_tag(MacAlgorithm::HmacSha1, &secret, b"Hi There");
        assert_eq!(
            hex::encode(tag.as_bytes()),
            "b617318655057264e28bc0b6fb378c8ef146be00"
        );
    }

    // RFC 4231 test case 1.
    #[test]
    fn hmac_sha256_known_answer() {
        let secret = SharedSecret::new(vec![0x0bu8; 20]);
        let tag = compute_tag(MacAlgorithm::HmacSha256, &secret, b"Hi There");
        assert_eq!(
            hex::encode(tag.as_bytes()),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn tag_formatting_redacted() {
        let tag = compute_tag(
            MacAlgorithm::HmacSha1,
            &SharedSecret::new("pass123"),
            b"challenge",
        );
        let dbg = format!("{tag:?}");
        assert_eq!(dbg, "Tag(20 bytes)");
        let disp = format!("{tag}");
        assert!(disp.ends_with('…'));
        assert!(disp.len() < 2 * tag.len());
    }
}

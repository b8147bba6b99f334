use core::fmt;

use zeroize::Zeroize;

/// Pre-shared secret known identically to both roles, provisioned out of
/// band. Never transmitted; only fed into the keyed MAC.
///
/// Modeled as an explicit value handed to the `Verifier`/`Prover`
/// constructors rather than process-wide state, so independent sessions
/// (including tests) can use distinct secrets without interference.
///
/// Security:
/// - Zeroized on drop.
/// - `Debug` redacts the value. Do not log raw key material.
/// - Equality checks on secrets are deliberately not provided; comparing
///   secrets byte-wise invites timing leaks. Compare MAC tags instead.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SharedSecret(Vec<u8>);

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret(..)")
    }
}

impl SharedSecret {
    /// Wrap secret bytes. Accepts anything convertible into owned bytes
    /// (`Vec<u8>`, `&str`, `String`, byte slices).
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        SharedSecret(bytes.into())
    }

    /// Borrow the secret bytes for MAC keying.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for SharedSecret {
    fn from(value: &[u8]) -> Self {
        SharedSecret(value.to_vec())
    }
}

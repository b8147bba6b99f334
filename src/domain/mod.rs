//! Domain types and their invariants.
//!
//! No I/O and no crypto live here: these are the values the protocol and
//! application layers pass around, each enforcing its own structural rules
//! (length bounds, redacted formatting, zeroization).

pub mod challenge;
pub mod params;
pub mod secret;
pub mod verdict;

pub use challenge::{Challenge, ChallengeError};
pub use secret::SharedSecret;
pub use verdict::{Verdict, VerdictError};

//! Crate root for `chap`.
//!
//! Minimal challenge-response authentication over a byte-stream transport:
//! the verifier (server) issues a fresh random challenge, the prover
//! (client) answers with a keyed MAC over it, and the verifier judges the
//! response with a constant-time comparison. The shared secret never crosses
//! the wire.
//!
//! High-level tree:
//! * `domain` – types and invariants: challenge, shared secret, verdict,
//!   protocol constants.
//! * `protocol` – role-independent wire mechanics: length-prefixed framing
//!   and the keyed MAC engine.
//! * `application` – configuration, error taxonomy, the pure session state
//!   machine, and the verifier/prover drivers (generic over any
//!   `Read + Write` transport).
//! * `adapters` – concrete transports; currently TCP with a
//!   thread-per-session accept loop.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod protocol;

pub use application::{AuthConfig, ConfigError, Prover, SessionError, Verifier};
pub use domain::{Challenge, SharedSecret, Verdict};
pub use protocol::MacAlgorithm;

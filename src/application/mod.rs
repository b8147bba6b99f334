//! Session orchestration: configuration, error taxonomy, the pure state
//! machine, and the per-role drivers that tie framing, challenge, and MAC
//! together over an owned transport.

pub mod config;
pub mod errors;
pub mod fsm;
pub mod prover;
pub mod verifier;

pub use config::{AuthConfig, ConfigError};
pub use errors::{ProtocolViolation, SessionError};
pub use fsm::{Role, SessionFsm, SessionState};
pub use prover::Prover;
pub use verifier::Verifier;

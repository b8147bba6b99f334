//! ---- Protocol size & defensive constants (v1 parameter set) ----
//!
//! Central home for every tunable the wire format and the session drivers
//! agree on. Anything configurable at runtime defaults to the value here.

use std::time::Duration;

/// Default challenge length in bytes.
pub const CHALLENGE_LEN: usize = 16;

/// Smallest challenge length a session will generate or accept.
pub const MIN_CHALLENGE_LEN: usize = 8;

/// Largest challenge length a session will generate or accept.
///
/// The bound is explicit and validated; callers cannot request more.
pub const MAX_CHALLENGE_LEN: usize = 64;

/// Width of the big-endian frame length prefix on the wire.
pub const LEN_PREFIX_LEN: usize = 4;

/// Default cap on a declared frame length. Frames claiming more are refused
/// before any payload byte is read or allocated.
pub const MAX_FRAME_LEN: usize = 1024;

/// Default per-operation read/write timeout applied by transport adapters.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Courtesy greeting the verifier sends on accept. Content is never
/// semantically checked by the peer.
pub const VERIFIER_GREETING: &[u8] = b"chap v1 ready";

/// Courtesy greeting the prover opens with.
pub const PROVER_GREETING: &[u8] = b"hello";

//! TCP transport glue.
//!
//! The core drivers only need `Read + Write`; this adapter supplies real
//! sockets. Each accepted connection becomes one session handled by its own
//! thread, owning the stream exclusively until the session ends. Sessions
//! are failure-isolated: one session's error is logged and never reaches the
//! accept loop or any other session. Per-operation timeouts from the
//! configuration are applied to every socket so a stalled peer surfaces as a
//! transport error instead of pinning a thread.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::rngs::OsRng;
use tracing::{info, warn};

use crate::application::errors::SessionError;
use crate::application::prover::Prover;
use crate::application::verifier::Verifier;
use crate::domain::verdict::Verdict;

fn apply_timeouts(stream: &TcpStream, timeout: Duration) -> io::Result<()> {
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))
}

/// Run one verifier session over an accepted stream.
///
/// # Errors
/// `SessionError` as surfaced by the driver, including timeouts mapped from
/// the socket's read/write deadlines.
pub fn run_verifier_session(
    stream: TcpStream,
    peer: SocketAddr,
    verifier: &Verifier,
) -> Result<Verdict, SessionError> {
    apply_timeouts(&stream, verifier.config().io_timeout).map_err(SessionError::Transport)?;
    let verdict = verifier.authenticate(stream, &mut OsRng)?;
    info!(%peer, %verdict, "session settled");
    Ok(verdict)
}

/// Accept connections forever, spawning one session thread per client.
///
/// Returns only if `accept` itself fails or a session thread cannot be
/// spawned; individual session failures are logged and swallowed.
///
/// # Errors
/// The listener's `accept` error, or the spawn error for a session thread.
pub fn serve(listener: TcpListener, verifier: Arc<Verifier>) -> io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "listening");
    loop {
        let (stream, peer) = listener.accept()?;
        let verifier = Arc::clone(&verifier);
        thread::Builder::new()
            .name(format!("session-{peer}"))
            .spawn(move || {
                if let Err(err) = run_verifier_session(stream, peer, &verifier) {
                    warn!(%peer, error = %err, "session failed");
                }
            })?;
    }
}

/// Connect to a verifier and run one prover session.
///
/// # Errors
/// `SessionError::Transport` if the connection cannot be established or
/// configured; otherwise whatever the prover driver surfaces.
pub fn connect<A: ToSocketAddrs>(addr: A, prover: &Prover) -> Result<Verdict, SessionError> {
    let stream = TcpStream::connect(addr).map_err(SessionError::Transport)?;
    apply_timeouts(&stream, prover.config().io_timeout).map_err(SessionError::Transport)?;
    prover.authenticate(stream)
}

//! Prover-side session driver.
//!
//! Mirrors the verifier's sequence from the client seat: greet, receive the
//! challenge, answer with the keyed tag, accept the verdict. No local
//! verification is possible — the prover trusts the verifier's verdict.

use std::convert::TryFrom;
use std::io::{Read, Write};

use tracing::debug;

use crate::application::config::{AuthConfig, ConfigError};
use crate::application::errors::SessionError;
use crate::application::fsm::{Role, SessionEvent, SessionFsm};
use crate::domain::challenge::Challenge;
use crate::domain::params::PROVER_GREETING;
use crate::domain::secret::SharedSecret;
use crate::domain::verdict::Verdict;
use crate::protocol::frame::{read_frame, write_frame};
use crate::protocol::mac::compute_tag;

/// Client-side endpoint: demonstrates knowledge of the shared secret.
pub struct Prover {
    secret: SharedSecret,
    config: AuthConfig,
}

impl Prover {
    /// Build a prover from an out-of-band secret and validated config.
    ///
    /// # Errors
    /// `ConfigError` if the configuration is internally inconsistent.
    pub fn new(secret: SharedSecret, config: AuthConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Prover { secret, config })
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Run one complete session over an owned transport and surface the
    /// verifier's verdict. The transport is dropped on every exit path.
    ///
    /// # Errors
    /// `SessionError` on transport failure or protocol violation (oversized
    /// frame, out-of-bound challenge, malformed verdict).
    pub fn authenticate<T>(&self, mut transport: T) -> Result<Verdict, SessionError>
    where
        T: Read + Write,
    {
        let mut fsm = SessionFsm::new(Role::Prover);
        let outcome = self.drive(&mut transport, &mut fsm);
        if outcome.is_err() {
            fsm.fail();
        }
        outcome
    }

    fn drive<T>(&self, transport: &mut T, fsm: &mut SessionFsm) -> Result<Verdict, SessionError>
    where
        T: Read + Write,
    {
        let max = self.config.max_frame_len;

        write_frame(transport, PROVER_GREETING, max)?;
        // The verifier's courtesy greeting precedes the challenge on the
        // ordered stream; consume it unchecked.
        let _peer_greeting = read_frame(transport, max)?;
        fsm.apply(SessionEvent::GreetingExchanged)?;
        debug!("greeting exchanged");

        let payload = read_frame(transport, max)?;
        let challenge = Challenge::try_from(payload.as_slice())?;
        debug!(%challenge, "challenge received");

        let tag = compute_tag(self.config.algorithm, &self.secret, challenge.as_bytes());
        write_frame(transport, tag.as_bytes(), max)?;
        fsm.apply(SessionEvent::ChallengeIssued)?;
        debug!(%tag, "response sent");

        let verdict_frame = read_frame(transport, max)?;
        let verdict = Verdict::from_frame(&verdict_frame)?;
        fsm.apply(SessionEvent::Settle(verdict))?;
        debug!(%verdict, "session settled");
        Ok(verdict)
    }
}

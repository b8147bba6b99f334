//! Verifier-side session driver.
//!
//! Owns the transport for the session's lifetime and drives the message
//! sequence: greeting exchange, challenge issuance, response verification,
//! verdict. The pure state machine in `fsm` validates each step's order.

use std::io::{Read, Write};

use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::application::config::{AuthConfig, ConfigError};
use crate::application::errors::SessionError;
use crate::application::fsm::{Role, SessionEvent, SessionFsm};
use crate::domain::challenge::Challenge;
use crate::domain::params::VERIFIER_GREETING;
use crate::domain::secret::SharedSecret;
use crate::domain::verdict::Verdict;
use crate::protocol::frame::{read_frame, write_frame};
use crate::protocol::mac::verify_tag;

/// Server-side endpoint: issues challenges and judges responses.
///
/// One `Verifier` value can serve any number of sessions (it holds only the
/// immutable secret and configuration); each session gets its own owned
/// transport and its own state machine.
pub struct Verifier {
    secret: SharedSecret,
    config: AuthConfig,
}

impl Verifier {
    /// Build a verifier from an out-of-band secret and validated config.
    ///
    /// # Errors
    /// `ConfigError` if the configuration is internally inconsistent.
    pub fn new(secret: SharedSecret, config: AuthConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Verifier { secret, config })
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Run one complete session over an owned transport.
    ///
    /// The transport is consumed and dropped on every exit path, so the
    /// connection is released exactly once whether the session settles,
    /// rejects, or fails early. A MAC mismatch yields `Ok(Verdict::Rejected)`
    /// — the peer is always told the outcome.
    ///
    /// # Errors
    /// `SessionError` on transport failure, protocol violation, or entropy
    /// exhaustion. Nothing is retried; a retry is a fresh session.
    pub fn authenticate<T, R>(&self, mut transport: T, rng: &mut R) -> Result<Verdict, SessionError>
    where
        T: Read + Write,
        R: CryptoRng + RngCore,
    {
        let mut fsm = SessionFsm::new(Role::Verifier);
        let outcome = self.drive(&mut transport, rng, &mut fsm);
        if outcome.is_err() {
            fsm.fail();
        }
        outcome
    }

    fn drive<T, R>(
        &self,
        transport: &mut T,
        rng: &mut R,
        fsm: &mut SessionFsm,
    ) -> Result<Verdict, SessionError>
    where
        T: Read + Write,
        R: CryptoRng + RngCore,
    {
        let max = self.config.max_frame_len;

        write_frame(transport, VERIFIER_GREETING, max)?;
        // Courtesy frame; content deliberately unchecked beyond framing.
        let _peer_greeting = read_frame(transport, max)?;
        fsm.apply(SessionEvent::GreetingExchanged)?;
        debug!("greeting exchanged");

        let challenge = Challenge::generate(rng, self.config.challenge_len)?;
        write_frame(transport, challenge.as_bytes(), max)?;
        debug!(%challenge, "challenge issued");
        fsm.bind_challenge(challenge)?;
        fsm.apply(SessionEvent::ChallengeIssued)?;

        let response = read_frame(transport, max)?;
        fsm.apply(SessionEvent::ResponseReceived)?;

        let challenge = fsm.take_challenge()?;
        let matched = verify_tag(
            self.config.algorithm,
            &self.secret,
            challenge.as_bytes(),
            &response,
        )?;
        let verdict = if matched {
            Verdict::Authenticated
        } else {
            Verdict::Rejected
        };
        write_frame(transport, &verdict.to_frame(), max)?;
        fsm.apply(SessionEvent::Settle(verdict))?;
        debug!(%verdict, "session settled");
        Ok(verdict)
    }
}

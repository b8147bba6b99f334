//! Pure session state machine.
//!
//! Tracks the current state and role to enforce valid transition order and
//! reject duplicate or out-of-sequence steps. No I/O happens here: the
//! drivers in `verifier`/`prover` perform the reads and writes and report
//! each completed step as an event.
//!
//! The verifier-side machine also owns the session's challenge. `bind_challenge`
//! accepts it exactly once and `take_challenge` releases it exactly once, so a
//! challenge can never be verified against twice or reused by a later session.

use crate::application::errors::SessionError;
use crate::domain::challenge::Challenge;
use crate::domain::verdict::Verdict;

/// Which role this endpoint plays in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Verifier,
    Prover,
}

/// Session lifecycle states.
///
/// The prover skips `ResponseReceived` (it sends the response; only the
/// verifier receives one). `Failed` is reachable from every non-terminal
/// state on transport or protocol failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connection established, nothing exchanged.
    Connected,
    /// Both courtesy greetings are on the wire and the peer's was consumed.
    GreetingExchanged,
    /// Verifier: challenge sent. Prover: challenge received and answered.
    ChallengeIssued,
    /// Verifier only: candidate tag received, not yet judged.
    ResponseReceived,
    /// Terminal: proof accepted.
    Authenticated,
    /// Terminal: proof did not match; the peer was told so.
    Rejected,
    /// Terminal: transport/protocol failure; no verdict was rendered.
    Failed,
}

impl SessionState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Authenticated | SessionState::Rejected | SessionState::Failed
        )
    }
}

/// Discrete events that advance the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Greeting sent and peer greeting consumed.
    GreetingExchanged,
    /// Verifier: challenge written. Prover: challenge read, response written.
    ChallengeIssued,
    /// Verifier only: candidate tag read.
    ResponseReceived,
    /// Verdict rendered (verifier) or received (prover).
    Settle(Verdict),
    /// Transport or protocol failure.
    Fail,
}

/// Session state machine carrying the minimal per-session state: role,
/// current state, and (verifier only) the bound challenge.
pub struct SessionFsm {
    role: Role,
    state: SessionState,
    challenge: Option<Challenge>,
}

impl SessionFsm {
    #[must_use]
    pub fn new(role: Role) -> Self {
        SessionFsm {
            role,
            state: SessionState::Connected,
            challenge: None,
        }
    }

    fn state_ordinal(state: SessionState) -> u8 {
        match state {
            SessionState::Connected => 0,
            SessionState::GreetingExchanged => 1,
            SessionState::ChallengeIssued => 2,
            SessionState::ResponseReceived => 3,
            SessionState::Authenticated | SessionState::Rejected | SessionState::Failed => 4,
        }
    }

    /// Apply an event, advancing the state or rejecting the transition.
    ///
    /// # Errors
    /// `SessionError::State` if the event is not valid for the current
    /// role and state.
    pub fn apply(&mut self, ev: SessionEvent) -> Result<(), SessionError> {
        let old = self.state;
        let new = match (self.role, old, ev) {
            (_, SessionState::Connected, SessionEvent::GreetingExchanged) => {
                SessionState::GreetingExchanged
            }
            (_, SessionState::GreetingExchanged, SessionEvent::ChallengeIssued) => {
                SessionState::ChallengeIssued
            }
            (Role::Verifier, SessionState::ChallengeIssued, SessionEvent::ResponseReceived) => {
                SessionState::ResponseReceived
            }
            (Role::Verifier, SessionState::ResponseReceived, SessionEvent::Settle(v))
            | (Role::Prover, SessionState::ChallengeIssued, SessionEvent::Settle(v)) => match v {
                Verdict::Authenticated => SessionState::Authenticated,
                Verdict::Rejected => SessionState::Rejected,
            },
            (_, s, SessionEvent::Fail) if !s.is_terminal() => SessionState::Failed,
            _ => {
                return Err(SessionError::State(format!(
                    "{:?}: {ev:?} not valid in {old:?}",
                    self.role
                )));
            }
        };
        debug_assert!(
            Self::state_ordinal(new) >= Self::state_ordinal(old),
            "state regression: {old:?} -> {new:?}"
        );
        self.state = new;
        Ok(())
    }

    /// Mark the session failed. Idempotent once terminal.
    pub fn fail(&mut self) {
        let _ = self.apply(SessionEvent::Fail);
    }

    /// Store the session's challenge. Verifier-side, exactly once.
    ///
    /// # Errors
    /// `SessionError::State` on the prover role or a second bind.
    pub fn bind_challenge(&mut self, challenge: Challenge) -> Result<(), SessionError> {
        if self.role != Role::Verifier {
            return Err(SessionError::State(
                "only the verifier binds a challenge".into(),
            ));
        }
        if self.challenge.is_some() {
            return Err(SessionError::State(
                "challenge already bound to this session".into(),
            ));
        }
        self.challenge = Some(challenge);
        Ok(())
    }

    /// Release the bound challenge for its single verification attempt.
    ///
    /// # Errors
    /// `SessionError::State` if no challenge is bound (never bound, or
    /// already consumed by a prior attempt).
    pub fn take_challenge(&mut self) -> Result<Challenge, SessionError> {
        self.challenge
            .take()
            .ok_or_else(|| SessionError::State("no challenge bound to this session".into()))
    }

    /// Read-only view of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Terminal verdict, if the session settled with one.
    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        match self.state {
            SessionState::Authenticated => Some(Verdict::Authenticated),
            SessionState::Rejected => Some(Verdict::Rejected),
            _ => None,
        }
    }
}

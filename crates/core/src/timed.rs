//! Elapsed-time driven progress sessions.
//!
//! A [`ProgressCurve`] turns elapsed time into a display frame and knows when it
//! is done. [`TimedSession`] wraps one curve in the idle/active/settling
//! lifecycle and guarantees a single terminal outcome per activation. Nothing
//! here touches timers; the caller feeds elapsed time in.

use std::fmt::Debug;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::ParamsError;
use crate::model::SessionId;

/// One timed model: how progress is derived from elapsed time.
pub trait ProgressCurve: Sized {
    type Params;
    type Frame: Clone + Debug;
    type Outcome: Clone + Debug;

    /// Validate start parameters and build the curve at zero progress.
    ///
    /// # Errors
    ///
    /// Returns `ParamsError` when the parameters cannot produce a session.
    fn begin(params: Self::Params) -> Result<Self, ParamsError>;

    /// Recompute progress for `elapsed` since activation and return the frame
    /// to display. Progress never moves backwards.
    fn advance(&mut self, elapsed: Duration) -> Self::Frame;

    /// The frame for the current progress without advancing.
    fn frame(&self) -> Self::Frame;

    fn is_complete(&self) -> bool;

    /// Terminal payload reported to the host.
    fn outcome(&self, completed: bool) -> Self::Outcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Active,
    /// Terminal outcome emitted; waiting out the display hold.
    Settling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started(SessionId),
    /// A session is already running; nothing changed.
    AlreadyActive,
}

/// Result of sampling an active session.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSample<F> {
    pub frame: F,
    pub complete: bool,
}

#[derive(Debug)]
enum State<C: ProgressCurve> {
    Idle,
    Active {
        id: SessionId,
        curve: C,
        started_at: DateTime<Utc>,
    },
    Settling {
        id: SessionId,
        outcome: C::Outcome,
    },
}

/// A pool of one: at most one session per instance, reused after each
/// terminal transition.
#[derive(Debug)]
pub struct TimedSession<C: ProgressCurve> {
    state: State<C>,
    next_id: u64,
}

impl<C: ProgressCurve> Default for TimedSession<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ProgressCurve> TimedSession<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            next_id: 1,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self.state {
            State::Idle => SessionPhase::Idle,
            State::Active { .. } => SessionPhase::Active,
            State::Settling { .. } => SessionPhase::Settling,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active { .. })
    }

    /// Id of the running or settling session.
    #[must_use]
    pub fn id(&self) -> Option<SessionId> {
        match &self.state {
            State::Idle => None,
            State::Active { id, .. } | State::Settling { id, .. } => Some(*id),
        }
    }

    #[must_use]
    pub fn curve(&self) -> Option<&C> {
        match &self.state {
            State::Active { curve, .. } => Some(curve),
            _ => None,
        }
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            State::Active { started_at, .. } => Some(*started_at),
            _ => None,
        }
    }

    /// Outcome of the session currently waiting out its display hold.
    #[must_use]
    pub fn settled_outcome(&self) -> Option<&C::Outcome> {
        match &self.state {
            State::Settling { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    /// Activate a new session.
    ///
    /// A running session is left untouched. A settling session is replaced.
    ///
    /// # Errors
    ///
    /// Returns `ParamsError` if the curve rejects `params`; the session stays
    /// in its previous phase.
    pub fn start(
        &mut self,
        params: C::Params,
        started_at: DateTime<Utc>,
    ) -> Result<StartOutcome, ParamsError> {
        if self.is_active() {
            return Ok(StartOutcome::AlreadyActive);
        }
        let curve = C::begin(params)?;
        let id = SessionId::new(self.next_id);
        self.next_id += 1;
        self.state = State::Active {
            id,
            curve,
            started_at,
        };
        Ok(StartOutcome::Started(id))
    }

    /// Advance the active session to `elapsed`. Returns `None` when idle or
    /// settling, so late ticks cannot touch a finished session.
    pub fn sample(&mut self, elapsed: Duration) -> Option<TickSample<C::Frame>> {
        let State::Active { curve, .. } = &mut self.state else {
            return None;
        };
        let frame = curve.advance(elapsed);
        Some(TickSample {
            frame,
            complete: curve.is_complete(),
        })
    }

    /// The single terminal transition. Only an active session produces an
    /// outcome; every later call returns `None`.
    pub fn terminate(&mut self, completed: bool) -> Option<C::Outcome> {
        let State::Active { id, curve, .. } = &self.state else {
            return None;
        };
        let id = *id;
        let outcome = curve.outcome(completed);
        self.state = State::Settling {
            id,
            outcome: outcome.clone(),
        };
        Some(outcome)
    }

    /// Return to idle once the display hold for `id` has elapsed. Stale ids
    /// are ignored.
    pub fn settle(&mut self, id: SessionId) -> bool {
        match &self.state {
            State::Settling { id: current, .. } if *current == id => {
                self.state = State::Idle;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProgressBar, ProgressParams};
    use crate::time::fixed_now;

    fn params(cancellable: bool) -> ProgressParams {
        ProgressParams::new("Refuelling", Duration::from_millis(1_000), cancellable)
    }

    #[test]
    fn start_while_active_keeps_running_session() {
        let mut session = TimedSession::<ProgressBar>::new();
        let first = session.start(params(true), fixed_now()).unwrap();
        session.sample(Duration::from_millis(300));

        let second = session.start(params(false), fixed_now()).unwrap();

        assert!(matches!(first, StartOutcome::Started(_)));
        assert_eq!(second, StartOutcome::AlreadyActive);
        let bar = session.curve().unwrap();
        assert!(bar.cancellable());
        assert!(bar.percent() > 0.0);
    }

    #[test]
    fn terminate_yields_one_outcome() {
        let mut session = TimedSession::<ProgressBar>::new();
        session.start(params(true), fixed_now()).unwrap();

        assert!(session.terminate(false).is_some());
        assert!(session.terminate(false).is_none());
        assert!(session.terminate(true).is_none());
        assert_eq!(session.phase(), SessionPhase::Settling);
        assert_eq!(
            session.settled_outcome(),
            Some(&crate::model::ProgressComplete { completed: false })
        );
    }

    #[test]
    fn sample_after_terminate_is_ignored() {
        let mut session = TimedSession::<ProgressBar>::new();
        session.start(params(true), fixed_now()).unwrap();
        session.terminate(true);

        assert!(session.sample(Duration::from_millis(500)).is_none());
    }

    #[test]
    fn stale_settle_does_not_reset_new_session() {
        let mut session = TimedSession::<ProgressBar>::new();
        let StartOutcome::Started(first) = session.start(params(true), fixed_now()).unwrap()
        else {
            panic!("expected a new session");
        };
        session.terminate(false);
        let StartOutcome::Started(second) = session.start(params(true), fixed_now()).unwrap()
        else {
            panic!("expected a new session");
        };

        assert_ne!(first, second);
        assert!(!session.settle(first));
        assert!(session.is_active());
    }

    #[test]
    fn rejected_params_leave_session_idle() {
        let mut session = TimedSession::<ProgressBar>::new();
        let err = session
            .start(
                ProgressParams::new("x", Duration::ZERO, false),
                fixed_now(),
            )
            .unwrap_err();

        assert_eq!(err, ParamsError::ZeroDuration);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn sample_reports_completion() {
        let mut session = TimedSession::<ProgressBar>::new();
        session.start(params(false), fixed_now()).unwrap();

        let sample = session.sample(Duration::from_millis(1_000)).unwrap();

        assert!(sample.complete);
        assert_eq!(sample.frame.percent, 100.0);
    }
}

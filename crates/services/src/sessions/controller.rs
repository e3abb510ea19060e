use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::debug;

use hud_core::{
    Clock, ParamsError, ProgressCurve, SessionId, SessionPhase, StartOutcome, TimedSession,
};

use crate::config::ControllerSettings;
use crate::display::FrameSink;
use crate::notifier::{HostNotifier, Notification};

use super::schedule::{TickSchedule, spawn_delayed, spawn_repeating};

/// Point-in-time view of a controller, for logs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerStatus {
    pub phase: SessionPhase,
    pub session: Option<SessionId>,
    pub started_at: Option<DateTime<Utc>>,
    pub ticking: bool,
}

struct Inner<C: ProgressCurve> {
    session: TimedSession<C>,
    started: Instant,
    ticks: TickSchedule,
    hold: TickSchedule,
}

struct Shared<C: ProgressCurve> {
    name: &'static str,
    settings: ControllerSettings,
    clock: Clock,
    sink: Arc<dyn FrameSink<C>>,
    notifier: Arc<dyn HostNotifier>,
    inner: Mutex<Inner<C>>,
}

/// Drives one [`ProgressCurve`] from a repeating tick.
///
/// All transitions, including ticks, take the same lock, and the sink and
/// notifier are called with it held. A session therefore emits its frames in
/// order, then exactly one outcome, and nothing after that.
pub struct TimedController<C: ProgressCurve> {
    shared: Arc<Shared<C>>,
}

impl<C: ProgressCurve> Clone for TimedController<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<C> TimedController<C>
where
    C: ProgressCurve + Send + 'static,
    C::Outcome: Into<Notification> + Send,
    C::Frame: Send,
{
    #[must_use]
    pub fn new(
        name: &'static str,
        settings: ControllerSettings,
        clock: Clock,
        sink: Arc<dyn FrameSink<C>>,
        notifier: Arc<dyn HostNotifier>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                name,
                settings,
                clock,
                sink,
                notifier,
                inner: Mutex::new(Inner {
                    session: TimedSession::new(),
                    started: Instant::now(),
                    ticks: TickSchedule::Idle,
                    hold: TickSchedule::Idle,
                }),
            }),
        }
    }

    /// Activate a session and begin ticking.
    ///
    /// A running session is left as is and `AlreadyActive` is returned. A
    /// session still in its display hold is replaced.
    ///
    /// # Errors
    ///
    /// Returns `ParamsError` when the curve rejects `params`; nothing starts.
    pub fn start(&self, params: C::Params) -> Result<StartOutcome, ParamsError> {
        let shared = &self.shared;
        let mut inner = shared.lock();

        let started_at = shared.clock.now();
        let outcome = inner.session.start(params, started_at)?;
        let StartOutcome::Started(id) = outcome else {
            debug!(controller = shared.name, "start ignored, session already active");
            return Ok(outcome);
        };

        inner.hold.cancel();
        inner.started = Instant::now();
        if let Some(curve) = inner.session.curve() {
            shared.sink.started(curve);
        }

        let weak = Arc::downgrade(shared);
        let handle = spawn_repeating(shared.settings.tick, move || Shared::tick(&weak, id));
        inner.ticks.set(handle);

        debug!(controller = shared.name, session = %id, "session started");
        Ok(outcome)
    }

    /// Terminate the running session. Returns the outcome sent to the host,
    /// or `None` when nothing was running.
    pub fn finish(&self, completed: bool) -> Option<C::Outcome> {
        let mut inner = self.shared.lock();
        self.shared.terminate(&mut inner, completed)
    }

    /// Terminate the running session only if `allow` accepts its curve.
    /// Check and termination happen under one lock.
    pub fn finish_if(
        &self,
        allow: impl FnOnce(&C) -> bool,
        completed: bool,
    ) -> Option<C::Outcome> {
        let mut inner = self.shared.lock();
        if !inner.session.curve().is_some_and(allow) {
            return None;
        }
        self.shared.terminate(&mut inner, completed)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.shared.lock().session.is_active()
    }

    #[must_use]
    pub fn status(&self) -> ControllerStatus {
        let inner = self.shared.lock();
        ControllerStatus {
            phase: inner.session.phase(),
            session: inner.session.id(),
            started_at: inner.session.started_at(),
            ticking: inner.ticks.is_scheduled(),
        }
    }

    /// Run `read` against the active curve.
    pub fn inspect<R>(&self, read: impl FnOnce(&C) -> R) -> Option<R> {
        self.shared.lock().session.curve().map(read)
    }

    /// Display values of the active session without advancing it.
    #[must_use]
    pub fn current_frame(&self) -> Option<C::Frame> {
        self.inspect(C::frame)
    }
}

impl<C> Shared<C>
where
    C: ProgressCurve + Send + 'static,
    C::Outcome: Into<Notification> + Send,
    C::Frame: Send,
{
    fn lock(&self) -> MutexGuard<'_, Inner<C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tick(weak: &Weak<Self>, id: SessionId) -> ControlFlow<()> {
        let Some(shared) = weak.upgrade() else {
            return ControlFlow::Break(());
        };
        let mut inner = shared.lock();
        if inner.session.id() != Some(id) {
            return ControlFlow::Break(());
        }
        let elapsed = inner.started.elapsed();
        let Some(sample) = inner.session.sample(elapsed) else {
            return ControlFlow::Break(());
        };

        shared.sink.frame(&sample.frame);
        if sample.complete {
            shared.terminate(&mut inner, true);
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    fn terminate(self: &Arc<Self>, inner: &mut Inner<C>, completed: bool) -> Option<C::Outcome> {
        let id = inner.session.id()?;
        let outcome = inner.session.terminate(completed)?;
        inner.ticks.cancel();

        self.sink.finished(&outcome);
        self.notifier.notify(outcome.clone().into());
        debug!(controller = self.name, session = %id, completed, "session finished");

        let hold = self.settings.hold_for(completed);
        if hold.is_zero() {
            self.settle(inner, id);
        } else {
            let weak = Arc::downgrade(self);
            inner.hold.set(spawn_delayed(hold, move || {
                if let Some(shared) = weak.upgrade() {
                    let mut inner = shared.lock();
                    shared.settle(&mut inner, id);
                }
            }));
        }
        Some(outcome)
    }

    fn settle(&self, inner: &mut Inner<C>, id: SessionId) {
        if inner.session.settle(id) {
            inner.hold = TickSchedule::Idle;
            self.sink.cleared();
            debug!(controller = self.name, session = %id, "session settled");
        }
    }
}

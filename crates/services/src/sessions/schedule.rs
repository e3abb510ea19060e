use std::mem;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::AbortHandle;
use tokio::time::{MissedTickBehavior, interval};

/// Handle to a spawned timer task. Cancelling it stops the task at its next
/// await point.
#[derive(Debug)]
pub struct TickHandle {
    abort: AbortHandle,
}

impl TickHandle {
    pub fn cancel(self) {
        self.abort.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Whether a timer task is outstanding.
#[derive(Debug, Default)]
pub enum TickSchedule {
    #[default]
    Idle,
    Scheduled(TickHandle),
}

impl TickSchedule {
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        matches!(self, TickSchedule::Scheduled(_))
    }

    /// Cancel any outstanding task and return to `Idle`.
    pub fn cancel(&mut self) {
        if let TickSchedule::Scheduled(handle) = mem::take(self) {
            handle.cancel();
        }
    }

    /// Replace the outstanding task, cancelling the previous one.
    pub fn set(&mut self, handle: TickHandle) {
        self.cancel();
        *self = TickSchedule::Scheduled(handle);
    }
}

/// Run `tick` every `period`, starting immediately, until it breaks.
///
/// Must be called from within a tokio runtime.
pub fn spawn_repeating<F>(period: Duration, mut tick: F) -> TickHandle
where
    F: FnMut() -> ControlFlow<()> + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if tick().is_break() {
                break;
            }
        }
    });
    TickHandle {
        abort: task.abort_handle(),
    }
}

/// Run `action` once after `delay`.
///
/// Must be called from within a tokio runtime.
pub fn spawn_delayed<F>(delay: Duration, action: F) -> TickHandle
where
    F: FnOnce() + Send + 'static,
{
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        action();
    });
    TickHandle {
        abort: task.abort_handle(),
    }
}

use std::sync::Arc;
use std::time::Duration;

use hud_core::{
    Clock, ParamsError, ProgressBar, ProgressComplete, ProgressFrame, ProgressParams,
    StartOutcome,
};

use crate::config::ControllerSettings;
use crate::display::FrameSink;
use crate::notifier::HostNotifier;

use super::controller::{ControllerStatus, TimedController};

/// Generic busy indicator for host operations, optionally cancellable by the
/// player.
#[derive(Clone)]
pub struct ProgressSimulator {
    controller: TimedController<ProgressBar>,
}

impl ProgressSimulator {
    #[must_use]
    pub fn new(
        settings: ControllerSettings,
        clock: Clock,
        sink: Arc<dyn FrameSink<ProgressBar>>,
        notifier: Arc<dyn HostNotifier>,
    ) -> Self {
        Self {
            controller: TimedController::new("progress", settings, clock, sink, notifier),
        }
    }

    /// # Errors
    ///
    /// Returns `ParamsError::ZeroDuration` when `duration` is zero.
    pub fn start(
        &self,
        label: impl Into<String>,
        duration: Duration,
        cancellable: bool,
    ) -> Result<StartOutcome, ParamsError> {
        self.controller
            .start(ProgressParams::new(label, duration, cancellable))
    }

    /// End the bar. Idempotent: only the first call while running reports.
    pub fn finish(&self, completed: bool) -> Option<ProgressComplete> {
        self.controller.finish(completed)
    }

    /// Player-initiated cancel; ignored unless the bar is cancellable.
    pub fn cancel(&self) -> Option<ProgressComplete> {
        self.controller.finish_if(ProgressBar::cancellable, false)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.controller.is_active()
    }

    #[must_use]
    pub fn current_frame(&self) -> Option<ProgressFrame> {
        self.controller.current_frame()
    }

    #[must_use]
    pub fn status(&self) -> ControllerStatus {
        self.controller.status()
    }
}

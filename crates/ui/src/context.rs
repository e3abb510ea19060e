use std::sync::Arc;

use hud_core::Clock;
use services::{CommandError, HostNotifier, HudConfig, HudRouter};

use crate::state::{HudSnapshot, HudState};

/// The HUD as the application composes it: the view state plus the router
/// that drives it.
pub struct HudContext {
    state: Arc<HudState>,
    router: HudRouter,
}

impl HudContext {
    #[must_use]
    pub fn new(config: &HudConfig, clock: Clock, notifier: Arc<dyn HostNotifier>) -> Self {
        let state = Arc::new(HudState::new(config.currency.clone()));
        let router = HudRouter::new(config, clock, state.sinks(), notifier);
        Self { state, router }
    }

    /// Feed one inbound JSON message to the router. Must run inside a tokio
    /// runtime, since starting a session spawns its timer.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` when the message is rejected; the HUD is unchanged.
    pub fn dispatch(&mut self, raw: &str) -> Result<(), CommandError> {
        self.router.handle_json(raw)
    }

    #[must_use]
    pub fn state(&self) -> Arc<HudState> {
        Arc::clone(&self.state)
    }

    #[must_use]
    pub fn snapshot(&self) -> HudSnapshot {
        self.state.snapshot()
    }

    #[must_use]
    pub fn router(&self) -> &HudRouter {
        &self.router
    }
}

/// Build a `HudContext` for the application composition root.
#[must_use]
pub fn build_hud_context(
    config: &HudConfig,
    clock: Clock,
    notifier: Arc<dyn HostNotifier>,
) -> HudContext {
    HudContext::new(config, clock, notifier)
}

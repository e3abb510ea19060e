use std::sync::Arc;

use tracing::debug;

use hud_core::{
    Clock, FuelPump, ParamsError, PumpComplete, PumpFrame, PumpParams, StartOutcome,
};

use crate::config::ControllerSettings;
use crate::display::FrameSink;
use crate::notifier::HostNotifier;

use super::controller::{ControllerStatus, TimedController};

/// Simulates litres flowing at a fixed rate while the host pumps.
#[derive(Clone)]
pub struct FuelingSimulator {
    controller: TimedController<FuelPump>,
    fuel_rate: f64,
}

impl FuelingSimulator {
    #[must_use]
    pub fn new(
        fuel_rate: f64,
        settings: ControllerSettings,
        clock: Clock,
        sink: Arc<dyn FrameSink<FuelPump>>,
        notifier: Arc<dyn HostNotifier>,
    ) -> Self {
        Self {
            controller: TimedController::new("pump", settings, clock, sink, notifier),
            fuel_rate,
        }
    }

    /// Start pumping towards `target_litres`.
    ///
    /// # Errors
    ///
    /// Returns `ParamsError` for a non-positive target, price or fuel rate.
    pub fn start(
        &self,
        target_litres: f64,
        price_per_litre: f64,
        station_name: Option<String>,
    ) -> Result<StartOutcome, ParamsError> {
        debug!(target_litres, price_per_litre, "pump requested");
        self.controller.start(PumpParams {
            target_litres,
            price_per_litre,
            fuel_rate: self.fuel_rate,
            station_name,
        })
    }

    /// Stop pumping. Returns the report sent to the host, or `None` if the
    /// pump was not running.
    pub fn stop(&self, completed: bool) -> Option<PumpComplete> {
        self.controller.finish(completed)
    }

    #[must_use]
    pub fn is_pumping(&self) -> bool {
        self.controller.is_active()
    }

    #[must_use]
    pub fn current_frame(&self) -> Option<PumpFrame> {
        self.controller.current_frame()
    }

    #[must_use]
    pub fn status(&self) -> ControllerStatus {
        self.controller.status()
    }

    #[must_use]
    pub fn fuel_rate(&self) -> f64 {
        self.fuel_rate
    }
}

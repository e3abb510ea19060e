use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use hud_core::{Clock, FuelPump, ParamsError, ProgressBar, Station};

use crate::command::{HostCommand, Inbound, UiEvent, station_draft};
use crate::config::HudConfig;
use crate::display::{CardSink, FrameSink, InputCard};
use crate::error::CommandError;
use crate::notifier::{HostNotifier, Notification};
use crate::sessions::{FuelingSimulator, ProgressSimulator};

/// Display targets the router feeds.
#[derive(Clone)]
pub struct HudSinks {
    pub pump: Arc<dyn FrameSink<FuelPump>>,
    pub progress: Arc<dyn FrameSink<ProgressBar>>,
    pub cards: Arc<dyn CardSink>,
}

/// Routes inbound messages to the simulators and static cards.
///
/// Guard failures (already running, nothing to stop, not cancellable) are
/// silent. Bad parameters are logged and leave everything idle.
pub struct HudRouter {
    station: Station,
    fueling: FuelingSimulator,
    progress: ProgressSimulator,
    cards: Arc<dyn CardSink>,
    notifier: Arc<dyn HostNotifier>,
}

impl HudRouter {
    #[must_use]
    pub fn new(
        config: &HudConfig,
        clock: Clock,
        sinks: HudSinks,
        notifier: Arc<dyn HostNotifier>,
    ) -> Self {
        let fueling = FuelingSimulator::new(
            config.fuel_rate,
            config.pump,
            clock,
            sinks.pump,
            Arc::clone(&notifier),
        );
        let progress =
            ProgressSimulator::new(config.progress, clock, sinks.progress, Arc::clone(&notifier));

        Self {
            station: Station::new(config.litre_price, config.currency.clone(), config.max_litres),
            fueling,
            progress,
            cards: sinks.cards,
            notifier,
        }
    }

    #[must_use]
    pub fn fueling(&self) -> &FuelingSimulator {
        &self.fueling
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressSimulator {
        &self.progress
    }

    #[must_use]
    pub fn station(&self) -> &Station {
        &self.station
    }

    /// Decode and dispatch one JSON message.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` when the message cannot be decoded or its
    /// parameters are rejected. Nothing has changed in either case.
    pub fn handle_json(&mut self, raw: &str) -> Result<(), CommandError> {
        match Inbound::from_json(raw)? {
            Inbound::Host(command) => self.handle(command),
            Inbound::Ui(event) => {
                self.handle_ui(event);
                Ok(())
            }
        }
    }

    /// # Errors
    ///
    /// Returns `CommandError` when a start command carries unusable parameters.
    pub fn handle(&mut self, command: HostCommand) -> Result<(), CommandError> {
        match command {
            HostCommand::ShowInput {
                price,
                current_fuel,
                currency,
                station_name,
            } => {
                self.station
                    .reset_from(station_draft(price, current_fuel, currency, station_name));
                self.show_input();
            }
            HostCommand::ShowInputAgain {
                price,
                current_fuel,
                currency,
                station_name,
            } => {
                self.station
                    .update_from(station_draft(price, current_fuel, currency, station_name));
                self.show_input();
            }
            HostCommand::StartPump {
                target_litres,
                price_per_litre,
                station_name,
            } => self.start_pump(target_litres, price_per_litre, station_name)?,
            HostCommand::StopPump => {
                self.fueling.stop(false);
            }
            HostCommand::Hide => {
                if !self.fueling.is_pumping() {
                    self.cards.hide_all();
                }
            }
            HostCommand::ShowProgress {
                label,
                duration,
                can_cancel,
            } => {
                let duration = progress_duration(duration)
                    .inspect_err(|err| warn!(error = %err, "show-progress rejected"))?;
                self.progress
                    .start(label.unwrap_or_default(), duration, can_cancel)
                    .inspect_err(|err| warn!(error = %err, "show-progress rejected"))?;
            }
            HostCommand::HideProgress => {
                self.progress.finish(false);
            }
            HostCommand::Unknown => debug!("ignoring unhandled host action"),
        }
        Ok(())
    }

    pub fn handle_ui(&mut self, event: UiEvent) {
        match event {
            UiEvent::Escape => {
                if self.progress.is_running() {
                    self.progress.cancel();
                } else if !self.fueling.is_pumping() {
                    self.notifier.notify(Notification::Close);
                }
            }
            UiEvent::CancelProgress => {
                self.progress.cancel();
            }
            UiEvent::LitresInput { litres } => {
                let quote = self.station.order_form().litres_changed(litres);
                self.cards.update_quote(&quote);
            }
            UiEvent::PriceInput { price } => {
                let quote = self.station.order_form().price_changed(price);
                self.cards.update_quote(&quote);
            }
            UiEvent::SubmitOrder { litres, price } => {
                match self.station.order_form().submit(litres, price) {
                    Some(litres) => self.notifier.notify(Notification::StartFueling { litres }),
                    None => debug!(litres, price, "empty order ignored"),
                }
            }
        }
    }

    fn start_pump(
        &mut self,
        target_litres: Option<f64>,
        price_per_litre: Option<f64>,
        station_name: Option<String>,
    ) -> Result<(), CommandError> {
        let Some(target) = target_litres.filter(|t| t.is_finite() && *t > 0.0) else {
            warn!(?target_litres, "start-pump rejected");
            return Err(CommandError::MissingTarget);
        };
        let price = price_per_litre
            .filter(|p| p.is_finite() && *p > 0.0)
            .unwrap_or(self.station.litre_price());

        self.station.rename(station_name);
        self.fueling
            .start(target, price, Some(self.station.name().to_string()))
            .inspect_err(|err| warn!(error = %err, "start-pump rejected"))?;
        Ok(())
    }

    fn show_input(&self) {
        let form = self.station.order_form();
        self.cards.show_input(&InputCard {
            station_name: self.station.name().to_string(),
            currency: self.station.currency().to_string(),
            litre_price: self.station.litre_price(),
            current_fuel: self.station.current_fuel(),
            max_litres: self.station.max_litres(),
            limits: form.limits(),
        });
    }
}

/// Host durations are milliseconds and may arrive as floats. A missing value
/// reads as zero and is rejected when the bar starts.
fn progress_duration(millis: Option<f64>) -> Result<Duration, ParamsError> {
    let millis = millis.unwrap_or(0.0);
    if millis == 0.0 {
        return Ok(Duration::ZERO);
    }
    if !millis.is_finite() || millis < 0.0 {
        return Err(ParamsError::DurationMillis(millis));
    }
    Duration::try_from_secs_f64(millis / 1_000.0).map_err(|_| ParamsError::DurationMillis(millis))
}

//! Live HUD view state, fed by the controllers through the sink traits.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::trace;

use hud_core::{
    DEFAULT_STATION_NAME, FuelPump, OrderQuote, ProgressBar, ProgressComplete, ProgressFrame, PumpComplete,
    PumpFrame,
};
use services::{CardSink, FrameSink, HudSinks, InputCard};

use crate::vm::{
    InputCardVm, ProgressVm, PumpCardVm, apply_progress_frame, apply_pump_finished,
    apply_pump_frame, apply_quote, map_input_card, map_progress_started, map_pump_started,
};

/// Everything the HUD currently renders. A card that was never shown is
/// `None`; a hidden card keeps its last values with `visible == false`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HudSnapshot {
    pub input: Option<InputCardVm>,
    pub pump: Option<PumpCardVm>,
    pub progress: Option<ProgressVm>,
}

impl HudSnapshot {
    /// True when any card is on screen.
    #[must_use]
    pub fn body_visible(&self) -> bool {
        self.input.as_ref().is_some_and(|c| c.visible)
            || self.pump.as_ref().is_some_and(|c| c.visible)
            || self.progress.as_ref().is_some_and(|c| c.visible)
    }
}

#[derive(Debug)]
struct Inner {
    snapshot: HudSnapshot,
    station_name: String,
    currency: String,
    version: u64,
}

/// Shared view state. Clone the `Arc` into the router via [`HudState::sinks`].
#[derive(Debug)]
pub struct HudState {
    inner: Mutex<Inner>,
}

impl HudState {
    #[must_use]
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                snapshot: HudSnapshot::default(),
                station_name: DEFAULT_STATION_NAME.to_string(),
                currency: currency.into(),
                version: 0,
            }),
        }
    }

    /// Sink handles for [`services::HudRouter::new`].
    #[must_use]
    pub fn sinks(self: &Arc<Self>) -> HudSinks {
        HudSinks {
            pump: Arc::clone(self) as Arc<dyn FrameSink<FuelPump>>,
            progress: Arc::clone(self) as Arc<dyn FrameSink<ProgressBar>>,
            cards: Arc::clone(self) as Arc<dyn CardSink>,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> HudSnapshot {
        self.lock().snapshot.clone()
    }

    /// Bumped on every change; lets a renderer skip identical snapshots.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.lock().version
    }

    #[must_use]
    pub fn body_visible(&self) -> bool {
        self.lock().snapshot.body_visible()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, what: &'static str, apply: impl FnOnce(&mut Inner)) {
        let mut inner = self.lock();
        apply(&mut *inner);
        inner.version += 1;
        trace!(what, version = inner.version, "hud updated");
    }
}

fn hide<T>(card: &mut Option<T>, visible: impl FnOnce(&mut T) -> &mut bool) {
    if let Some(card) = card.as_mut() {
        *visible(card) = false;
    }
}

impl FrameSink<FuelPump> for HudState {
    fn started(&self, pump: &FuelPump) {
        self.update("pump started", |inner| {
            hide(&mut inner.snapshot.input, |c| &mut c.visible);
            let vm = map_pump_started(pump, &inner.station_name, &inner.currency);
            inner.snapshot.pump = Some(vm);
        });
    }

    fn frame(&self, frame: &PumpFrame) {
        self.update("pump frame", |inner| {
            if let Some(vm) = inner.snapshot.pump.as_mut() {
                apply_pump_frame(vm, frame, &inner.currency);
            }
        });
    }

    fn finished(&self, outcome: &PumpComplete) {
        self.update("pump finished", |inner| {
            if let Some(vm) = inner.snapshot.pump.as_mut() {
                apply_pump_finished(vm, outcome);
            }
        });
    }

    fn cleared(&self) {
        self.update("pump cleared", |inner| {
            hide(&mut inner.snapshot.pump, |c| &mut c.visible);
            hide(&mut inner.snapshot.input, |c| &mut c.visible);
        });
    }
}

impl FrameSink<ProgressBar> for HudState {
    fn started(&self, bar: &ProgressBar) {
        self.update("progress started", |inner| {
            inner.snapshot.progress = Some(map_progress_started(bar));
        });
    }

    fn frame(&self, frame: &ProgressFrame) {
        self.update("progress frame", |inner| {
            if let Some(vm) = inner.snapshot.progress.as_mut() {
                apply_progress_frame(vm, *frame);
            }
        });
    }

    fn finished(&self, _outcome: &ProgressComplete) {}

    fn cleared(&self) {
        self.update("progress cleared", |inner| {
            hide(&mut inner.snapshot.progress, |c| &mut c.visible);
        });
    }
}

impl CardSink for HudState {
    fn show_input(&self, card: &InputCard) {
        self.update("input shown", |inner| {
            inner.station_name.clone_from(&card.station_name);
            inner.currency.clone_from(&card.currency);
            hide(&mut inner.snapshot.pump, |c| &mut c.visible);
            inner.snapshot.input = Some(map_input_card(card));
        });
    }

    fn update_quote(&self, quote: &OrderQuote) {
        self.update("order edited", |inner| {
            if let Some(vm) = inner.snapshot.input.as_mut() {
                apply_quote(vm, quote);
            }
        });
    }

    fn hide_all(&self) {
        self.update("cards hidden", |inner| {
            hide(&mut inner.snapshot.input, |c| &mut c.visible);
            hide(&mut inner.snapshot.pump, |c| &mut c.visible);
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use hud_core::{InputLimits, ProgressCurve, ProgressParams, PumpParams};

    use super::*;

    fn input_card() -> InputCard {
        InputCard {
            station_name: "Route 68".into(),
            currency: "€".into(),
            litre_price: 2.0,
            current_fuel: 0.0,
            max_litres: 100.0,
            limits: InputLimits {
                max_litres: 100.0,
                litres_step: 1.0,
                max_price: 200.0,
                price_step: 2.0,
            },
        }
    }

    fn pump() -> FuelPump {
        FuelPump::begin(PumpParams {
            target_litres: 10.0,
            price_per_litre: 2.0,
            fuel_rate: 2.5,
            station_name: None,
        })
        .unwrap()
    }

    #[test]
    fn starts_hidden() {
        let state = HudState::new("$");

        assert!(!state.body_visible());
        assert_eq!(state.snapshot(), HudSnapshot::default());
    }

    #[test]
    fn pump_replaces_input_card_and_uses_its_currency() {
        let state = HudState::new("$");
        state.show_input(&input_card());
        FrameSink::<FuelPump>::started(&state, &pump());

        let snapshot = state.snapshot();
        let card = snapshot.pump.unwrap();
        assert!(!snapshot.input.unwrap().visible);
        assert!(card.visible);
        assert_eq!(card.station_name, "Route 68");
        assert_eq!(card.total, "€0.00");
    }

    #[test]
    fn pump_cleared_hides_everything_but_progress() {
        let state = HudState::new("$");
        let bar = ProgressBar::begin(ProgressParams::new("", Duration::from_secs(1), false)).unwrap();
        FrameSink::<ProgressBar>::started(&state, &bar);
        FrameSink::<FuelPump>::started(&state, &pump());

        FrameSink::<FuelPump>::cleared(&state);

        let snapshot = state.snapshot();
        assert!(!snapshot.pump.unwrap().visible);
        assert_eq!(snapshot.progress.as_ref().map(|p| p.label.as_str()), Some("Processing..."));
        assert!(state.body_visible());
    }

    #[test]
    fn input_card_replaces_pump_card() {
        let state = HudState::new("$");
        FrameSink::<FuelPump>::started(&state, &pump());

        state.show_input(&input_card());

        let snapshot = state.snapshot();
        assert!(snapshot.input.unwrap().visible);
        assert!(!snapshot.pump.unwrap().visible);
    }

    #[test]
    fn every_update_bumps_the_version() {
        let state = HudState::new("$");
        let before = state.version();

        state.show_input(&input_card());
        state.hide_all();

        assert_eq!(state.version(), before + 2);
        assert!(!state.body_visible());
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let state = HudState::new("$");
        state.show_input(&input_card());

        let json = serde_json::to_value(state.snapshot()).unwrap();

        assert_eq!(json["pump"], serde_json::Value::Null);
        assert_eq!(json["input"]["stationName"], "Route 68");
        assert_eq!(json["input"]["maxPrice"], 200.0);
    }
}

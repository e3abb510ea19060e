use serde::Serialize;

use hud_core::{FuelPump, ProgressCurve, PumpComplete, PumpFrame};

use super::format::{format_currency, format_number, format_percent, format_rate};

/// How the pump card reads once a session has ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PumpStatus {
    Pumping,
    Completed,
    Stopped,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PumpCardVm {
    pub station_name: String,
    pub litres: String,
    pub target_litres: String,
    pub price_per_litre: String,
    pub total: String,
    /// Fill bar width in percent.
    pub width: f64,
    pub percent_label: String,
    pub rate_label: String,
    pub status: PumpStatus,
    pub visible: bool,
}

/// Card for a pump that just became active.
#[must_use]
pub fn map_pump_started(pump: &FuelPump, station_name: &str, currency: &str) -> PumpCardVm {
    let mut vm = PumpCardVm {
        station_name: pump.station_name().unwrap_or(station_name).to_string(),
        litres: String::new(),
        target_litres: format_number(pump.target_litres(), 2),
        price_per_litre: format_currency(currency, pump.price_per_litre()),
        total: String::new(),
        width: 0.0,
        percent_label: String::new(),
        rate_label: format_rate(pump.fuel_rate()),
        status: PumpStatus::Pumping,
        visible: true,
    };
    apply_pump_frame(&mut vm, &pump.frame(), currency);
    vm
}

pub fn apply_pump_frame(vm: &mut PumpCardVm, frame: &PumpFrame, currency: &str) {
    vm.litres = format_number(frame.litres, 2);
    vm.total = format_currency(currency, frame.total_cost);
    vm.width = frame.percent;
    vm.percent_label = format_percent(frame.percent);
}

pub fn apply_pump_finished(vm: &mut PumpCardVm, outcome: &PumpComplete) {
    vm.status = if outcome.completed {
        PumpStatus::Completed
    } else {
        PumpStatus::Stopped
    };
}

#[cfg(test)]
mod tests {
    use hud_core::PumpParams;

    use super::*;

    fn pump() -> FuelPump {
        FuelPump::begin(PumpParams {
            target_litres: 40.0,
            price_per_litre: 2.0,
            fuel_rate: 2.5,
            station_name: None,
        })
        .unwrap()
    }

    #[test]
    fn started_card_is_empty_and_visible() {
        let vm = map_pump_started(&pump(), "Gas Station", "$");

        assert!(vm.visible);
        assert_eq!(vm.station_name, "Gas Station");
        assert_eq!(vm.litres, "0.00");
        assert_eq!(vm.total, "$0.00");
        assert_eq!(vm.price_per_litre, "$2.00");
        assert_eq!(vm.percent_label, "0%");
        assert_eq!(vm.rate_label, "2.5 L/s");
        assert_eq!(vm.status, PumpStatus::Pumping);
    }

    #[test]
    fn frame_updates_readouts() {
        let mut vm = map_pump_started(&pump(), "Gas Station", "€");
        let frame = PumpFrame {
            litres: 16.8,
            target_litres: 40.0,
            total_cost: 33.6,
            price_per_litre: 2.0,
            fuel_rate: 2.5,
            percent: 42.0,
        };

        apply_pump_frame(&mut vm, &frame, "€");
        apply_pump_finished(&mut vm, &PumpComplete { litres: 16.8, completed: false });

        assert_eq!(vm.litres, "16.80");
        assert_eq!(vm.total, "€33.60");
        assert_eq!(vm.percent_label, "42%");
        assert_eq!(vm.status, PumpStatus::Stopped);
    }
}

use serde::Serialize;

use hud_core::OrderQuote;
use services::InputCard;

use super::format::{format_currency, format_number};

/// The order card shown before a pump starts.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputCardVm {
    pub station_name: String,
    pub currency: String,
    pub litre_price: String,
    pub current_fuel: String,
    pub capacity: f64,
    pub max_litres: f64,
    pub litres_step: f64,
    pub max_price: f64,
    pub price_step: f64,
    /// Litres field, kept in sync with `price`.
    pub litres: f64,
    pub price: f64,
    /// Tank fill after the order, in percent.
    pub fill_percent: f64,
    pub visible: bool,
}

#[must_use]
pub fn map_input_card(card: &InputCard) -> InputCardVm {
    InputCardVm {
        station_name: card.station_name.clone(),
        currency: card.currency.clone(),
        litre_price: format_currency(&card.currency, card.litre_price),
        current_fuel: format_number(card.current_fuel, 1),
        capacity: card.limits.max_litres,
        max_litres: card.max_litres,
        litres_step: card.limits.litres_step,
        max_price: card.limits.max_price,
        price_step: card.limits.price_step,
        litres: 0.0,
        price: 0.0,
        fill_percent: fill_percent(card.current_fuel, card.max_litres),
        visible: true,
    }
}

pub fn apply_quote(vm: &mut InputCardVm, quote: &OrderQuote) {
    vm.litres = quote.litres;
    vm.price = quote.price;
    vm.fill_percent = quote.fill_percent;
}

fn fill_percent(current_fuel: f64, max_litres: f64) -> f64 {
    if max_litres > 0.0 {
        current_fuel / max_litres * 100.0
    } else {
        0.0
    }
}

use crate::error::positive;
use crate::model::OrderForm;

pub const DEFAULT_STATION_NAME: &str = "Gas Station";

/// Pricing and tank context for the station the player is standing at.
#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    name: String,
    litre_price: f64,
    currency: String,
    current_fuel: f64,
    max_litres: f64,
    default_price: f64,
}

/// Fields the host may send along with an input-card command.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StationDraft {
    pub price: Option<f64>,
    pub current_fuel: Option<f64>,
    pub currency: Option<String>,
    pub station_name: Option<String>,
}

impl StationDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Station {
    #[must_use]
    pub fn new(default_price: f64, currency: impl Into<String>, max_litres: f64) -> Self {
        let max_litres = positive(max_litres).unwrap_or(100.0);
        Self {
            name: DEFAULT_STATION_NAME.to_string(),
            litre_price: default_price,
            currency: currency.into(),
            current_fuel: 0.0,
            max_litres,
            default_price,
        }
    }

    /// Replace the pricing context. Missing or non-positive values fall back
    /// to the defaults rather than the previous station.
    pub fn reset_from(&mut self, draft: StationDraft) {
        self.litre_price = draft
            .price
            .and_then(positive)
            .unwrap_or(self.default_price);
        self.current_fuel = self.clamp_fuel(draft.current_fuel.unwrap_or(0.0));
        if let Some(currency) = normalize_optional(draft.currency) {
            self.currency = currency;
        }
        self.name = normalize_optional(draft.station_name)
            .unwrap_or_else(|| DEFAULT_STATION_NAME.to_string());
    }

    /// Merge a partial update, keeping previous values for absent fields.
    pub fn update_from(&mut self, draft: StationDraft) {
        if let Some(price) = draft.price.and_then(positive) {
            self.litre_price = price;
        }
        if let Some(fuel) = draft.current_fuel.and_then(positive) {
            self.current_fuel = self.clamp_fuel(fuel);
        }
        if let Some(currency) = normalize_optional(draft.currency) {
            self.currency = currency;
        }
        if let Some(name) = normalize_optional(draft.station_name) {
            self.name = name;
        }
    }

    pub fn rename(&mut self, name: Option<String>) {
        if let Some(name) = normalize_optional(name) {
            self.name = name;
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn litre_price(&self) -> f64 {
        self.litre_price
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    #[must_use]
    pub fn current_fuel(&self) -> f64 {
        self.current_fuel
    }

    #[must_use]
    pub fn max_litres(&self) -> f64 {
        self.max_litres
    }

    #[must_use]
    pub fn order_form(&self) -> OrderForm {
        OrderForm::new(self.litre_price, self.current_fuel, self.max_litres)
    }

    fn clamp_fuel(&self, fuel: f64) -> f64 {
        if fuel.is_finite() {
            fuel.clamp(0.0, self.max_litres)
        } else {
            0.0
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

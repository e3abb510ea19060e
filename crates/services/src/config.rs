use std::env;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "https://sg-fuel";

/// Tick and hold timings for one timed controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControllerSettings {
    pub tick: Duration,
    /// Display hold after natural completion.
    pub hold_completed: Duration,
    /// Display hold after a stop or cancel.
    pub hold_stopped: Duration,
}

impl ControllerSettings {
    #[must_use]
    pub fn pump() -> Self {
        Self {
            tick: Duration::from_millis(100),
            hold_completed: Duration::from_millis(1_600),
            hold_stopped: Duration::from_millis(400),
        }
    }

    /// The progress bar hides as soon as it finishes.
    #[must_use]
    pub fn progress() -> Self {
        Self {
            tick: Duration::from_millis(50),
            hold_completed: Duration::ZERO,
            hold_stopped: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn hold_for(&self, completed: bool) -> Duration {
        if completed {
            self.hold_completed
        } else {
            self.hold_stopped
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HudConfig {
    /// Base URL the host listens on for notifications.
    pub endpoint: String,
    /// Litres per second.
    pub fuel_rate: f64,
    pub pump: ControllerSettings,
    pub progress: ControllerSettings,
    pub litre_price: f64,
    pub currency: String,
    pub max_litres: f64,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            fuel_rate: 2.5,
            pump: ControllerSettings::pump(),
            progress: ControllerSettings::progress(),
            litre_price: 5.0,
            currency: "$".into(),
            max_litres: 100.0,
        }
    }
}

impl HudConfig {
    /// Read overrides from `HUD_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but cannot be used.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`HudConfig::from_env`] but reading from any key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a value is present but cannot be used.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = non_empty(lookup("HUD_ENDPOINT")) {
            Url::parse(&raw)?;
            config.endpoint = raw;
        }
        if let Some(rate) = parse::<f64>(&lookup, "HUD_FUEL_RATE")? {
            config.fuel_rate = require_positive("HUD_FUEL_RATE", rate)?;
        }
        if let Some(price) = parse::<f64>(&lookup, "HUD_LITRE_PRICE")? {
            config.litre_price = require_positive("HUD_LITRE_PRICE", price)?;
        }
        if let Some(max) = parse::<f64>(&lookup, "HUD_MAX_LITRES")? {
            config.max_litres = require_positive("HUD_MAX_LITRES", max)?;
        }
        if let Some(currency) = non_empty(lookup("HUD_CURRENCY")) {
            config.currency = currency;
        }

        if let Some(tick) = parse_millis(&lookup, "HUD_PUMP_TICK_MS")? {
            config.pump.tick = require_tick("HUD_PUMP_TICK_MS", tick)?;
        }
        if let Some(tick) = parse_millis(&lookup, "HUD_PROGRESS_TICK_MS")? {
            config.progress.tick = require_tick("HUD_PROGRESS_TICK_MS", tick)?;
        }
        if let Some(hold) = parse_millis(&lookup, "HUD_PUMP_HOLD_COMPLETED_MS")? {
            config.pump.hold_completed = hold;
        }
        if let Some(hold) = parse_millis(&lookup, "HUD_PUMP_HOLD_STOPPED_MS")? {
            config.pump.hold_stopped = hold;
        }

        Ok(config)
    }

    /// Override the fuel rate, rejecting non-positive values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a rate that is not a positive number.
    pub fn with_fuel_rate(mut self, rate: f64) -> Result<Self, ConfigError> {
        self.fuel_rate = require_positive("fuel rate", rate)?;
        Ok(self)
    }

    /// Override the notification endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Endpoint` when `endpoint` is not an absolute URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Result<Self, ConfigError> {
        let endpoint = endpoint.into();
        Url::parse(&endpoint)?;
        self.endpoint = endpoint;
        Ok(self)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = non_empty(lookup(key)) else {
        return Ok(None);
    };
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::Invalid { key, raw })
}

fn parse_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    Ok(parse::<u64>(lookup, key)?.map(Duration::from_millis))
}

fn require_positive(key: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            raw: value.to_string(),
        })
    }
}

fn require_tick(key: &'static str, tick: Duration) -> Result<Duration, ConfigError> {
    if tick.is_zero() {
        return Err(ConfigError::Invalid {
            key,
            raw: "0".into(),
        });
    }
    Ok(tick)
}

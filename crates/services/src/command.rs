//! Inbound messages: commands from the host and events from the player.

use serde::Deserialize;
use serde_json::Value;

use hud_core::StationDraft;

use crate::error::CommandError;

/// A command posted by the host. `action` selects the variant.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum HostCommand {
    ShowInput {
        price: Option<f64>,
        current_fuel: Option<f64>,
        currency: Option<String>,
        station_name: Option<String>,
    },
    ShowInputAgain {
        price: Option<f64>,
        current_fuel: Option<f64>,
        currency: Option<String>,
        station_name: Option<String>,
    },
    StartPump {
        target_litres: Option<f64>,
        price_per_litre: Option<f64>,
        station_name: Option<String>,
    },
    StopPump,
    Hide,
    ShowProgress {
        label: Option<String>,
        /// Milliseconds. Hosts may send whole numbers as floats.
        duration: Option<f64>,
        #[serde(default)]
        can_cancel: bool,
    },
    HideProgress,
    /// Any action this HUD does not handle.
    #[serde(other)]
    Unknown,
}

/// Input from the player inside the HUD. `event` selects the variant.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum UiEvent {
    Escape,
    CancelProgress,
    SubmitOrder { litres: f64, price: f64 },
    /// The litres field of the order card changed.
    LitresInput { litres: f64 },
    /// The price field of the order card changed.
    PriceInput { price: f64 },
}

/// Either kind of inbound message.
#[derive(Clone, Debug, PartialEq)]
pub enum Inbound {
    Host(HostCommand),
    Ui(UiEvent),
}

impl Inbound {
    /// Decode one JSON message.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Decode` when the message is not JSON or its
    /// fields do not fit the selected variant, and `CommandError::Untagged`
    /// when it carries neither `action` nor `event`.
    pub fn from_json(raw: &str) -> Result<Self, CommandError> {
        let value: Value = serde_json::from_str(raw)?;
        if value.get("action").is_some() {
            Ok(Inbound::Host(serde_json::from_value(value)?))
        } else if value.get("event").is_some() {
            Ok(Inbound::Ui(serde_json::from_value(value)?))
        } else {
            Err(CommandError::Untagged)
        }
    }
}

pub(crate) fn station_draft(
    price: Option<f64>,
    current_fuel: Option<f64>,
    currency: Option<String>,
    station_name: Option<String>,
) -> StationDraft {
    StationDraft {
        price,
        current_fuel,
        currency,
        station_name,
    }
}

mod ids;
mod order;
mod progress_bar;
mod pump;
mod station;

pub use ids::SessionId;

pub use order::{InputLimits, OrderForm, OrderQuote};
pub use progress_bar::{DEFAULT_PROGRESS_LABEL, ProgressBar, ProgressComplete, ProgressFrame, ProgressParams};
pub use pump::{FuelPump, PumpComplete, PumpFrame, PumpParams};
pub use station::{DEFAULT_STATION_NAME, Station, StationDraft};

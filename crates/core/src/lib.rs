#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod time;
pub mod timed;

pub use error::ParamsError;
pub use model::{
    DEFAULT_PROGRESS_LABEL, DEFAULT_STATION_NAME, FuelPump, InputLimits, OrderForm, OrderQuote,
    ProgressBar, ProgressComplete, ProgressFrame, ProgressParams, PumpComplete, PumpFrame,
    PumpParams, SessionId, Station, StationDraft,
};
pub use time::Clock;
pub use timed::{ProgressCurve, SessionPhase, StartOutcome, TickSample, TimedSession};

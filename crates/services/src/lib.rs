#![forbid(unsafe_code)]

pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod notifier;
pub mod router;
pub mod sessions;

pub use hud_core::Clock;

pub use command::{HostCommand, Inbound, UiEvent};
pub use config::{ControllerSettings, HudConfig};
pub use display::{CardSink, FrameSink, InputCard, RecordingSink, SinkEvent};
pub use error::{CommandError, ConfigError, NotifyError};
pub use notifier::{HostNotifier, HttpNotifier, LogNotifier, Notification, RecordingNotifier};
pub use router::{HudRouter, HudSinks};
pub use sessions::{ControllerStatus, FuelingSimulator, ProgressSimulator, TimedController};

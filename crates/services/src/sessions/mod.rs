mod controller;
mod fueling;
mod progress;
mod schedule;

pub use controller::{ControllerStatus, TimedController};
pub use fueling::FuelingSimulator;
pub use progress::ProgressSimulator;
pub use schedule::{TickHandle, TickSchedule, spawn_delayed, spawn_repeating};

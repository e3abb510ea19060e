mod format;
mod input_vm;
mod progress_vm;
mod pump_vm;

pub use format::{format_currency, format_number, format_percent, format_rate};
pub use input_vm::{InputCardVm, apply_quote, map_input_card};
pub use progress_vm::{ProgressVm, apply_progress_frame, map_progress_started};
pub use pump_vm::{PumpCardVm, PumpStatus, apply_pump_finished, apply_pump_frame, map_pump_started};

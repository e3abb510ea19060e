#![forbid(unsafe_code)]

pub mod context;
pub mod state;
pub mod vm;

pub use context::{HudContext, build_hud_context};
pub use state::{HudSnapshot, HudState};

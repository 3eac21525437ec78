//! UI helpers for consistent CLI output
//!
//! Spinners and status lines are written to stderr and degrade to plain
//! text (or nothing) in CI and when stderr is not a terminal.

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{error, key_value, step_ok, step_warn_hint};
pub use progress::TaskSpinner;

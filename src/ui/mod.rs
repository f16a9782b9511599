//! Terminal output for the `ssi` CLI
//!
//! Uses `cliclack` framing and an `indicatif` progress bar on a terminal,
//! with automatic fallback to plain `[OK]`/`[WARN]` lines in CI and when
//! output is piped.

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{
    intro, key_value, outro_success, outro_warn, step_info, step_ok, step_ok_detail,
    step_warn_hint,
};
pub use progress::BuildProgress;
pub use prompts::confirm;

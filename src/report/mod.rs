//! Text reporting for the non-interactive subcommands.
//!
//! Formatting lives here so output changes stay localized and the TUI can
//! reuse the same card values.

pub mod format;

pub use format::*;

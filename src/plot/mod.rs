//! Terminal plotting for the non-interactive `show` command.

pub mod ascii;

pub use ascii::*;

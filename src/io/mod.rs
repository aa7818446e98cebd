//! Input/output helpers.
//!
//! - merged series CSV and chart spec JSON exports (`export`)

pub mod export;

pub use export::*;

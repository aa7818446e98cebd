//! `forecast-dash` library crate.
//!
//! The binary (`fdash`) is a thin wrapper around this library so that:
//!
//! - the merge and view logic is testable without spawning processes
//! - the client and merger are reusable outside the terminal UI

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod merge;
pub mod plot;
pub mod report;
pub mod tui;
pub mod view;

//! Backend access.

pub mod api;

pub use api::{ApiClient, FetchOutcome, spawn_fetch};

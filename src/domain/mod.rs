//! Domain types shared by the client, the merger and the front-ends.
//!
//! This module defines:
//!
//! - the backend response shape (`DashboardSnapshot` and its parts)
//! - the merged dual-series representation (`MergedSeries`)
//! - the chart description handed to renderers (`ChartSpec`)

pub mod types;

pub use types::*;

//! Mapsense engine library.
//!
//! Event-driven core that keeps a host mapping platform's POIs, a live
//! pub/sub telemetry stream, and the overlay widgets (chart, configuration
//! panel, alert dashboard) consistent with each other. All I/O flows
//! through the port traits in [`app::ports`], so the whole engine runs
//! against mock adapters in tests and against the in-memory simulator in
//! `mapsense-sim`.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod custom_data;
pub mod history;
pub mod hooks;
pub mod poi;
pub mod scheduler;
pub mod sensor;
pub mod taxonomy;
pub mod toggle;
pub mod widgets;

mod error;

pub mod adapters;

pub use error::{Error, Result};

//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements        | Connects to                  |
//! |-----------------|-------------------|------------------------------|
//! | `http_backend`  | BackendPort       | Historical-data HTTP backend |
//! | `log_reporter`  | FailureReporter   | `log` output                 |
//! | `sim_host`      | PoiRepository     | In-memory POI store          |
//! |                 | ViewPort          | Simulated camera/highlights  |
//! | `sim_transport` | TelemetryTransport| Loopback pub/sub broker      |
//! | `sim_backend`   | BackendPort       | Canned historical data       |
//!
//! The `sim_*` adapters back the `mapsense-sim` binary and double as a
//! scriptable stand-in wherever a real viewer platform is unavailable.

pub mod http_backend;
pub mod log_reporter;
pub mod sim_backend;
pub mod sim_host;
pub mod sim_transport;

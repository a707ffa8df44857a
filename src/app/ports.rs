//! Port traits — the hexagonal boundary between the engine core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ OverlayApp (domain)
//! ```
//!
//! Driven adapters (the host platform binding, the pub/sub client, the
//! backend HTTP client, failure sinks) implement these traits. The
//! [`OverlayApp`](super::service::OverlayApp) consumes them via generics
//! threaded through every handler signature, so the core never holds an
//! ambient reference to the outside world.

use crate::error::Error;
use crate::poi::{Poi, PoiFilter, PoiId, PoiType, Point3};
use crate::sensor::{SensorId, SensorReading};

// ───────────────────────────────────────────────────────────────
// POI repository port (driven adapter: host persistence → domain)
// ───────────────────────────────────────────────────────────────

/// CRUD and spatial-filter access to the host's POI store.
///
/// The host owns identity: `save` returns the saved object, which may
/// differ from what was sent (server-side normalisation).
pub trait PoiRepository {
    /// All POIs passing the spatial filter.
    fn filter(&mut self, filter: &PoiFilter) -> Result<Vec<Poi>, HostError>;

    /// Fetch one POI by id.
    fn find_one(&mut self, id: PoiId) -> Result<Poi, HostError>;

    /// Persist one POI.
    fn save(&mut self, poi: &Poi) -> Result<Poi, HostError>;

    /// Persist a batch of POIs in one call.
    fn save_many(&mut self, pois: &[Poi]) -> Result<Vec<Poi>, HostError>;

    /// The host's full POI type list.
    fn find_all_types(&mut self) -> Result<Vec<PoiType>, HostError>;

    /// Names of all POI type groups.
    fn find_all_type_groups(&mut self) -> Result<Vec<String>, HostError>;

    /// Create an empty type group.
    fn create_type_group(&mut self, name: &str) -> Result<(), HostError>;

    /// Create POI types under an existing group.
    fn create_types(&mut self, group: &str, titles: &[&str]) -> Result<(), HostError>;
}

// ───────────────────────────────────────────────────────────────
// View port (driven adapter: domain → camera / highlight / navigation)
// ───────────────────────────────────────────────────────────────

/// Camera access and per-POI presentation operations on the host view.
pub trait ViewPort {
    /// Camera position in local view coordinates.
    fn camera_position(&self) -> Point3;

    /// Host transform service: local view space → global space.
    fn local_to_global(&self, point: Point3) -> Point3;

    fn highlight(&mut self, ids: &[PoiId]);

    fn unhighlight(&mut self, ids: &[PoiId]);

    /// Fly the camera to a POI.
    fn navigate_to(&mut self, id: PoiId) -> Result<(), HostError>;

    /// Ask the host to re-render POIs after a type or title change.
    fn refresh_pois(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Telemetry transport port (driven adapter: pub/sub broker ↔ domain)
// ───────────────────────────────────────────────────────────────

/// The pub/sub channel carrying live readings. Topic naming convention:
/// `"{prefix}/{sensorTypeTopic}/{sensorId}"`.
pub trait TelemetryTransport {
    /// Subscribe to a batch of topics.
    fn subscribe(&mut self, topics: &[String]) -> Result<(), TransportError>;

    /// Unsubscribe from a batch of topics.
    fn unsubscribe(&mut self, topics: &[String]) -> Result<(), TransportError>;

    /// Next pending inbound message, if any (non-blocking).
    fn poll(&mut self) -> Option<(String, Vec<u8>)>;
}

// ───────────────────────────────────────────────────────────────
// Backend port (driven adapter: HTTP backend → domain)
// ───────────────────────────────────────────────────────────────

/// Read-only queries against the historical-data backend.
pub trait BackendPort {
    /// Historical readings for one sensor on one topic.
    fn fetch_historical(
        &mut self,
        topic: &str,
        sensor_id: SensorId,
    ) -> Result<Vec<SensorReading>, BackendError>;

    /// Ids of all sensors publishing to a topic.
    fn fetch_sensor_ids(&mut self, topic: &str) -> Result<Vec<SensorId>, BackendError>;
}

// ───────────────────────────────────────────────────────────────
// Failure reporter port (driven adapter: domain → failure sink)
// ───────────────────────────────────────────────────────────────

/// Where fire-and-forget failures surface.
///
/// The engine never blocks user interaction on persistence or network
/// calls; failures are handed to this port and the handler moves on.
/// Adapters decide what a failure becomes — a log line, a toast, a metric.
pub trait FailureReporter {
    fn failure(&mut self, context: &str, error: &Error);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the event system)
// ───────────────────────────────────────────────────────────────

/// Callback trait the scheduler invokes when a schedule fires.
///
/// The main loop implements this by pushing a
/// [`HostEvent`](super::events::HostEvent) into the queue, but the
/// scheduler itself knows nothing about events or queues.
pub trait ScheduleDelegate {
    /// Called when a schedule fires.
    ///
    /// * `label` — the schedule's label.
    /// * `kind`  — whether it was a periodic or one-shot fire.
    /// * `token` — opaque payload attached at registration (e.g. a POI id).
    fn on_schedule_fired(&mut self, label: &str, kind: ScheduleFiredKind, token: u64);
}

/// Discriminant passed to [`ScheduleDelegate::on_schedule_fired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleFiredKind {
    /// A recurring periodic schedule fired.
    Periodic,
    /// A one-shot schedule fired (auto-disables after).
    OneShot,
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from host platform calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    /// The requested entity does not exist.
    NotFound,
    /// The host rejected the operation.
    Rejected,
    /// The host could not be reached.
    Unavailable,
}

/// Errors from pub/sub transport operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Not connected to the broker.
    Disconnected,
    /// The broker refused a subscription change.
    SubscribeFailed,
}

/// Errors from backend HTTP queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendError {
    /// Network-level failure, no response.
    Network,
    /// Application-level error status.
    Status(u16),
    /// Response body did not decode as the expected JSON shape.
    Decode,
}

impl core::fmt::Display for HostError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Rejected => write!(f, "rejected"),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::SubscribeFailed => write!(f, "subscribe failed"),
        }
    }
}

impl core::fmt::Display for BackendError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Network => write!(f, "network error"),
            Self::Status(code) => write!(f, "HTTP status {code}"),
            Self::Decode => write!(f, "undecodable response"),
        }
    }
}

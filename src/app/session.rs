//! Open-POI dialog session.
//!
//! State machine for the POI details dialog:
//!
//! ```text
//!          open(non-sensor)                  open(sensor, settled)
//!   Closed ────────────────▶ OpenNonsensor       │
//!     ▲  ▲                        │              ▼
//!     │  └────────────────────────┘         OpenSensor { poi, group,
//!     │            close                         threshold, sensor id }
//!     └──────────────────────────────────────────┘
//!                       close
//! ```
//!
//! Only `OpenSensor` carries session fields; threshold and sensor-id edits
//! are rejected in any other state (a stale widget event after the dialog
//! closed must not resurrect the session).

use crate::poi::PoiId;
use crate::sensor::SensorId;

/// Dialog lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    OpenNonsensor,
    OpenSensor,
}

/// The session owned by the coordinator while a dialog is up.
#[derive(Debug, Default)]
pub struct DialogSession {
    state: Option<SensorSession>,
    nonsensor_open: bool,
}

/// Fields that exist only while a sensor POI's dialog is open.
#[derive(Debug, Clone, PartialEq)]
struct SensorSession {
    poi_id: PoiId,
    group: String,
    threshold: f64,
    sensor_id: SensorId,
}

impl DialogSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DialogState {
        match (&self.state, self.nonsensor_open) {
            (Some(_), _) => DialogState::OpenSensor,
            (None, true) => DialogState::OpenNonsensor,
            (None, false) => DialogState::Closed,
        }
    }

    /// A non-sensor dialog opened; no session fields exist.
    pub fn open_nonsensor(&mut self) {
        self.state = None;
        self.nonsensor_open = true;
    }

    /// A sensor dialog settled and its fields were derived.
    pub fn open_sensor(&mut self, poi_id: PoiId, group: &str, threshold: f64, sensor_id: SensorId) {
        self.nonsensor_open = false;
        self.state = Some(SensorSession {
            poi_id,
            group: group.to_string(),
            threshold,
            sensor_id,
        });
    }

    /// The dialog closed; all session fields are destroyed.
    pub fn close(&mut self) {
        self.state = None;
        self.nonsensor_open = false;
    }

    /// Whether `poi_id` is the currently open sensor POI.
    pub fn is_open_poi(&self, poi_id: PoiId) -> bool {
        self.state.as_ref().is_some_and(|s| s.poi_id == poi_id)
    }

    pub fn poi_id(&self) -> Option<PoiId> {
        self.state.as_ref().map(|s| s.poi_id)
    }

    pub fn group(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.group.as_str())
    }

    pub fn threshold(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.threshold)
    }

    pub fn sensor_id(&self) -> Option<SensorId> {
        self.state.as_ref().map(|s| s.sensor_id)
    }

    /// Apply a threshold edit. No-op unless a sensor dialog is open.
    pub fn set_threshold(&mut self, threshold: f64) -> bool {
        match &mut self.state {
            Some(s) => {
                s.threshold = threshold;
                true
            }
            None => false,
        }
    }

    /// Apply a sensor-id edit, returning the previous id.
    /// No-op unless a sensor dialog is open.
    pub fn set_sensor_id(&mut self, sensor_id: SensorId) -> Option<SensorId> {
        match &mut self.state {
            Some(s) => {
                let old = s.sensor_id;
                s.sensor_id = sensor_id;
                Some(old)
            }
            None => None,
        }
    }
}

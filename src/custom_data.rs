//! Persisted POI custom data.
//!
//! Sensor POIs carry their sensor binding as a JSON blob in the host's
//! free-text custom-data field: `{"sensorId": 7, "threshold": 55.0,
//! "value": 40.0}`. Parsing and encoding are centralized here — nothing
//! else in the engine touches the raw text. The record is tolerant of
//! missing fields so blobs written by older revisions keep parsing.

use serde::{Deserialize, Serialize};

use crate::error::CustomDataError;

/// Typed form of the custom-data blob.
///
/// - `sensor_id == 0` means "unassigned" — the POI is tracked but no topic
///   is derived for it.
/// - `threshold == None` means "use the sensor class default".
/// - `value` is the last observed reading, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoiCustomData {
    pub sensor_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl PoiCustomData {
    /// Parse a blob. Any shape mismatch collapses into
    /// [`CustomDataError::Malformed`]; the caller decides whether that
    /// skips one POI or replaces the blob with defaults.
    pub fn parse(blob: &str) -> Result<Self, CustomDataError> {
        serde_json::from_str(blob).map_err(|_| CustomDataError::Malformed)
    }

    /// Encode back to the persisted JSON form.
    pub fn encode(&self) -> String {
        // Plain numeric fields — serialisation cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Whether a sensor is assigned.
    pub fn has_sensor(&self) -> bool {
        self.sensor_id != 0
    }

    /// Effective threshold given the sensor class default.
    pub fn threshold_or(&self, default: f64) -> f64 {
        self.threshold.unwrap_or(default)
    }

    /// Whether the last reading crossed the stored threshold.
    ///
    /// POIs with no reading yet, or no stored threshold, never alert.
    pub fn on_alert(&self) -> bool {
        matches!((self.value, self.threshold), (Some(v), Some(t)) if v > t)
    }
}

//! Engine configuration
//!
//! All tunable parameters for the overlay engine, including the sensor-type
//! table that drives POI classification, topic derivation, and alert
//! thresholds. Values can be overridden via a JSON config file passed to
//! the simulator binary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Alert state of a sensor POI type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorState {
    Alert,
    Normal,
}

/// One POI type under a sensor group, tagged with the alert state it
/// represents on the host platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorStateType {
    pub title: String,
    pub state: SensorState,
}

/// Everything needed to describe one physical sensor class.
///
/// Invariant: `group` must equal the host POI-type-group name the class is
/// attached to — the table key and this field are validated to match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorType {
    pub group: String,
    /// Default alert threshold, used whenever a POI carries none of its own.
    pub threshold: f64,
    pub types: Vec<SensorStateType>,
    /// Display domain for the trend chart, `[min, max]`.
    pub range: [f64; 2],
    /// Topic segment on the pub/sub transport.
    pub topic: String,
    pub unit: String,
}

impl SensorType {
    /// Title of the type representing `state`, if configured.
    pub fn title_for(&self, state: SensorState) -> Option<&str> {
        self.types
            .iter()
            .find(|t| t.state == state)
            .map(|t| t.title.as_str())
    }
}

/// Maps host POI group names to sensor type descriptions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorTypeTable(pub BTreeMap<String, SensorType>);

impl SensorTypeTable {
    /// Whether the given POI group supports attaching sensors.
    pub fn is_sensor(&self, group: &str) -> bool {
        self.0.contains_key(group)
    }

    pub fn get(&self, group: &str) -> Option<&SensorType> {
        self.0.get(group)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SensorType)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Core engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // --- External endpoints ---
    /// Backend serving historical readings and sensor id lists.
    pub server_url: String,
    /// Pub/sub broker address (adapter concern; recorded here for wiring).
    pub broker_url: String,

    // --- Topics ---
    /// Leading segment of every telemetry topic.
    pub topic_prefix: String,

    // --- Locale ---
    /// Locale key used when resolving host taxonomy names.
    pub locale: String,

    // --- Nearby classification ---
    /// Distance (metres, global space) for a POI to count as nearby.
    pub distance_threshold: f64,

    // --- Timing ---
    /// Event loop tick interval (milliseconds).
    pub tick_ms: u32,
    /// Alert dashboard refresh interval (milliseconds).
    pub dashboard_refresh_ms: u32,
    /// Delay before a freshly opened POI dialog is ready to populate.
    pub dialog_settle_ms: u32,

    // --- Sensor classes ---
    pub sensor_types: SensorTypeTable,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut types = BTreeMap::new();
        types.insert(
            "Temperature".to_string(),
            SensorType {
                group: "Temperature".to_string(),
                threshold: 55.0,
                types: vec![
                    SensorStateType {
                        title: "Temperature Alert".to_string(),
                        state: SensorState::Alert,
                    },
                    SensorStateType {
                        title: "Temperature Normal".to_string(),
                        state: SensorState::Normal,
                    },
                ],
                range: [10.0, 100.0],
                topic: "temperature".to_string(),
                unit: "\u{00b0}C".to_string(),
            },
        );
        types.insert(
            "Pressure".to_string(),
            SensorType {
                group: "Pressure".to_string(),
                threshold: 2.0,
                types: vec![
                    SensorStateType {
                        title: "Pressure Alert".to_string(),
                        state: SensorState::Alert,
                    },
                    SensorStateType {
                        title: "Pressure Normal".to_string(),
                        state: SensorState::Normal,
                    },
                ],
                range: [0.5, 10.0],
                topic: "pressure".to_string(),
                unit: "atm".to_string(),
            },
        );

        Self {
            server_url: String::new(),
            broker_url: String::new(),
            topic_prefix: "iot".to_string(),
            locale: "en".to_string(),
            distance_threshold: 10.0,
            tick_ms: 50,
            dashboard_refresh_ms: 500,
            dialog_settle_ms: 50,
            sensor_types: SensorTypeTable(types),
        }
    }
}

impl AppConfig {
    /// Validate invariants that the rest of the engine relies on.
    ///
    /// Rejects invalid values rather than silently clamping them, so a bad
    /// config file cannot install a sensor class the toggle index and topic
    /// derivation would disagree about.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.tick_ms == 0 || self.dashboard_refresh_ms == 0 {
            return Err("intervals must be non-zero");
        }
        if self.distance_threshold <= 0.0 {
            return Err("distance threshold must be positive");
        }
        for (group, sensor) in self.sensor_types.iter() {
            if *group != sensor.group {
                return Err("sensor table key must equal its group name");
            }
            if sensor.range[0] >= sensor.range[1] {
                return Err("sensor display range must be ordered");
            }
            if sensor.topic.is_empty() {
                return Err("sensor topic segment must not be empty");
            }
            if sensor.title_for(SensorState::Alert).is_none()
                || sensor.title_for(SensorState::Normal).is_none()
            {
                return Err("sensor class needs both an alert and a normal type");
            }
        }
        Ok(())
    }
}

//! Canned-data backend adapter.
//!
//! Implements [`BackendPort`] from in-memory fixtures so the simulator
//! (and tests) can exercise the dialog-population flow without a live
//! backend.

use std::collections::HashMap;

use crate::app::ports::{BackendError, BackendPort};
use crate::sensor::{SensorId, SensorReading};

/// In-memory backend stand-in. Keyed by topic segment.
#[derive(Default)]
pub struct SimBackend {
    sensor_ids: HashMap<String, Vec<SensorId>>,
    historical: HashMap<(String, SensorId), Vec<SensorReading>>,
}

impl SimBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the sensor ids known for a topic.
    pub fn set_sensor_ids(&mut self, topic: &str, ids: &[SensorId]) {
        self.sensor_ids.insert(topic.to_string(), ids.to_vec());
    }

    /// Register canned historical readings for one sensor on one topic.
    pub fn set_historical(&mut self, topic: &str, sensor_id: SensorId, readings: Vec<SensorReading>) {
        self.historical.insert((topic.to_string(), sensor_id), readings);
    }
}

impl BackendPort for SimBackend {
    fn fetch_historical(
        &mut self,
        topic: &str,
        sensor_id: SensorId,
    ) -> Result<Vec<SensorReading>, BackendError> {
        self.historical
            .get(&(topic.to_string(), sensor_id))
            .cloned()
            .ok_or(BackendError::Status(404))
    }

    fn fetch_sensor_ids(&mut self, topic: &str) -> Result<Vec<SensorId>, BackendError> {
        self.sensor_ids
            .get(topic)
            .cloned()
            .ok_or(BackendError::Status(404))
    }
}

//! Telemetry data shapes and conversions.
//!
//! Readings arrive in wire form — from the pub/sub transport one at a time
//! or from the backend as a historical batch — and are converted to the
//! display-friendly sample form that feeds the history buffer and chart.

use chrono::{DateTime, TimeZone, Utc};
use log::warn;

use crate::error::CustomDataError;

pub type SensorId = u64;

/// Wire-format reading: `{"id": 7, "value": 61.2, "timestamp": "..."}`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SensorReading {
    pub id: SensorId,
    pub value: f64,
    pub timestamp: String,
}

/// Display form of one reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    pub value: f64,
    pub date: DateTime<Utc>,
}

impl From<&SensorReading> for SensorSample {
    fn from(reading: &SensorReading) -> Self {
        Self {
            value: reading.value,
            date: parse_timestamp(&reading.timestamp),
        }
    }
}

/// Parse one transport payload as a reading.
pub fn parse_reading(payload: &[u8]) -> Result<SensorReading, CustomDataError> {
    serde_json::from_slice(payload).map_err(|_| CustomDataError::Malformed)
}

/// Convert wire readings to samples, preserving order and count.
///
/// Timestamps are RFC 3339. An unparseable timestamp keeps the element
/// (pinned to the epoch) so batch shape is never silently altered.
pub fn format_readings(readings: &[SensorReading]) -> Vec<SensorSample> {
    readings.iter().map(SensorSample::from).collect()
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(_) => {
            warn!("unparseable telemetry timestamp: {raw:?}");
            Utc.timestamp_opt(0, 0).single().unwrap_or_default()
        }
    }
}

/// Derive the transport topic for one (sensor class, sensor id) pair.
pub fn topic_for(prefix: &str, type_topic: &str, sensor_id: SensorId) -> String {
    format!("{prefix}/{type_topic}/{sensor_id}")
}

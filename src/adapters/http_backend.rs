//! HTTP backend adapter.
//!
//! Implements [`BackendPort`] against the historical-data backend:
//!
//! - `GET {server_url}/{topic}?id={sensorId}` → historical readings
//! - `GET {server_url}/{topic}`               → known sensor ids
//!
//! Both endpoints speak plain JSON, no auth. Failures map onto the typed
//! [`BackendError`] kinds; response detail is logged here at the source.

use std::time::Duration;

use log::warn;
use reqwest::blocking::Client;

use crate::app::ports::{BackendError, BackendPort};
use crate::sensor::{SensorId, SensorReading};

/// Per-request timeout. The engine never blocks user interaction on the
/// backend, but a blocking client still needs a bound.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Blocking HTTP client for the read-only backend endpoints.
pub struct HttpBackend {
    server_url: String,
    client: Client,
}

impl HttpBackend {
    /// Build a client for the given backend base URL (no trailing slash).
    pub fn new(server_url: impl Into<String>) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                warn!("backend client init failed: {e}");
                BackendError::Network
            })?;
        Ok(Self {
            server_url: server_url.into(),
            client,
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, BackendError> {
        let response = self.client.get(url).send().map_err(|e| {
            warn!("GET {url} failed: {e}");
            BackendError::Network
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("GET {url} returned {status}");
            return Err(BackendError::Status(status.as_u16()));
        }

        response.json::<T>().map_err(|e| {
            warn!("GET {url} returned undecodable body: {e}");
            BackendError::Decode
        })
    }
}

impl BackendPort for HttpBackend {
    fn fetch_historical(
        &mut self,
        topic: &str,
        sensor_id: SensorId,
    ) -> Result<Vec<SensorReading>, BackendError> {
        let url = format!("{}/{topic}?id={sensor_id}", self.server_url);
        self.get_json(&url)
    }

    fn fetch_sensor_ids(&mut self, topic: &str) -> Result<Vec<SensorId>, BackendError> {
        let url = format!("{}/{topic}", self.server_url);
        self.get_json(&url)
    }
}

//! Shared fixture for the integration tests.
//!
//! Bundles the coordinator with the in-memory adapters, pre-seeds the
//! sensor taxonomy, and wires the canned backend with data the dialog
//! tests rely on. Tests drive the engine by handing it `HostEvent`s and
//! published readings, exactly as the event loop would.

use mapsense::adapters::sim_backend::SimBackend;
use mapsense::adapters::sim_host::SimHost;
use mapsense::adapters::sim_transport::SimTransport;
use mapsense::app::events::HostEvent;
use mapsense::app::ports::{FailureReporter, PoiRepository, TelemetryTransport};
use mapsense::app::service::OverlayApp;
use mapsense::config::AppConfig;
use mapsense::poi::PoiId;
use mapsense::scheduler::Scheduler;
use mapsense::sensor::SensorReading;
use mapsense::taxonomy;
use mapsense::Error;

/// Reporter that records every surfaced failure for assertions.
#[derive(Default)]
pub struct RecordingReporter {
    pub failures: Vec<(String, String)>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, context_fragment: &str) -> bool {
        self.failures.iter().any(|(c, _)| c.contains(context_fragment))
    }
}

impl FailureReporter for RecordingReporter {
    fn failure(&mut self, context: &str, error: &Error) {
        self.failures.push((context.to_string(), error.to_string()));
    }
}

/// The full engine with in-memory collaborators.
pub struct Fixture {
    pub host: SimHost,
    pub transport: SimTransport,
    pub backend: SimBackend,
    pub sched: Scheduler,
    pub reporter: RecordingReporter,
    pub app: OverlayApp,
}

impl Fixture {
    /// Taxonomy bootstrapped, toggle index built, canned backend data for
    /// the Temperature topic (sensors 7 and 8).
    pub fn new() -> Self {
        let mut fixture = Self::without_bootstrap();
        fixture.app.bootstrap(&mut fixture.host, &mut fixture.reporter);
        fixture
    }

    /// Same, but the toggle index is left unbuilt.
    pub fn without_bootstrap() -> Self {
        let config = AppConfig::default();
        let mut host = SimHost::new();
        taxonomy::ensure_taxonomy(&mut host, &config.sensor_types)
            .expect("taxonomy bootstrap against the sim host");
        host.create_type_group("Information").unwrap();
        host.create_types("Information", &["Information"]).unwrap();

        let mut backend = SimBackend::new();
        backend.set_sensor_ids("temperature", &[3, 7, 8]);
        backend.set_historical(
            "temperature",
            7,
            vec![
                reading(7, 41.0, "2024-05-01T10:00:00Z"),
                reading(7, 44.0, "2024-05-01T10:00:30Z"),
            ],
        );
        backend.set_historical(
            "temperature",
            8,
            vec![reading(8, 39.0, "2024-05-01T09:59:00Z")],
        );
        backend.set_sensor_ids("pressure", &[3]);
        backend.set_historical("pressure", 3, vec![reading(3, 1.2, "2024-05-01T10:00:00Z")]);

        Self {
            host,
            transport: SimTransport::new(),
            backend,
            sched: Scheduler::new(),
            reporter: RecordingReporter::new(),
            app: OverlayApp::new(config),
        }
    }

    /// Create a POI on the host. Panics if `type_title` does not exist.
    pub fn seed_poi(
        &mut self,
        title: &str,
        type_title: &str,
        custom_data: &str,
        position: [f64; 3],
    ) -> PoiId {
        self.host
            .add_poi(title, type_title, custom_data, position)
            .expect("seeding POI with a known type")
    }

    /// Hand one lifecycle event to the coordinator.
    pub fn handle(&mut self, event: HostEvent) {
        self.app.handle_event(
            event,
            &mut self.host,
            &mut self.transport,
            &mut self.backend,
            &mut self.sched,
            &mut self.reporter,
        );
    }

    /// Initial load: site activation drives the first resync.
    pub fn resync(&mut self) {
        self.handle(HostEvent::SiteActivated);
    }

    /// Open a POI and let its settle timer fire.
    pub fn open_and_settle(&mut self, id: PoiId) {
        let poi = self.host.poi(id).cloned().expect("opening a seeded POI");
        self.handle(HostEvent::PoiOpened(poi));
        self.handle(HostEvent::DialogSettled { poi_id: id });
    }

    /// Publish a reading into the loopback broker.
    pub fn publish(&mut self, topic: &str, id: u64, value: f64, timestamp: &str) {
        let payload =
            serde_json::to_vec(&reading(id, value, timestamp)).expect("encoding sim reading");
        self.transport.publish(topic, &payload);
    }

    /// Deliver every pending broker message to the coordinator.
    pub fn deliver(&mut self) {
        while let Some((topic, payload)) = self.transport.poll() {
            self.app
                .handle_message(&topic, &payload, &mut self.host, &mut self.reporter);
        }
    }
}

pub fn reading(id: u64, value: f64, timestamp: &str) -> SensorReading {
    SensorReading {
        id,
        value,
        timestamp: timestamp.to_string(),
    }
}

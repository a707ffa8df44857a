//! Mapsense simulator — main entry point.
//!
//! Runs the overlay engine against the in-memory host, a loopback broker,
//! and either canned backend data or a live HTTP backend (when the config
//! names a `server_url`). A short scripted session exercises the whole
//! event surface: resync on load and camera moves, live telemetry with
//! alert toggling, dialog open/edit/close, wide mode, and POI deletion.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │                                                            │
//! │  SimHost            SimTransport       SimBackend /        │
//! │  (Repository+View)  (loopback broker)  HttpBackend         │
//! │                                        LogReporter         │
//! │                                                            │
//! │  ─────────────── Port Trait Boundary ───────────────────   │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │            OverlayApp (pure logic)                   │  │
//! │  │  nearby · topics · session · widgets                 │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │                                                            │
//! │  Scheduler (delegate-driven) · EventQueue (hook-fed)       │
//! └────────────────────────────────────────────────────────────┘
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use mapsense::adapters::http_backend::HttpBackend;
use mapsense::adapters::log_reporter::LogReporter;
use mapsense::adapters::sim_backend::SimBackend;
use mapsense::adapters::sim_host::SimHost;
use mapsense::adapters::sim_transport::SimTransport;
use mapsense::app::events::{EventQueue, HostEvent};
use mapsense::app::ports::{
    BackendPort, PoiRepository, ScheduleDelegate, ScheduleFiredKind, TelemetryTransport,
};
use mapsense::app::service::{OverlayApp, DASHBOARD_REFRESH_LABEL};
use mapsense::config::AppConfig;
use mapsense::poi::Poi;
use mapsense::scheduler::{Schedule, ScheduleKind, Scheduler};
use mapsense::sensor::SensorReading;
use mapsense::taxonomy;

/// Length of the scripted session, in event loop ticks.
const SIM_TICKS: u32 = 36;

// ── Scheduler delegate ────────────────────────────────────────
//
// Bridges the scheduler (which knows nothing about the event system) to
// the queue: periodic fires become dashboard ticks, one-shot fires carry
// the POI id of a settling dialog.

struct QueueDelegate(Rc<RefCell<EventQueue>>);

impl ScheduleDelegate for QueueDelegate {
    fn on_schedule_fired(&mut self, _label: &str, kind: ScheduleFiredKind, token: u64) {
        let event = match kind {
            ScheduleFiredKind::Periodic => HostEvent::DashboardTick,
            ScheduleFiredKind::OneShot => HostEvent::DialogSettled { poi_id: token },
        };
        self.0.borrow_mut().push(event);
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("mapsense-sim v{}", env!("CARGO_PKG_VERSION"));

    // Config: explicit file must parse; a missing file degrades to the
    // compiled defaults.
    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<AppConfig>(&raw)
                .with_context(|| format!("parsing config file '{path}'"))?,
            Err(e) => {
                warn!("config load failed ({e}), using defaults");
                AppConfig::default()
            }
        },
        None => AppConfig::default(),
    };
    if let Err(msg) = config.validate() {
        anyhow::bail!("invalid config: {msg}");
    }
    if !config.broker_url.is_empty() {
        info!(
            "broker configured at {} (the simulator uses the loopback transport)",
            config.broker_url
        );
    }

    if config.server_url.is_empty() {
        info!("no server_url configured — using canned backend data");
        let mut backend = demo_backend();
        run(config, &mut backend)
    } else {
        info!("using live backend at {}", config.server_url);
        let mut backend = HttpBackend::new(config.server_url.clone())
            .map_err(|e| anyhow::anyhow!("backend client: {e}"))?;
        run(config, &mut backend)
    }
}

fn run(config: AppConfig, backend: &mut impl BackendPort) -> Result<()> {
    let mut host = SimHost::new();
    let mut transport = SimTransport::new();
    let mut reporter = LogReporter::new();

    // ── 1. Make sure the sensor taxonomy exists on the host ───
    taxonomy::ensure_taxonomy(&mut host, &config.sensor_types)
        .map_err(|e| anyhow::anyhow!("POI taxonomy bootstrap failed: {e}"))?;

    // ── 2. Seed a small demo site ─────────────────────────────
    host.create_type_group("Information")
        .map_err(|e| anyhow::anyhow!("seeding: {e}"))?;
    host.create_types("Information", &["Information"])
        .map_err(|e| anyhow::anyhow!("seeding: {e}"))?;

    let boiler = host
        .add_poi(
            "Boiler room",
            "Temperature Normal",
            r#"{"sensorId":7,"threshold":55,"value":40}"#,
            [2.0, 0.0, 0.0],
        )
        .context("seeding boiler POI")?;
    let pump = host
        .add_poi(
            "Pump skid",
            "Pressure Normal",
            r#"{"sensorId":3,"threshold":2}"#,
            [4.0, 1.0, 0.0],
        )
        .context("seeding pump POI")?;
    let reception = host
        .add_poi("Reception", "Information", "", [1.0, 1.0, 0.0])
        .context("seeding reception POI")?;
    let roof_tank = host
        .add_poi(
            "Roof tank",
            "Temperature Normal",
            r#"{"sensorId":9,"threshold":55}"#,
            [500.0, 0.0, 0.0], // Far outside the camera radius.
        )
        .context("seeding roof tank POI")?;

    // ── 3. Event queue fed by the lifecycle hooks ─────────────
    let queue = Rc::new(RefCell::new(EventQueue::new()));
    wire_hooks(&mut host, &queue);

    // ── 4. Coordinator + scheduler ────────────────────────────
    let mut app = OverlayApp::new(config.clone());
    app.bootstrap(&mut host, &mut reporter);

    let mut sched = Scheduler::new();
    sched.add(Schedule {
        label: DASHBOARD_REFRESH_LABEL,
        kind: ScheduleKind::Periodic {
            interval_ms: config.dashboard_refresh_ms,
        },
        token: 0,
        enabled: true,
    });
    let mut delegate = QueueDelegate(Rc::clone(&queue));

    // ── 5. Site activation → initial resync ───────────────────
    host.activate_site();

    info!("simulator ready, entering event loop");

    // ── 6. Event loop with a scripted session ─────────────────
    for tick in 0..SIM_TICKS {
        std::thread::sleep(Duration::from_millis(u64::from(config.tick_ms)));
        sched.tick(config.tick_ms, &mut delegate);

        drive_scenario(tick, boiler, pump, reception, &mut host, &mut transport, &mut app, &queue);

        // Process all pending lifecycle events.
        loop {
            let Some(event) = queue.borrow_mut().pop() else {
                break;
            };
            app.handle_event(
                event,
                &mut host,
                &mut transport,
                backend,
                &mut sched,
                &mut reporter,
            );
        }

        // Dispatch live telemetry.
        while let Some((topic, payload)) = transport.poll() {
            app.handle_message(&topic, &payload, &mut host, &mut reporter);
        }
    }

    // ── 7. Session summary ────────────────────────────────────
    info!(
        "session done: tracking {:?}, {} live topic(s)",
        app.nearby_ids(),
        app.topics().len()
    );
    for item in app.dashboard().items() {
        info!("on alert: '{}' (POI {})", item.title, item.poi_id);
    }
    if let Some(poi) = app.nearby_poi(roof_tank) {
        info!("wide mode picked up '{}'", poi.title);
    }
    Ok(())
}

/// Register queue-feeding listeners on every lifecycle channel.
fn wire_hooks(host: &mut SimHost, queue: &Rc<RefCell<EventQueue>>) {
    // The host fires site activation on every site switch; the overlay
    // only bootstraps once.
    let q = Rc::clone(queue);
    host.on_site_activated.connect_once(move |()| {
        q.borrow_mut().push(HostEvent::SiteActivated);
    });

    let q = Rc::clone(queue);
    host.on_transition_end.connect(move |()| {
        q.borrow_mut().push(HostEvent::CameraSettled);
    });

    let q = Rc::clone(queue);
    host.on_poi_open.connect(move |poi: &Poi| {
        q.borrow_mut().push(HostEvent::PoiOpened(poi.clone()));
    });

    let q = Rc::clone(queue);
    host.on_poi_close.connect(move |poi: &Poi| {
        q.borrow_mut().push(HostEvent::PoiClosed(poi.clone()));
    });

    let q = Rc::clone(queue);
    host.on_poi_save.connect(move |(poi, created): &(Poi, bool)| {
        q.borrow_mut().push(HostEvent::PoiSaved {
            poi: poi.clone(),
            created: *created,
        });
    });

    let q = Rc::clone(queue);
    host.on_poi_delete.connect(move |poi: &Poi| {
        q.borrow_mut().push(HostEvent::PoiDeleted(poi.clone()));
    });
}

/// The scripted user session.
#[allow(clippy::too_many_arguments)]
fn drive_scenario(
    tick: u32,
    boiler: u64,
    pump: u64,
    reception: u64,
    host: &mut SimHost,
    transport: &mut SimTransport,
    app: &mut OverlayApp,
    queue: &Rc<RefCell<EventQueue>>,
) {
    match tick {
        // Normal reading for the boiler sensor.
        2 => publish(transport, "iot/temperature/7", 7, 48.0),
        // Threshold crossed — the boiler goes on alert.
        4 => publish(transport, "iot/temperature/7", 7, 61.0),
        // User opens the boiler dialog.
        6 => host.open_poi(boiler),
        // User drags the threshold slider up.
        10 => {
            queue.borrow_mut().push(HostEvent::ThresholdEdited(65.0));
        }
        // Reading lands below the new threshold — back to normal.
        12 => publish(transport, "iot/temperature/7", 7, 58.0),
        // User closes the dialog and flips the dashboard to wide mode.
        14 => host.close_poi(boiler),
        16 => app.dashboard_mut().request_wide_mode(true),
        // The roof tank (far away) is tracked now; feed it an alert.
        22 => publish(transport, "iot/temperature/9", 9, 71.0),
        // Opening a non-sensor POI just navigates there.
        26 => host.open_poi(reception),
        // Pressure POI is deleted; its topic must go with it.
        30 => host.delete_poi(pump),
        _ => {}
    }
}

fn publish(transport: &mut SimTransport, topic: &str, id: u64, value: f64) {
    let reading = SensorReading {
        id,
        value,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    match serde_json::to_vec(&reading) {
        Ok(payload) => transport.publish(topic, &payload),
        Err(e) => warn!("could not encode sim reading: {e}"),
    }
}

/// Canned backend fixtures matching the demo site.
fn demo_backend() -> SimBackend {
    let mut backend = SimBackend::new();
    backend.set_sensor_ids("temperature", &[3, 7, 8, 9]);
    backend.set_sensor_ids("pressure", &[3, 5]);
    backend.set_historical(
        "temperature",
        7,
        vec![
            reading(7, 41.0, "2024-05-01T10:00:00Z"),
            reading(7, 44.5, "2024-05-01T10:00:30Z"),
            reading(7, 47.0, "2024-05-01T10:01:00Z"),
        ],
    );
    backend.set_historical(
        "temperature",
        9,
        vec![reading(9, 52.0, "2024-05-01T10:00:00Z")],
    );
    backend.set_historical(
        "pressure",
        3,
        vec![reading(3, 1.4, "2024-05-01T10:00:00Z")],
    );
    backend
}

fn reading(id: u64, value: f64, timestamp: &str) -> SensorReading {
    SensorReading {
        id,
        value,
        timestamp: timestamp.to_string(),
    }
}

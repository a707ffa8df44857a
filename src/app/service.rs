//! Overlay coordinator — the hexagonal core.
//!
//! [`OverlayApp`] owns every piece of derived state (the nearby set, the
//! live topic set, the dialog session, the history buffer, the widgets)
//! and exposes one handler per lifecycle event. All I/O flows through port
//! traits injected at call sites, making the entire coordinator testable
//! with mock adapters.
//!
//! ```text
//!  PoiRepository ──▶ ┌─────────────────────────────┐ ──▶ chart
//!  ViewPort      ──▶ │         OverlayApp          │ ──▶ config panel
//!  Transport     ◀── │  nearby · topics · session  │ ──▶ dashboard
//!  BackendPort   ──▶ └─────────────────────────────┘ ──▶ FailureReporter
//! ```
//!
//! Handlers run to completion on one event loop; nothing here is shared
//! across threads, so consistency is a matter of never leaving `nearby`
//! and `topics` disagreeing past the end of a handler.

use std::collections::HashMap;

use log::{info, warn};

use crate::config::{AppConfig, SensorState, SensorType};
use crate::custom_data::PoiCustomData;
use crate::error::Result;
use crate::history::HistoryBuffer;
use crate::poi::{format_value_title, Poi, PoiFilter, PoiId};
use crate::scheduler::{Schedule, ScheduleKind, Scheduler};
use crate::sensor::{format_readings, parse_reading, topic_for, SensorId, SensorReading, SensorSample};
use crate::taxonomy;
use crate::toggle::StateTypeIndex;
use crate::widgets::chart::ChartModel;
use crate::widgets::config_panel::ConfigPanel;
use crate::widgets::dashboard::DashboardModel;
use crate::widgets::DialogModule;

use super::events::HostEvent;
use super::ports::{BackendPort, FailureReporter, PoiRepository, TelemetryTransport, ViewPort};
use super::session::{DialogSession, DialogState};

/// Label of the one-shot schedule staging dialog readiness.
pub const DIALOG_SETTLE_LABEL: &str = "dialog-settle";

/// Label of the periodic dashboard refresh schedule.
pub const DASHBOARD_REFRESH_LABEL: &str = "dashboard-refresh";

// ───────────────────────────────────────────────────────────────
// Derived state
// ───────────────────────────────────────────────────────────────

/// Everything the overlay derives from host state and the live stream.
///
/// The host owns POI persistence and identity; nothing in here survives a
/// host-side mutation without re-derivation.
#[derive(Default)]
struct AppState {
    /// Tracked sensor POIs in the current camera vicinity (or site-wide
    /// in wide mode), keyed by POI id.
    nearby: HashMap<PoiId, Poi>,
    /// Live subscriptions — always the image of `nearby` under topic
    /// derivation, for POIs with an assigned sensor.
    topics: Vec<String>,
    /// Open-dialog session.
    session: DialogSession,
    /// Samples feeding the chart for the open POI.
    history: HistoryBuffer<SensorSample>,
    /// Site-wide tracking instead of camera-radius tracking.
    wide_mode: bool,
}

// ───────────────────────────────────────────────────────────────
// OverlayApp
// ───────────────────────────────────────────────────────────────

/// The overlay coordinator.
pub struct OverlayApp {
    config: AppConfig,
    state: AppState,
    toggles: StateTypeIndex,
    chart: ChartModel,
    config_panel: ConfigPanel,
    dashboard: DashboardModel,
    /// POI waiting for its dialog-settle one-shot.
    pending_open: Option<Poi>,
    /// Scheduler slot of the pending settle timer.
    settle_slot: Option<usize>,
}

impl OverlayApp {
    /// Construct the coordinator from configuration.
    ///
    /// Does **not** touch the host — call [`bootstrap`](Self::bootstrap)
    /// once the host connection is up.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            state: AppState::default(),
            toggles: StateTypeIndex::new(),
            chart: ChartModel::new(),
            config_panel: ConfigPanel::new(),
            dashboard: DashboardModel::new(),
            pending_open: None,
            settle_slot: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Resolve the state-type index from the host's type list.
    ///
    /// On failure the index stays not-ready and alert toggling degrades
    /// (reported per attempt) until a later bootstrap succeeds.
    pub fn bootstrap(&mut self, host: &mut impl PoiRepository, reporter: &mut impl FailureReporter) {
        match host.find_all_types() {
            Ok(types) => self.toggles.build(&types, &self.config.sensor_types),
            Err(e) => reporter.failure("state-type index build", &e.into()),
        }
    }

    // ── Event dispatch ────────────────────────────────────────

    /// Process one lifecycle event.
    ///
    /// The `host` parameter satisfies **both** [`PoiRepository`] and
    /// [`ViewPort`] — the host platform is one object behind two ports.
    pub fn handle_event(
        &mut self,
        event: HostEvent,
        host: &mut (impl PoiRepository + ViewPort),
        transport: &mut impl TelemetryTransport,
        backend: &mut impl BackendPort,
        sched: &mut Scheduler,
        reporter: &mut impl FailureReporter,
    ) {
        match event {
            HostEvent::SiteActivated | HostEvent::CameraSettled => {
                self.resync(host, transport, reporter);
            }
            HostEvent::PoiOpened(poi) => self.handle_poi_open(poi, host, sched, reporter),
            HostEvent::DialogSettled { poi_id } => {
                self.handle_dialog_settled(poi_id, backend, sched, reporter);
            }
            HostEvent::PoiClosed(poi) => self.handle_poi_close(&poi, host),
            HostEvent::PoiSaved { poi, created } => {
                self.handle_poi_save(&poi, created, host, reporter);
            }
            HostEvent::PoiDeleted(poi) => self.handle_poi_delete(&poi, transport, reporter),
            HostEvent::ThresholdEdited(value) => {
                self.handle_threshold_edit(value, host, reporter);
            }
            HostEvent::SensorIdEdited(id) => {
                self.handle_sensor_id_edit(id, host, transport, backend, reporter);
            }
            HostEvent::DashboardTick => self.refresh_dashboard(host, transport, reporter),
        }
    }

    // ── Nearby-POI / subscription synchroniser ────────────────

    /// Re-derive the nearby set and its subscriptions.
    ///
    /// Flushes any mutations applied to the previously tracked POIs first,
    /// then rebuilds `nearby` and the topic set from the current camera
    /// position (or site-wide in wide mode).
    pub fn resync(
        &mut self,
        host: &mut (impl PoiRepository + ViewPort),
        transport: &mut impl TelemetryTransport,
        reporter: &mut impl FailureReporter,
    ) {
        // 1. Titles and types mutated while tracked must not be lost.
        if !self.state.nearby.is_empty() {
            let tracked: Vec<Poi> = self.state.nearby.values().cloned().collect();
            if let Err(e) = taxonomy::save_all(host, &tracked) {
                reporter.failure("flush tracked POIs", &e);
            }
        }

        // 2. Drop every live subscription before re-deriving.
        if !self.state.topics.is_empty() {
            if let Err(e) = transport.unsubscribe(&self.state.topics) {
                reporter.failure("unsubscribe stale topics", &e.into());
            }
        }
        self.state.topics.clear();

        // 3. Query the host for the new vicinity.
        let pois = match self.find_nearby(host) {
            Ok(pois) => pois,
            Err(e) => {
                reporter.failure("nearby POI query", &e);
                return;
            }
        };

        // 4./5. Track parseable sensor POIs; derive topics for assigned ones.
        for poi in pois {
            let data = match PoiCustomData::parse(&poi.custom_data) {
                Ok(data) => data,
                Err(e) => {
                    warn!("POI '{}' has incompatible custom data", poi.title);
                    reporter.failure("resync custom data", &e.into());
                    continue; // Untracked until its data is fixed.
                }
            };

            if !data.has_sensor() {
                warn!("sensor id of POI '{}' not found", poi.title);
                self.state.nearby.insert(poi.id, poi);
                continue; // Tracked, but no topic to subscribe.
            }

            if let Some(sensor) = self.config.sensor_types.get(poi.group()) {
                self.state.topics.push(topic_for(
                    &self.config.topic_prefix,
                    &sensor.topic,
                    data.sensor_id,
                ));
            }
            self.state.nearby.insert(poi.id, poi);
        }

        // 6. One batch subscribe for the whole set.
        if !self.state.topics.is_empty() {
            if let Err(e) = transport.subscribe(&self.state.topics) {
                reporter.failure("subscribe nearby topics", &e.into());
            }
        }

        info!(
            "resync: tracking {} POI(s), {} topic(s){}",
            self.state.nearby.len(),
            self.state.topics.len(),
            if self.state.wide_mode { " (wide)" } else { "" },
        );
    }

    /// Query, reclassify and rehighlight the vicinity.
    fn find_nearby(&mut self, host: &mut (impl PoiRepository + ViewPort)) -> Result<Vec<Poi>> {
        let camera_global = host.local_to_global(host.camera_position());

        let filter = if self.state.wide_mode {
            PoiFilter::default()
        } else {
            PoiFilter::within(camera_global, self.config.distance_threshold)
        };
        let pois = host.filter(&filter)?;

        let old_ids: Vec<PoiId> = self.state.nearby.keys().copied().collect();
        host.unhighlight(&old_ids);
        self.state.nearby.clear();

        let sensors: Vec<Poi> = pois
            .into_iter()
            .filter(|poi| self.config.sensor_types.is_sensor(poi.group()))
            .collect();
        let new_ids: Vec<PoiId> = sensors.iter().map(|poi| poi.id).collect();
        host.highlight(&new_ids);
        Ok(sensors)
    }

    // ── Live telemetry dispatcher ─────────────────────────────

    /// Apply one inbound transport message to every matching tracked POI.
    pub fn handle_message(
        &mut self,
        topic: &str,
        payload: &[u8],
        view: &mut impl ViewPort,
        reporter: &mut impl FailureReporter,
    ) {
        let reading = match parse_reading(payload) {
            Ok(reading) => reading,
            Err(e) => {
                warn!("undecodable telemetry on '{topic}'");
                reporter.failure("telemetry payload", &e.into());
                return;
            }
        };

        // Several tracked POIs may share a sensor id; all of them update.
        let ids: Vec<PoiId> = self.state.nearby.keys().copied().collect();
        for id in ids {
            let Some(tracked) = self.state.nearby.get(&id).cloned() else {
                continue;
            };
            let data = match PoiCustomData::parse(&tracked.custom_data) {
                Ok(data) => data,
                Err(e) => {
                    // Taxonomy violation on one POI must not starve the rest.
                    reporter.failure("tracked POI custom data", &e.into());
                    continue;
                }
            };
            if data.sensor_id != reading.id {
                continue;
            }
            let Some(sensor) = self.config.sensor_types.get(tracked.group()).cloned() else {
                continue;
            };
            self.apply_reading(tracked, &data, &reading, &sensor, view, reporter);
        }
    }

    /// Fold one reading into one tracked POI.
    fn apply_reading(
        &mut self,
        mut poi: Poi,
        old_data: &PoiCustomData,
        reading: &SensorReading,
        sensor: &SensorType,
        view: &mut impl ViewPort,
        reporter: &mut impl FailureReporter,
    ) {
        let updated = PoiCustomData {
            sensor_id: old_data.sensor_id,
            threshold: Some(old_data.threshold_or(sensor.threshold)),
            value: Some(reading.value),
        };
        poi.custom_data = updated.encode();
        poi.title = format_value_title(&poi.title, reading.value, &sensor.unit);

        if self.state.session.is_open_poi(poi.id) {
            self.state.history.push(SensorSample::from(reading));
            let threshold = self
                .state
                .session
                .threshold()
                .unwrap_or_else(|| old_data.threshold_or(sensor.threshold));
            self.chart
                .draw(self.state.history.iter(), threshold, sensor.range);
        }

        let next_state = if updated.on_alert() {
            SensorState::Alert
        } else {
            SensorState::Normal
        };
        if let Err(e) = self.toggles.toggle(&mut poi, next_state, view) {
            reporter.failure("alert-state toggle", &e.into());
        }

        self.state.nearby.insert(poi.id, poi);
    }

    // ── Dialog lifecycle ──────────────────────────────────────

    fn handle_poi_open(
        &mut self,
        poi: Poi,
        host: &mut (impl PoiRepository + ViewPort),
        sched: &mut Scheduler,
        reporter: &mut impl FailureReporter,
    ) {
        if !self.config.sensor_types.is_sensor(poi.group()) {
            // Not ours: strip the dialog extensions and just go there.
            self.config_panel.detach();
            self.chart.detach();
            if let Err(e) = host.navigate_to(poi.id) {
                reporter.failure("navigate to POI", &e.into());
            }
            self.state.session.open_nonsensor();
            return;
        }

        // Give the host a moment to materialise the dialog, then populate.
        if let Some(slot) = self.settle_slot.take() {
            sched.remove(slot);
        }
        let poi_id = poi.id;
        self.pending_open = Some(poi);
        self.settle_slot = sched.add(Schedule {
            label: DIALOG_SETTLE_LABEL,
            kind: ScheduleKind::OneShot {
                delay_ms: self.config.dialog_settle_ms,
            },
            token: poi_id,
            enabled: true,
        });
        if self.settle_slot.is_none() {
            warn!("no scheduler slot free for dialog settle — dialog stays unpopulated");
        }
    }

    /// The settle delay elapsed: derive the session and populate widgets.
    fn handle_dialog_settled(
        &mut self,
        poi_id: PoiId,
        backend: &mut impl BackendPort,
        sched: &mut Scheduler,
        reporter: &mut impl FailureReporter,
    ) {
        // A timer from a superseded dialog must not consume the pending
        // POI of the one that replaced it.
        if !self
            .pending_open
            .as_ref()
            .is_some_and(|poi| poi.id == poi_id)
        {
            return;
        }
        // The spent one-shot must give its scheduler slot back.
        if let Some(slot) = self.settle_slot.take() {
            sched.remove(slot);
        }
        let Some(poi) = self.pending_open.take() else {
            return;
        };

        let data = match PoiCustomData::parse(&poi.custom_data) {
            Ok(data) => data,
            Err(e) => {
                reporter.failure("open POI custom data", &e.into());
                return;
            }
        };
        let Some(sensor) = self.config.sensor_types.get(poi.group()).cloned() else {
            return;
        };

        match backend.fetch_sensor_ids(&sensor.topic) {
            Ok(ids) => self.config_panel.build(&sensor, &data, &ids),
            Err(e) => reporter.failure("sensor id query", &e.into()),
        }

        let threshold = data.threshold_or(sensor.threshold);
        self.state
            .session
            .open_sensor(poi.id, poi.group(), threshold, data.sensor_id);

        match backend.fetch_historical(&sensor.topic, data.sensor_id) {
            Ok(readings) => self.load_history(&readings, threshold, &sensor),
            Err(e) => reporter.failure("historical data query", &e.into()),
        }
    }

    fn handle_poi_close(&mut self, poi: &Poi, host: &mut impl ViewPort) {
        host.highlight(&[poi.id]);
        self.state.session.close();
        self.state.history.clear();
    }

    fn handle_poi_save(
        &mut self,
        poi: &Poi,
        created: bool,
        host: &mut impl PoiRepository,
        reporter: &mut impl FailureReporter,
    ) {
        if created {
            self.config_panel.detach();
            self.chart.detach();
        }
        let Some(sensor) = self.config.sensor_types.get(poi.group()) else {
            return;
        };

        // Normalise: fill the default threshold, keep what exists. A
        // malformed blob is replaced wholesale, not merged.
        let normalized = match PoiCustomData::parse(&poi.custom_data) {
            Ok(data) => PoiCustomData {
                sensor_id: data.sensor_id,
                value: data.value,
                threshold: Some(data.threshold_or(sensor.threshold)),
            },
            Err(_) => PoiCustomData {
                sensor_id: 0,
                value: None,
                threshold: Some(sensor.threshold),
            },
        };
        if let Err(e) = taxonomy::update_custom_data(host, poi.id, &normalized.encode()) {
            reporter.failure("normalise saved POI", &e);
        }
    }

    fn handle_poi_delete(
        &mut self,
        poi: &Poi,
        transport: &mut impl TelemetryTransport,
        reporter: &mut impl FailureReporter,
    ) {
        if !self.config.sensor_types.is_sensor(poi.group()) {
            return;
        }
        match PoiCustomData::parse(&poi.custom_data) {
            Ok(data) if data.has_sensor() => {
                if let Some(sensor) = self.config.sensor_types.get(poi.group()) {
                    let topic =
                        topic_for(&self.config.topic_prefix, &sensor.topic, data.sensor_id);
                    self.state.topics.retain(|t| t != &topic);
                    if let Err(e) = transport.unsubscribe(core::slice::from_ref(&topic)) {
                        reporter.failure("unsubscribe deleted POI", &e.into());
                    }
                }
            }
            Ok(_) => {}
            Err(e) => reporter.failure("deleted POI custom data", &e.into()),
        }
        self.state.nearby.remove(&poi.id);
    }

    // ── Configuration edits ───────────────────────────────────

    fn handle_threshold_edit(
        &mut self,
        value: f64,
        host: &mut impl PoiRepository,
        reporter: &mut impl FailureReporter,
    ) {
        if !self.state.session.set_threshold(value) {
            return; // Stale edit — no sensor dialog is open.
        }
        let Some(poi_id) = self.state.session.poi_id() else {
            return;
        };
        let data = PoiCustomData {
            sensor_id: self.state.session.sensor_id().unwrap_or(0),
            threshold: Some(value),
            value: self.state.history.get(0).map(|s| s.value),
        };
        if let Err(e) = taxonomy::update_custom_data(host, poi_id, &data.encode()) {
            reporter.failure("persist threshold", &e);
        }
    }

    fn handle_sensor_id_edit(
        &mut self,
        new_id: SensorId,
        host: &mut impl PoiRepository,
        transport: &mut impl TelemetryTransport,
        backend: &mut impl BackendPort,
        reporter: &mut impl FailureReporter,
    ) {
        let Some(old_id) = self.state.session.set_sensor_id(new_id) else {
            return; // Stale edit — no sensor dialog is open.
        };
        let (Some(poi_id), Some(group), Some(threshold)) = (
            self.state.session.poi_id(),
            self.state.session.group().map(str::to_string),
            self.state.session.threshold(),
        ) else {
            return;
        };
        let Some(sensor) = self.config.sensor_types.get(&group).cloned() else {
            return;
        };

        let data = PoiCustomData {
            sensor_id: new_id,
            threshold: Some(threshold),
            value: self.state.history.get(0).map(|s| s.value),
        };
        if let Err(e) = taxonomy::update_custom_data(host, poi_id, &data.encode()) {
            reporter.failure("persist sensor id", &e);
        }

        // Move the live subscription from the old sensor to the new one.
        if old_id != 0 {
            let old_topic = topic_for(&self.config.topic_prefix, &sensor.topic, old_id);
            self.state.topics.retain(|t| t != &old_topic);
            if let Err(e) = transport.unsubscribe(core::slice::from_ref(&old_topic)) {
                reporter.failure("unsubscribe old sensor", &e.into());
            }
        }
        if new_id != 0 {
            let new_topic = topic_for(&self.config.topic_prefix, &sensor.topic, new_id);
            self.state.topics.push(new_topic.clone());
            if let Err(e) = transport.subscribe(core::slice::from_ref(&new_topic)) {
                reporter.failure("subscribe new sensor", &e.into());
            }
        }

        match backend.fetch_historical(&sensor.topic, new_id) {
            Ok(readings) => self.load_history(&readings, threshold, &sensor),
            Err(e) => reporter.failure("historical data query", &e.into()),
        }
    }

    // ── Dashboard refresh ─────────────────────────────────────

    /// Recompute the alert list and reconcile the wide-mode toggle.
    fn refresh_dashboard(
        &mut self,
        host: &mut (impl PoiRepository + ViewPort),
        transport: &mut impl TelemetryTransport,
        reporter: &mut impl FailureReporter,
    ) {
        let mut alerting: Vec<&Poi> = self
            .state
            .nearby
            .values()
            .filter(|poi| {
                PoiCustomData::parse(&poi.custom_data).is_ok_and(|data| data.on_alert())
            })
            .collect();
        alerting.sort_by_key(|poi| poi.id);
        self.dashboard.refresh_items(alerting.into_iter());

        if self.dashboard.wide_mode_requested() != self.state.wide_mode {
            self.state.wide_mode = self.dashboard.wide_mode_requested();
            info!(
                "wide mode {}",
                if self.state.wide_mode { "on" } else { "off" }
            );
            self.resync(host, transport, reporter);
        }
    }

    /// Replace the history buffer with a fetched batch and redraw.
    fn load_history(&mut self, readings: &[SensorReading], threshold: f64, sensor: &SensorType) {
        self.state.history.clear();
        for sample in format_readings(readings) {
            self.state.history.push(sample);
        }
        self.chart
            .draw(self.state.history.iter(), threshold, sensor.range);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Ids of all tracked POIs, ascending.
    pub fn nearby_ids(&self) -> Vec<PoiId> {
        let mut ids: Vec<PoiId> = self.state.nearby.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// A tracked POI by id.
    pub fn nearby_poi(&self, id: PoiId) -> Option<&Poi> {
        self.state.nearby.get(&id)
    }

    /// The live topic set.
    pub fn topics(&self) -> &[String] {
        &self.state.topics
    }

    pub fn dialog_state(&self) -> DialogState {
        self.state.session.state()
    }

    pub fn session(&self) -> &DialogSession {
        &self.state.session
    }

    pub fn history(&self) -> &HistoryBuffer<SensorSample> {
        &self.state.history
    }

    pub fn chart(&self) -> &ChartModel {
        &self.chart
    }

    pub fn config_panel(&self) -> &ConfigPanel {
        &self.config_panel
    }

    pub fn dashboard(&self) -> &DashboardModel {
        &self.dashboard
    }

    /// Mutable dashboard access for the UI side (wide-mode toggle).
    pub fn dashboard_mut(&mut self) -> &mut DashboardModel {
        &mut self.dashboard
    }

    pub fn wide_mode(&self) -> bool {
        self.state.wide_mode
    }

    /// Whether alert-state toggling is operational.
    pub fn toggles_ready(&self) -> bool {
        self.toggles.is_ready()
    }
}

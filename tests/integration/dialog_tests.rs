//! Integration tests for the POI dialog lifecycle.

use crate::harness::Fixture;
use mapsense::app::events::HostEvent;
use mapsense::app::session::DialogState;
use mapsense::custom_data::PoiCustomData;
use mapsense::widgets::DialogModule;

const BOILER_DATA: &str = r#"{"sensorId":7,"threshold":55,"value":40}"#;

// ── Opening ──────────────────────────────────────────────────

#[test]
fn opening_a_sensor_poi_populates_session_and_widgets() {
    let mut f = Fixture::new();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    f.resync();

    f.open_and_settle(boiler);

    assert_eq!(f.app.dialog_state(), DialogState::OpenSensor);
    assert_eq!(f.app.session().poi_id(), Some(boiler));
    assert_eq!(f.app.session().threshold(), Some(55.0));
    assert_eq!(f.app.session().sensor_id(), Some(7));

    // Config panel carries the slider over the class range and the
    // dropdown fed from the backend.
    assert_eq!(f.app.config_panel().threshold_value(), Some(55.0));
    assert_eq!(f.app.config_panel().sensor_id_value(), Some(7));

    // History and chart hold the canned batch.
    assert_eq!(f.app.history().len(), 2);
    let chart = f.app.chart().view().expect("chart drawn on open");
    assert_eq!(chart.points.len(), 2);
    assert_eq!(chart.threshold, 55.0);
    assert_eq!(chart.y_domain, [10.0, 100.0]);
}

#[test]
fn opening_a_sensor_poi_defaults_missing_fields() {
    let mut f = Fixture::new();
    let poi = f.seed_poi("Bare", "Temperature Normal", "{}", [2.0, 0.0, 0.0]);
    f.resync();

    f.open_and_settle(poi);

    // Class default threshold, unassigned sensor.
    assert_eq!(f.app.session().threshold(), Some(55.0));
    assert_eq!(f.app.session().sensor_id(), Some(0));
}

#[test]
fn opening_a_nonsensor_poi_strips_modules_and_navigates() {
    let mut f = Fixture::new();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    let reception = f.seed_poi("Reception", "Information", "", [1.0, 1.0, 0.0]);
    f.resync();
    let nearby_before = f.app.nearby_ids();
    let topics_before = f.app.topics().to_vec();

    // A sensor dialog first, so the widgets have content to lose.
    f.open_and_settle(boiler);
    assert!(f.app.chart().is_attached());
    assert!(f.app.config_panel().is_attached());

    let poi = f.host.poi(reception).cloned().unwrap();
    f.handle(HostEvent::PoiOpened(poi));

    assert_eq!(f.app.dialog_state(), DialogState::OpenNonsensor);
    assert!(!f.app.chart().is_attached());
    assert!(!f.app.config_panel().is_attached());
    assert_eq!(f.host.navigations(), &[reception]);
    // Tracking and subscriptions are untouched.
    assert_eq!(f.app.nearby_ids(), nearby_before);
    assert_eq!(f.app.topics(), topics_before.as_slice());
}

#[test]
fn malformed_custom_data_leaves_dialog_unpopulated() {
    let mut f = Fixture::new();
    let poi = f.seed_poi("Broken", "Temperature Normal", "{broken", [2.0, 0.0, 0.0]);

    f.open_and_settle(poi);

    assert_eq!(f.app.dialog_state(), DialogState::Closed);
    assert!(!f.app.config_panel().is_attached());
    assert!(f.reporter.contains("custom data"));
}

#[test]
fn stale_settle_timer_for_a_superseded_dialog_is_discarded() {
    let mut f = Fixture::new();
    let first = f.seed_poi("First", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    let second = f.seed_poi(
        "Second",
        "Temperature Normal",
        r#"{"sensorId":8,"threshold":55}"#,
        [3.0, 0.0, 0.0],
    );
    f.resync();

    // Open the first POI, then the second before the first settles.
    let poi = f.host.poi(first).cloned().unwrap();
    f.handle(HostEvent::PoiOpened(poi));
    let poi = f.host.poi(second).cloned().unwrap();
    f.handle(HostEvent::PoiOpened(poi));

    // The first dialog's timer fires late: nothing may happen.
    f.handle(HostEvent::DialogSettled { poi_id: first });
    assert_eq!(f.app.dialog_state(), DialogState::Closed);

    // The second settles normally.
    f.handle(HostEvent::DialogSettled { poi_id: second });
    assert_eq!(f.app.session().poi_id(), Some(second));
    assert_eq!(f.app.session().sensor_id(), Some(8));
}

// ── Configuration edits ──────────────────────────────────────

#[test]
fn threshold_edit_updates_session_and_persists() {
    let mut f = Fixture::new();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    f.resync();
    f.open_and_settle(boiler);

    f.handle(HostEvent::ThresholdEdited(65.0));

    assert_eq!(f.app.session().threshold(), Some(65.0));
    let data = PoiCustomData::parse(&f.host.poi(boiler).unwrap().custom_data).unwrap();
    assert_eq!(data.threshold, Some(65.0));
    assert_eq!(data.sensor_id, 7);
    // The head of the loaded history rides along as the current value.
    assert_eq!(data.value, Some(41.0));
}

#[test]
fn sensor_id_edit_moves_subscription_and_refetches_history() {
    let mut f = Fixture::new();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    f.resync();
    f.open_and_settle(boiler);
    assert!(f.transport.is_subscribed("iot/temperature/7"));
    assert_eq!(f.app.history().len(), 2);

    f.handle(HostEvent::SensorIdEdited(8));

    assert_eq!(f.app.session().sensor_id(), Some(8));
    assert!(!f.transport.is_subscribed("iot/temperature/7"));
    assert!(f.transport.is_subscribed("iot/temperature/8"));
    assert!(f.app.topics().contains(&"iot/temperature/8".to_string()));
    assert!(!f.app.topics().contains(&"iot/temperature/7".to_string()));

    // History was re-fetched for the new sensor.
    assert_eq!(f.app.history().len(), 1);
    assert_eq!(f.app.history().get(0).unwrap().value, 39.0);

    // The persisted blob binds the new sensor.
    let data = PoiCustomData::parse(&f.host.poi(boiler).unwrap().custom_data).unwrap();
    assert_eq!(data.sensor_id, 8);
}

#[test]
fn edits_without_an_open_dialog_are_noops() {
    let mut f = Fixture::new();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    f.resync();

    f.handle(HostEvent::ThresholdEdited(65.0));
    f.handle(HostEvent::SensorIdEdited(8));

    assert_eq!(
        f.host.poi(boiler).unwrap().custom_data,
        BOILER_DATA,
        "stale widget edits must not touch the host"
    );
    assert!(f.reporter.failures.is_empty());
}

// ── Closing ──────────────────────────────────────────────────

#[test]
fn closing_clears_session_and_history() {
    let mut f = Fixture::new();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    f.resync();
    f.open_and_settle(boiler);
    assert!(f.app.history().len() > 0);

    let poi = f.host.poi(boiler).cloned().unwrap();
    f.handle(HostEvent::PoiClosed(poi));

    assert_eq!(f.app.dialog_state(), DialogState::Closed);
    assert_eq!(f.app.history().len(), 0);
    assert!(f.host.highlighted().contains(&boiler));
}

#[test]
fn live_readings_feed_the_open_chart_only() {
    let mut f = Fixture::new();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    f.resync();
    f.open_and_settle(boiler);
    assert_eq!(f.app.history().len(), 2);

    f.publish("iot/temperature/7", 7, 60.0, "2024-05-01T10:02:00Z");
    f.deliver();
    assert_eq!(f.app.history().len(), 3);
    assert_eq!(f.app.chart().view().unwrap().points.len(), 3);

    // After closing, readings still update the POI but no longer the chart.
    let poi = f.host.poi(boiler).cloned().unwrap();
    f.handle(HostEvent::PoiClosed(poi));
    f.publish("iot/temperature/7", 7, 61.0, "2024-05-01T10:02:30Z");
    f.deliver();
    assert_eq!(f.app.history().len(), 0);
}

// ── Saving ───────────────────────────────────────────────────

#[test]
fn saving_a_created_poi_detaches_widgets_and_normalizes_data() {
    let mut f = Fixture::new();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    f.resync();
    f.open_and_settle(boiler);
    assert!(f.app.chart().is_attached());

    let created = f.seed_poi("New sensor", "Temperature Normal", "", [3.0, 0.0, 0.0]);
    let poi = f.host.poi(created).cloned().unwrap();
    f.handle(HostEvent::PoiSaved { poi, created: true });

    assert!(!f.app.chart().is_attached());
    assert!(!f.app.config_panel().is_attached());

    // The empty blob was replaced wholesale with defaults.
    let data = PoiCustomData::parse(&f.host.poi(created).unwrap().custom_data).unwrap();
    assert_eq!(data.sensor_id, 0);
    assert_eq!(data.threshold, Some(55.0));
    assert_eq!(data.value, None);
}

#[test]
fn saving_fills_missing_threshold_but_keeps_the_rest() {
    let mut f = Fixture::new();
    let poi_id = f.seed_poi(
        "Partial",
        "Temperature Normal",
        r#"{"sensorId":7,"value":48}"#,
        [2.0, 0.0, 0.0],
    );

    let poi = f.host.poi(poi_id).cloned().unwrap();
    f.handle(HostEvent::PoiSaved { poi, created: false });

    let data = PoiCustomData::parse(&f.host.poi(poi_id).unwrap().custom_data).unwrap();
    assert_eq!(data.sensor_id, 7);
    assert_eq!(data.value, Some(48.0));
    assert_eq!(data.threshold, Some(55.0));
}

#[test]
fn saving_a_nonsensor_poi_is_untouched() {
    let mut f = Fixture::new();
    let reception = f.seed_poi("Reception", "Information", "lobby notes", [1.0, 1.0, 0.0]);

    let poi = f.host.poi(reception).cloned().unwrap();
    f.handle(HostEvent::PoiSaved { poi, created: false });

    assert_eq!(f.host.poi(reception).unwrap().custom_data, "lobby notes");
}

//! Integration tests for the resync → telemetry → dashboard pipeline.

use crate::harness::Fixture;
use mapsense::app::events::HostEvent;
use mapsense::custom_data::PoiCustomData;

const BOILER_DATA: &str = r#"{"sensorId":7,"threshold":55,"value":40}"#;

// ── Resync / subscription synchronisation ────────────────────

#[test]
fn initial_resync_tracks_sensors_and_subscribes() {
    let mut f = Fixture::new();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    let pump = f.seed_poi(
        "Pump skid",
        "Pressure Normal",
        r#"{"sensorId":3,"threshold":2}"#,
        [4.0, 1.0, 0.0],
    );
    f.seed_poi("Reception", "Information", "", [1.0, 1.0, 0.0]);
    f.seed_poi("Roof tank", "Temperature Normal", BOILER_DATA, [500.0, 0.0, 0.0]);

    f.resync();

    assert_eq!(f.app.nearby_ids(), vec![boiler, pump]);
    let mut topics = f.app.topics().to_vec();
    topics.sort();
    assert_eq!(topics, vec!["iot/pressure/3", "iot/temperature/7"]);
    assert!(f.transport.is_subscribed("iot/temperature/7"));
    assert!(f.transport.is_subscribed("iot/pressure/3"));
    // Only the tracked sensor POIs are highlighted.
    assert_eq!(f.host.highlighted(), vec![boiler, pump]);
}

#[test]
fn resync_without_movement_is_idempotent() {
    let mut f = Fixture::new();
    f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);

    f.resync();
    let nearby_first = f.app.nearby_ids();
    let topics_first = f.app.topics().to_vec();

    f.resync();
    assert_eq!(f.app.nearby_ids(), nearby_first);
    assert_eq!(f.app.topics(), topics_first.as_slice());
    assert_eq!(f.transport.subscriptions(), vec!["iot/temperature/7"]);
}

#[test]
fn malformed_custom_data_excludes_poi_without_aborting_the_rest() {
    let mut f = Fixture::new();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    let broken = f.seed_poi(
        "Broken sensor",
        "Temperature Normal",
        "{not valid json",
        [3.0, 0.0, 0.0],
    );

    f.resync();

    assert_eq!(f.app.nearby_ids(), vec![boiler]);
    assert!(f.app.nearby_poi(broken).is_none());
    assert_eq!(f.app.topics(), ["iot/temperature/7"]);
    assert!(f.reporter.contains("custom data"));
}

#[test]
fn unassigned_sensor_is_tracked_without_a_topic() {
    let mut f = Fixture::new();
    let poi = f.seed_poi(
        "Unassigned",
        "Temperature Normal",
        r#"{"threshold":55}"#,
        [2.0, 0.0, 0.0],
    );

    f.resync();

    assert_eq!(f.app.nearby_ids(), vec![poi]);
    assert!(f.app.topics().is_empty());
}

#[test]
fn camera_move_resubscribes_to_the_new_vicinity() {
    let mut f = Fixture::new();
    let near = f.seed_poi("Near", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    let far = f.seed_poi(
        "Far",
        "Temperature Normal",
        r#"{"sensorId":8,"threshold":55}"#,
        [500.0, 0.0, 0.0],
    );

    f.resync();
    assert_eq!(f.app.nearby_ids(), vec![near]);

    f.host.move_camera([500.0, 0.0, 0.0]);
    f.handle(HostEvent::CameraSettled);

    assert_eq!(f.app.nearby_ids(), vec![far]);
    assert!(!f.transport.is_subscribed("iot/temperature/7"));
    assert!(f.transport.is_subscribed("iot/temperature/8"));
}

#[test]
fn resync_flushes_locally_mutated_pois_to_the_host() {
    let mut f = Fixture::new();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    f.resync();

    // A reading mutates title and custom data in memory only.
    f.publish("iot/temperature/7", 7, 60.0, "2024-05-01T10:02:00Z");
    f.deliver();
    assert_eq!(f.host.poi(boiler).unwrap().title, "Boiler room");

    // The next resync persists the tracked mutations before rebuilding.
    f.resync();
    let flushed = f.host.poi(boiler).unwrap();
    assert_eq!(flushed.title, "60 \u{00b0}C-Boiler room");
    let data = PoiCustomData::parse(&flushed.custom_data).unwrap();
    assert_eq!(data.value, Some(60.0));
}

// ── Telemetry dispatch / alert toggling ──────────────────────

#[test]
fn threshold_crossing_updates_title_data_and_type() {
    let mut f = Fixture::new();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    f.resync();

    f.publish("iot/temperature/7", 7, 60.0, "2024-05-01T10:02:00Z");
    f.deliver();

    let poi = f.app.nearby_poi(boiler).unwrap();
    assert_eq!(poi.title, "60 \u{00b0}C-Boiler room");
    assert_eq!(poi.poi_type.title, "Temperature Alert");
    let data = PoiCustomData::parse(&poi.custom_data).unwrap();
    assert_eq!(data.sensor_id, 7);
    assert_eq!(data.threshold, Some(55.0));
    assert_eq!(data.value, Some(60.0));

    // Falling back under the threshold toggles to the normal type and
    // keeps only the original suffix in the title.
    f.publish("iot/temperature/7", 7, 50.0, "2024-05-01T10:02:30Z");
    f.deliver();

    let poi = f.app.nearby_poi(boiler).unwrap();
    assert_eq!(poi.title, "50 \u{00b0}C-Boiler room");
    assert_eq!(poi.poi_type.title, "Temperature Normal");
}

#[test]
fn shared_sensor_id_updates_every_match() {
    let mut f = Fixture::new();
    let a = f.seed_poi("A", "Temperature Normal", BOILER_DATA, [1.0, 0.0, 0.0]);
    let b = f.seed_poi("B", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    f.resync();

    f.publish("iot/temperature/7", 7, 60.0, "2024-05-01T10:02:00Z");
    f.deliver();

    for id in [a, b] {
        assert_eq!(f.app.nearby_poi(id).unwrap().poi_type.title, "Temperature Alert");
    }
}

#[test]
fn mismatched_sensor_id_leaves_pois_alone() {
    let mut f = Fixture::new();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    f.resync();

    f.publish("iot/temperature/7", 99, 60.0, "2024-05-01T10:02:00Z");
    f.deliver();

    let poi = f.app.nearby_poi(boiler).unwrap();
    assert_eq!(poi.title, "Boiler room");
    assert_eq!(poi.poi_type.title, "Temperature Normal");
}

#[test]
fn toggling_before_type_index_is_built_degrades_and_reports() {
    let mut f = Fixture::without_bootstrap();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    f.resync();

    f.publish("iot/temperature/7", 7, 60.0, "2024-05-01T10:02:00Z");
    f.deliver();

    // Title and data still update; the type stays as-is and the failure
    // surfaces through the reporter.
    let poi = f.app.nearby_poi(boiler).unwrap();
    assert_eq!(poi.title, "60 \u{00b0}C-Boiler room");
    assert_eq!(poi.poi_type.title, "Temperature Normal");
    assert!(f.reporter.contains("toggle"));
}

#[test]
fn undecodable_payload_is_reported_and_dropped() {
    let mut f = Fixture::new();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    f.resync();

    f.transport.publish("iot/temperature/7", b"{nope");
    f.deliver();

    assert_eq!(f.app.nearby_poi(boiler).unwrap().title, "Boiler room");
    assert!(f.reporter.contains("telemetry"));
}

// ── Deletion ─────────────────────────────────────────────────

#[test]
fn deleting_a_sensor_poi_unsubscribes_and_untracks() {
    let mut f = Fixture::new();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    f.resync();
    assert!(f.transport.is_subscribed("iot/temperature/7"));

    let poi = f.host.poi(boiler).cloned().unwrap();
    f.handle(HostEvent::PoiDeleted(poi));

    assert!(!f.transport.is_subscribed("iot/temperature/7"));
    assert!(f.app.nearby_ids().is_empty());
    assert!(f.app.topics().is_empty());
}

#[test]
fn deleting_a_nonsensor_poi_changes_nothing() {
    let mut f = Fixture::new();
    let boiler = f.seed_poi("Boiler room", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    let reception = f.seed_poi("Reception", "Information", "", [1.0, 1.0, 0.0]);
    f.resync();

    let poi = f.host.poi(reception).cloned().unwrap();
    f.handle(HostEvent::PoiDeleted(poi));

    assert_eq!(f.app.nearby_ids(), vec![boiler]);
    assert!(f.transport.is_subscribed("iot/temperature/7"));
}

// ── Dashboard refresh / wide mode ────────────────────────────

#[test]
fn dashboard_lists_only_alerting_pois() {
    let mut f = Fixture::new();
    let hot = f.seed_poi(
        "Hot",
        "Temperature Normal",
        r#"{"sensorId":7,"threshold":55,"value":70}"#,
        [1.0, 0.0, 0.0],
    );
    f.seed_poi(
        "Cool",
        "Temperature Normal",
        r#"{"sensorId":8,"threshold":55,"value":40}"#,
        [2.0, 0.0, 0.0],
    );
    f.resync();

    f.handle(HostEvent::DashboardTick);

    let items = f.app.dashboard().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].poi_id, hot);
    assert_eq!(items[0].title, "Hot");
}

#[test]
fn pois_without_readings_never_alert() {
    let mut f = Fixture::new();
    f.seed_poi(
        "Fresh",
        "Temperature Normal",
        r#"{"sensorId":7,"threshold":55}"#,
        [1.0, 0.0, 0.0],
    );
    f.resync();

    f.handle(HostEvent::DashboardTick);
    assert!(f.app.dashboard().items().is_empty());
}

#[test]
fn wide_mode_request_triggers_site_wide_resync() {
    let mut f = Fixture::new();
    let near = f.seed_poi("Near", "Temperature Normal", BOILER_DATA, [2.0, 0.0, 0.0]);
    let far = f.seed_poi(
        "Far",
        "Temperature Normal",
        r#"{"sensorId":8,"threshold":55}"#,
        [500.0, 0.0, 0.0],
    );

    f.resync();
    assert_eq!(f.app.nearby_ids(), vec![near]);

    f.app.dashboard_mut().request_wide_mode(true);
    f.handle(HostEvent::DashboardTick);

    assert!(f.app.wide_mode());
    assert_eq!(f.app.nearby_ids(), vec![near, far]);
    assert!(f.transport.is_subscribed("iot/temperature/8"));

    // Flipping back narrows the set again.
    f.app.dashboard_mut().request_wide_mode(false);
    f.handle(HostEvent::DashboardTick);
    assert!(!f.app.wide_mode());
    assert_eq!(f.app.nearby_ids(), vec![near]);
}

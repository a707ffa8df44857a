//! Inbound event system.
//!
//! Events are produced by:
//! - Host lifecycle hooks (POI open/close/save/delete, camera settled)
//! - The scheduler (dashboard refresh ticks, dialog-settle one-shots)
//! - Widget edits (threshold slider, sensor-id dropdown)
//!
//! Events are consumed by the main loop, which hands them one at a time to
//! the [`OverlayApp`](super::service::OverlayApp). Handlers run to
//! completion before the next event is popped, so state mutations within
//! one handler are atomic relative to every other handler.

use heapless::Deque;
use log::warn;

use crate::poi::{Poi, PoiId};
use crate::sensor::SensorId;

/// Maximum number of pending events.
const EVENT_QUEUE_CAP: usize = 32;

/// Everything that can drive the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The host finished loading a site; the overlay may start.
    SiteActivated,
    /// A camera transition ended — the nearby set must be re-derived.
    CameraSettled,
    /// A POI details dialog opened.
    PoiOpened(Poi),
    /// The open POI dialog closed.
    PoiClosed(Poi),
    /// A POI was saved; `created` marks a brand-new POI.
    PoiSaved { poi: Poi, created: bool },
    /// A POI was deleted from the host.
    PoiDeleted(Poi),
    /// The threshold slider in the configuration panel changed.
    ThresholdEdited(f64),
    /// The sensor-id dropdown in the configuration panel changed.
    SensorIdEdited(SensorId),
    /// The dialog-settle delay elapsed for the given POI.
    DialogSettled { poi_id: PoiId },
    /// Periodic dashboard refresh fired.
    DashboardTick,
}

/// Bounded FIFO of pending events.
///
/// The queue drops on overflow rather than reallocating; a full queue
/// means the loop has stalled, and dropping the newest event with a
/// warning is the recoverable choice.
#[derive(Default)]
pub struct EventQueue {
    buf: Deque<HostEvent, EVENT_QUEUE_CAP>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event. Returns `false` if the queue is full (event dropped).
    pub fn push(&mut self, event: HostEvent) -> bool {
        if let Err(dropped) = self.buf.push_back(event) {
            warn!("event queue full — dropping {dropped:?}");
            return false;
        }
        true
    }

    /// Pop the next event in FIFO order.
    pub fn pop(&mut self) -> Option<HostEvent> {
        self.buf.pop_front()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

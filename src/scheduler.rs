//! Timer/scheduler engine.
//!
//! Drives the two timing concerns of the overlay: the periodic alert
//! dashboard refresh and the one-shot "dialog settle" delay that waits for
//! the host's POI dialog to materialise before populating it. The
//! scheduler notifies a [`ScheduleDelegate`] when schedules fire; the main
//! loop implements the delegate to push events into the queue.
//!
//! Timers are best-effort: firing resolution is the event loop tick.

use crate::app::ports::{ScheduleDelegate, ScheduleFiredKind};
use log::info;

// ═══════════════════════════════════════════════════════════════
//  Schedule types
// ═══════════════════════════════════════════════════════════════

/// A single schedule entry.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// Human-readable label (e.g., "dashboard-refresh").
    pub label: &'static str,
    /// Type of schedule.
    pub kind: ScheduleKind,
    /// Opaque payload handed back to the delegate on fire.
    pub token: u64,
    /// Whether this schedule is currently enabled.
    pub enabled: bool,
}

/// The type of schedule determines how and when it fires.
#[derive(Debug, Clone)]
pub enum ScheduleKind {
    /// Fire every `interval_ms` milliseconds.
    Periodic { interval_ms: u32 },
    /// Fire once after `delay_ms`, then auto-disable.
    OneShot { delay_ms: u32 },
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Maximum number of concurrent schedules (stack-allocated).
const MAX_SCHEDULES: usize = 4;

/// The scheduler engine.
///
/// Intentionally decoupled from the event system: when a schedule fires it
/// invokes the [`ScheduleDelegate`] callback rather than pushing events
/// directly, which keeps it independently testable.
pub struct Scheduler {
    /// Active schedules.
    schedules: [Option<ScheduleEntry>; MAX_SCHEDULES],
    /// Global enable flag.
    enabled: bool,
}

/// Internal bookkeeping for a live schedule.
#[derive(Debug, Clone)]
struct ScheduleEntry {
    schedule: Schedule,
    /// Milliseconds elapsed since registration or last fire.
    elapsed_ms: u64,
    /// Whether the schedule has fired (for OneShot).
    fired: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            schedules: [None, None, None, None],
            enabled: true,
        }
    }

    /// Add a schedule. Returns the slot index, or `None` if full.
    pub fn add(&mut self, schedule: Schedule) -> Option<usize> {
        for (i, slot) in self.schedules.iter_mut().enumerate() {
            if slot.is_none() {
                info!("scheduler: added '{}' at slot {}", schedule.label, i);
                *slot = Some(ScheduleEntry {
                    schedule,
                    elapsed_ms: 0,
                    fired: false,
                });
                return Some(i);
            }
        }
        None // All slots full.
    }

    /// Remove a schedule by slot index.
    pub fn remove(&mut self, slot: usize) {
        if slot < MAX_SCHEDULES {
            if let Some(entry) = &self.schedules[slot] {
                info!(
                    "scheduler: removed '{}' from slot {}",
                    entry.schedule.label, slot
                );
            }
            self.schedules[slot] = None;
        }
    }

    /// Enable or disable the entire scheduler.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Tick the scheduler. Call once per event loop iteration.
    ///
    /// When a schedule fires, `delegate.on_schedule_fired()` receives the
    /// label, fire kind, and registration token. The caller decides what
    /// to do with the notification.
    ///
    /// * `tick_ms` — duration of one tick in milliseconds.
    pub fn tick(&mut self, tick_ms: u32, delegate: &mut dyn ScheduleDelegate) {
        if !self.enabled {
            return;
        }

        for slot in self.schedules.iter_mut() {
            let entry = match slot {
                Some(e) if e.schedule.enabled => e,
                _ => continue,
            };

            entry.elapsed_ms += u64::from(tick_ms);

            match &entry.schedule.kind {
                ScheduleKind::Periodic { interval_ms } => {
                    if entry.elapsed_ms >= u64::from(*interval_ms) {
                        delegate.on_schedule_fired(
                            entry.schedule.label,
                            ScheduleFiredKind::Periodic,
                            entry.schedule.token,
                        );
                        entry.elapsed_ms = 0;
                    }
                }

                ScheduleKind::OneShot { delay_ms } => {
                    if !entry.fired && entry.elapsed_ms >= u64::from(*delay_ms) {
                        info!(
                            "scheduler: '{}' one-shot fired (after {}ms)",
                            entry.schedule.label, delay_ms
                        );
                        delegate.on_schedule_fired(
                            entry.schedule.label,
                            ScheduleFiredKind::OneShot,
                            entry.schedule.token,
                        );
                        entry.fired = true;
                        entry.schedule.enabled = false; // Auto-disable.
                    }
                }
            }
        }
    }

    /// Number of active (enabled) schedules.
    pub fn active_count(&self) -> usize {
        self.schedules
            .iter()
            .filter(|s| s.as_ref().is_some_and(|e| e.schedule.enabled))
            .count()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

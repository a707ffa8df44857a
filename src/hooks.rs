//! Lifecycle hook registry.
//!
//! The host platform notifies the engine through lifecycle callbacks (POI
//! open/close/save/delete, camera settled, site activation). This registry
//! gives every registration an explicit handle with deterministic
//! teardown, and supports the one-shot pattern — listen once, detach
//! inside the first delivery — as a first-class primitive instead of a
//! connect-then-disconnect dance inside the callback.

/// Opaque handle returned at registration time. Disconnecting an already
/// disconnected handle is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookHandle(u64);

struct Entry<E> {
    id: u64,
    once: bool,
    callback: Box<dyn FnMut(&E)>,
}

/// Registry of listeners for one lifecycle channel.
pub struct HookRegistry<E> {
    entries: Vec<Entry<E>>,
    next_id: u64,
}

impl<E> Default for HookRegistry<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E> HookRegistry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for every future emission.
    pub fn connect(&mut self, callback: impl FnMut(&E) + 'static) -> HookHandle {
        self.register(callback, false)
    }

    /// Register a listener delivered exactly once, then removed.
    pub fn connect_once(&mut self, callback: impl FnMut(&E) + 'static) -> HookHandle {
        self.register(callback, true)
    }

    /// Remove a listener. Returns whether it was still registered.
    pub fn disconnect(&mut self, handle: HookHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != handle.0);
        self.entries.len() != before
    }

    /// Deliver `event` to every listener, dropping one-shot entries after
    /// their first delivery.
    pub fn emit(&mut self, event: &E) {
        for entry in &mut self.entries {
            (entry.callback)(event);
        }
        self.entries.retain(|e| !e.once);
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn register(&mut self, callback: impl FnMut(&E) + 'static, once: bool) -> HookHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            once,
            callback: Box::new(callback),
        });
        HookHandle(id)
    }
}

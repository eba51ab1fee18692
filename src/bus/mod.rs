//! Publish/subscribe plumbing shared by viewer components.
//!
//! The bus delivers typed [`ViewerEvent`]s synchronously to listeners registered
//! per [`EventKind`]. The task queue provides the cooperative "run after the
//! current phase" scheduling that components use to defer work until their
//! peers have finished subscribing.

mod event_loop;
mod tasks;

pub use event_loop::EventLoop;
pub use tasks::TaskQueue;

use crate::events::{EventKind, ViewerEvent};
use log::trace;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(&ViewerEvent)>;

struct Entry {
    id: ListenerId,
    once: bool,
    listener: Listener,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: HashMap<EventKind, Vec<Entry>>,
}

/// Single-threaded event bus.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for every event of `kind`.
    pub fn subscribe<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&ViewerEvent) + 'static,
    {
        self.insert(kind, Rc::new(listener), false)
    }

    /// Registers `listener` for the next event of `kind` only.
    pub fn subscribe_once<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&ViewerEvent) + 'static,
    {
        self.insert(kind, Rc::new(listener), true)
    }

    fn insert(&self, kind: EventKind, listener: Listener, once: bool) -> ListenerId {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = ListenerId(registry.next_id);
        registry.listeners.entry(kind).or_default().push(Entry {
            id,
            once,
            listener,
        });
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut registry = self.registry.borrow_mut();
        for entries in registry.listeners.values_mut() {
            if let Some(pos) = entries.iter().position(|entry| entry.id == id) {
                entries.remove(pos);
                return true;
            }
        }
        false
    }

    /// Number of listeners currently registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.registry
            .borrow()
            .listeners
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Delivers `event` to its listeners in subscription order.
    ///
    /// The listener list is snapshotted first, so listeners may dispatch,
    /// subscribe, or unsubscribe re-entrantly. Listeners added during a
    /// dispatch only see later events.
    pub fn dispatch(&self, event: ViewerEvent) {
        let kind = event.kind();
        let snapshot: Vec<Listener> = {
            let mut registry = self.registry.borrow_mut();
            let Some(entries) = registry.listeners.get_mut(&kind) else {
                trace!("No listeners for {}", kind.name());
                return;
            };
            let snapshot = entries.iter().map(|entry| entry.listener.clone()).collect();
            entries.retain(|entry| !entry.once);
            snapshot
        };

        trace!("Dispatching {} to {} listener(s)", kind.name(), snapshot.len());
        for listener in snapshot {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.borrow();
        let total: usize = registry.listeners.values().map(Vec::len).sum();
        f.debug_struct("EventBus").field("listeners", &total).finish()
    }
}

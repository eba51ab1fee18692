//! Host loop tying the bus to the deferred-task queue.

use super::{EventBus, TaskQueue};
use crate::events::ViewerEvent;

/// Bus plus task queue, with the ordering guarantee external input relies on.
///
/// Every posted event is preceded by a drain of deferred tasks, so work
/// queued during initialization always runs before the first input.
#[derive(Debug, Clone, Default)]
pub struct EventLoop {
    bus: EventBus,
    tasks: TaskQueue,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    /// Finishes the current phase: runs everything deferred so far.
    pub fn settle(&self) -> usize {
        self.tasks.run_pending()
    }

    /// Delivers an external input event.
    pub fn post(&self, event: ViewerEvent) {
        self.tasks.run_pending();
        self.bus.dispatch(event);
        self.tasks.run_pending();
    }
}

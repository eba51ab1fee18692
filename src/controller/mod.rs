//! Cursor tool controller: which tool is active, and how tools hand over.
//!
//! The controller reacts to tool requests and presentation-mode changes
//! published on the [`EventBus`](crate::bus::EventBus), drives the pan
//! gesture handler, and announces every change back on the bus.

mod core;
#[cfg(test)]
mod tests;

pub use self::core::{CursorToolController, CursorToolOptions, SwitchOutcome};

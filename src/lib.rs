//! Cursor tool controller for document viewers.
//!
//! Tracks which cursor tool (select, hand, zoom) is active over the document
//! surface, mediates switches between tools, and suspends the active tool
//! while presentation mode is engaged. Components talk to the controller
//! through a typed publish/subscribe [`bus`].

pub mod bus;
pub mod config;
pub mod controller;
pub mod events;
pub mod pan;
pub mod replay;
pub mod shortcuts;
pub mod tool;

pub use bus::{EventBus, EventLoop, TaskQueue};
pub use config::Config;
pub use controller::{CursorToolController, CursorToolOptions, SwitchOutcome};
pub use events::{EventKind, PresentationModeState, ViewerEvent};
pub use tool::{CursorTool, ToolError};

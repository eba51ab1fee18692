//! Typed viewer events exchanged over the event bus.

use crate::tool::CursorTool;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies the component that published an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

impl SourceId {
    /// Allocates a process-unique source id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Presentation (fullscreen) mode lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PresentationModeState {
    #[default]
    Unknown,
    /// Regular viewing
    Normal,
    /// Transition in progress
    Changing,
    /// Presentation mode engaged
    Fullscreen,
}

impl std::str::FromStr for PresentationModeState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unknown" => Ok(Self::Unknown),
            "normal" => Ok(Self::Normal),
            "changing" => Ok(Self::Changing),
            "fullscreen" => Ok(Self::Fullscreen),
            _ => Err(()),
        }
    }
}

/// Every event that travels over the viewer bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    /// Request to activate a specific tool.
    SwitchCursorTool { tool: CursorTool },
    /// Request to flip between the hand and select tools.
    ToggleHandCursorTool,
    /// Presentation mode entered, left, or is changing.
    PresentationModeChanged { state: PresentationModeState },
    /// Published after the active tool changed.
    CursorToolChanged { source: SourceId, tool: CursorTool },
    /// Published after every hand-tool toggle request, even a no-op one.
    HandCursorToolToggled { source: SourceId, tool: CursorTool },
}

/// Payload-free tag of a [`ViewerEvent`], used as the listener registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SwitchCursorTool,
    ToggleHandCursorTool,
    PresentationModeChanged,
    CursorToolChanged,
    HandCursorToolToggled,
}

impl EventKind {
    /// Stable event name, as printed by the replay driver.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SwitchCursorTool => "switchcursortool",
            Self::ToggleHandCursorTool => "togglehandcursortool",
            Self::PresentationModeChanged => "presentationmodechanged",
            Self::CursorToolChanged => "cursortoolchanged",
            Self::HandCursorToolToggled => "handcursortooltoggled",
        }
    }
}

impl ViewerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::SwitchCursorTool { .. } => EventKind::SwitchCursorTool,
            Self::ToggleHandCursorTool => EventKind::ToggleHandCursorTool,
            Self::PresentationModeChanged { .. } => EventKind::PresentationModeChanged,
            Self::CursorToolChanged { .. } => EventKind::CursorToolChanged,
            Self::HandCursorToolToggled { .. } => EventKind::HandCursorToolToggled,
        }
    }

    /// Tool carried by the event, if any.
    pub fn tool(&self) -> Option<CursorTool> {
        match self {
            Self::SwitchCursorTool { tool }
            | Self::CursorToolChanged { tool, .. }
            | Self::HandCursorToolToggled { tool, .. } => Some(*tool),
            Self::ToggleHandCursorTool | Self::PresentationModeChanged { .. } => None,
        }
    }
}

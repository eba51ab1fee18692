//! Cursor tool state machine.

use crate::bus::{EventBus, ListenerId, TaskQueue};
use crate::events::{EventKind, PresentationModeState, SourceId, ViewerEvent};
use crate::pan::{GrabToPan, PanGesture, PointerEvent, Surface};
use crate::tool::{CursorTool, ToolError};
use log::{debug, error, info};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Construction-time configuration for [`CursorToolController::new`].
pub struct CursorToolOptions {
    /// Scroll container the hand tool pans
    pub container: Rc<RefCell<Surface>>,
    /// Bus the controller listens on and publishes to
    pub event_bus: EventBus,
    /// Queue used to defer the initial tool switch
    pub task_queue: TaskQueue,
    /// Tool activated once initialization settles
    pub cursor_tool_on_load: CursorTool,
}

/// Result of a tool switch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The active tool changed and `cursortoolchanged` was published.
    Switched { from: CursorTool, to: CursorTool },
    /// The requested tool was already active.
    Unchanged,
    /// Presentation mode is engaged; switching is disabled.
    Suppressed,
    /// The requested tool has no activation behavior.
    Rejected(ToolError),
}

impl SwitchOutcome {
    pub fn is_switched(&self) -> bool {
        matches!(self, Self::Switched { .. })
    }
}

#[derive(Debug, Default)]
struct ToolState {
    active: CursorTool,
    /// Tool to restore when presentation mode ends. Present iff presenting.
    saved_before_presentation: Option<CursorTool>,
}

/// Whether `tool` needs the pan handler active. Tools without activation
/// behavior are rejected here, before any side effect runs.
fn requires_pan(tool: CursorTool) -> Result<bool, ToolError> {
    match tool {
        CursorTool::Select => Ok(false),
        CursorTool::Hand => Ok(true),
        CursorTool::Zoom => Err(ToolError::Unsupported(tool)),
    }
}

struct Shared<P> {
    source: SourceId,
    bus: EventBus,
    state: RefCell<ToolState>,
    pan: RefCell<P>,
}

impl<P: PanGesture> Shared<P> {
    fn active(&self) -> CursorTool {
        self.state.borrow().active
    }

    fn is_presenting(&self) -> bool {
        self.state.borrow().saved_before_presentation.is_some()
    }

    fn switch_tool(&self, tool: CursorTool) -> SwitchOutcome {
        if self.is_presenting() {
            debug!("Ignoring switch to {tool}: presentation mode is engaged");
            return SwitchOutcome::Suppressed;
        }
        self.apply_switch(tool)
    }

    /// Switch entry point exempt from the presentation guard. Only the
    /// presentation mode handler calls this directly.
    fn apply_switch(&self, tool: CursorTool) -> SwitchOutcome {
        let from = self.active();
        if tool == from {
            return SwitchOutcome::Unchanged;
        }

        let wants_pan = match requires_pan(tool) {
            Ok(wants_pan) => wants_pan,
            Err(err) => {
                error!("Cannot switch cursor tool: {err}");
                return SwitchOutcome::Rejected(err);
            }
        };
        let had_pan = requires_pan(from).unwrap_or(false);

        {
            let mut pan = self.pan.borrow_mut();
            if had_pan {
                pan.deactivate();
            }
            if wants_pan {
                pan.activate();
            }
        }

        self.state.borrow_mut().active = tool;
        debug!("Cursor tool switched: {from} -> {tool}");

        self.bus.dispatch(ViewerEvent::CursorToolChanged {
            source: self.source,
            tool,
        });
        SwitchOutcome::Switched { from, to: tool }
    }

    fn toggle_hand_tool(&self) {
        let target = if self.active() == CursorTool::Hand {
            CursorTool::Select
        } else {
            CursorTool::Hand
        };
        self.switch_tool(target);

        self.bus.dispatch(ViewerEvent::HandCursorToolToggled {
            source: self.source,
            tool: self.active(),
        });
    }

    fn on_presentation_mode_changed(&self, state: PresentationModeState) {
        match state {
            PresentationModeState::Fullscreen => {
                if self.is_presenting() {
                    debug!("Presentation mode already engaged, keeping saved tool");
                    return;
                }
                let previous = self.active();
                self.state.borrow_mut().saved_before_presentation = Some(previous);
                info!("Presentation mode engaged, suspending {previous} tool");
                self.apply_switch(CursorTool::Select);
            }
            PresentationModeState::Normal => {
                // Cleared before restoring: listeners of the restore
                // notification must already see presentation mode as ended.
                let saved = self.state.borrow_mut().saved_before_presentation.take();
                if let Some(tool) = saved {
                    info!("Presentation mode left, restoring {tool} tool");
                    self.apply_switch(tool);
                }
            }
            PresentationModeState::Unknown | PresentationModeState::Changing => {}
        }
    }
}

/// Tracks the active cursor tool and mediates switches between tools.
///
/// Listens for `switchcursortool`, `togglehandcursortool` and
/// `presentationmodechanged` on the bus, and publishes `cursortoolchanged`
/// whenever the active tool changes. The pan handler is owned exclusively
/// by the controller.
pub struct CursorToolController<P: PanGesture + 'static = GrabToPan> {
    shared: Rc<Shared<P>>,
    listeners: Vec<ListenerId>,
}

impl CursorToolController<GrabToPan> {
    /// Creates a controller panning `options.container` with [`GrabToPan`].
    ///
    /// The switch to `cursor_tool_on_load` is deferred on the task queue so
    /// components subscribing to `cursortoolchanged` during the same
    /// initialization phase still see it.
    pub fn new(options: CursorToolOptions) -> Self {
        let pan = GrabToPan::new(options.container);
        Self::with_pan_handler(
            pan,
            options.event_bus,
            &options.task_queue,
            options.cursor_tool_on_load,
        )
    }
}

impl<P: PanGesture + 'static> CursorToolController<P> {
    /// Creates a controller around any pan gesture implementation.
    pub fn with_pan_handler(
        pan: P,
        event_bus: EventBus,
        task_queue: &TaskQueue,
        cursor_tool_on_load: CursorTool,
    ) -> Self {
        let shared = Rc::new(Shared {
            source: SourceId::next(),
            bus: event_bus,
            state: RefCell::new(ToolState::default()),
            pan: RefCell::new(pan),
        });

        let listeners = register_listeners(&shared);

        let weak = Rc::downgrade(&shared);
        task_queue.defer(move || {
            if let Some(shared) = weak.upgrade() {
                shared.switch_tool(cursor_tool_on_load);
            }
        });

        Self { shared, listeners }
    }

    /// Identity carried in the `source` field of published events.
    pub fn source_id(&self) -> SourceId {
        self.shared.source
    }

    pub fn active_tool(&self) -> CursorTool {
        self.shared.active()
    }

    /// Whether presentation mode is engaged (tool switching disabled).
    pub fn is_presenting(&self) -> bool {
        self.shared.is_presenting()
    }

    /// Attempts to make `tool` the active tool.
    ///
    /// Does nothing while presentation mode is engaged or when `tool` is
    /// already active. Unsupported tools are logged and leave state untouched.
    pub fn switch_tool(&self, tool: CursorTool) -> SwitchOutcome {
        self.shared.switch_tool(tool)
    }

    /// Forwards pointer input to the pan handler. Returns true if consumed.
    pub fn handle_pointer(&self, event: PointerEvent) -> bool {
        self.shared.pan.borrow_mut().handle_pointer(event)
    }
}

impl<P: PanGesture + 'static> Drop for CursorToolController<P> {
    fn drop(&mut self) {
        for id in self.listeners.drain(..) {
            self.shared.bus.unsubscribe(id);
        }
    }
}

impl<P: PanGesture + 'static> std::fmt::Debug for CursorToolController<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("CursorToolController")
            .field("source", &self.shared.source)
            .field("active", &state.active)
            .field("saved_before_presentation", &state.saved_before_presentation)
            .finish()
    }
}

fn register_listeners<P: PanGesture + 'static>(shared: &Rc<Shared<P>>) -> Vec<ListenerId> {
    let bus = shared.bus.clone();

    let weak: Weak<Shared<P>> = Rc::downgrade(shared);
    let switch = bus.subscribe(EventKind::SwitchCursorTool, move |event| {
        if let (Some(shared), ViewerEvent::SwitchCursorTool { tool }) = (weak.upgrade(), event) {
            shared.switch_tool(*tool);
        }
    });

    let weak = Rc::downgrade(shared);
    let toggle = bus.subscribe(EventKind::ToggleHandCursorTool, move |_| {
        if let Some(shared) = weak.upgrade() {
            shared.toggle_hand_tool();
        }
    });

    let weak = Rc::downgrade(shared);
    let presentation = bus.subscribe(EventKind::PresentationModeChanged, move |event| {
        if let (Some(shared), ViewerEvent::PresentationModeChanged { state }) =
            (weak.upgrade(), event)
        {
            shared.on_presentation_mode_changed(*state);
        }
    });

    vec![switch, toggle, presentation]
}

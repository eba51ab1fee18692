use super::*;
use crate::bus::EventLoop;
use crate::events::{EventKind, PresentationModeState, ViewerEvent};
use crate::pan::{CursorStyle, MouseButton, PanGesture, PointerEvent, Surface};
use crate::tool::{CursorTool, ToolError};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Counts calls into the pan capability.
#[derive(Debug, Default)]
struct PanCalls {
    activate: Cell<u32>,
    deactivate: Cell<u32>,
}

struct CountingPan {
    calls: Rc<PanCalls>,
    active: bool,
}

impl PanGesture for CountingPan {
    fn activate(&mut self) {
        self.calls.activate.set(self.calls.activate.get() + 1);
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.calls.deactivate.set(self.calls.deactivate.get() + 1);
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

fn create_test_controller(
    tool_on_load: CursorTool,
) -> (EventLoop, CursorToolController<CountingPan>, Rc<PanCalls>) {
    let event_loop = EventLoop::new();
    let calls = Rc::new(PanCalls::default());
    let pan = CountingPan {
        calls: calls.clone(),
        active: false,
    };
    let controller = CursorToolController::with_pan_handler(
        pan,
        event_loop.bus().clone(),
        event_loop.tasks(),
        tool_on_load,
    );
    event_loop.settle();
    (event_loop, controller, calls)
}

fn record(event_loop: &EventLoop, kind: EventKind) -> Rc<RefCell<Vec<ViewerEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    event_loop
        .bus()
        .subscribe(kind, move |event| sink.borrow_mut().push(event.clone()));
    seen
}

/// Records every published notification in order, as (event name, tool).
fn record_notifications(event_loop: &EventLoop) -> Rc<RefCell<Vec<(&'static str, CursorTool)>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    for kind in [EventKind::CursorToolChanged, EventKind::HandCursorToolToggled] {
        let sink = seen.clone();
        event_loop.bus().subscribe(kind, move |event| {
            if let Some(tool) = event.tool() {
                sink.borrow_mut().push((event.kind().name(), tool));
            }
        });
    }
    seen
}

fn reset(calls: &PanCalls) {
    calls.activate.set(0);
    calls.deactivate.set(0);
}

fn present(event_loop: &EventLoop, state: PresentationModeState) {
    event_loop.post(ViewerEvent::PresentationModeChanged { state });
}

#[test]
fn test_initial_tool_is_select() {
    let (_event_loop, controller, calls) = create_test_controller(CursorTool::Select);
    assert_eq!(controller.active_tool(), CursorTool::Select);
    assert!(!controller.is_presenting());
    assert_eq!(calls.activate.get(), 0);
}

#[test]
fn test_switch_to_active_tool_is_noop() {
    let (event_loop, controller, calls) = create_test_controller(CursorTool::Hand);
    reset(&calls);
    let changed = record(&event_loop, EventKind::CursorToolChanged);

    assert_eq!(controller.switch_tool(CursorTool::Hand), SwitchOutcome::Unchanged);
    event_loop.post(ViewerEvent::SwitchCursorTool {
        tool: CursorTool::Hand,
    });

    assert_eq!(calls.activate.get(), 0);
    assert_eq!(calls.deactivate.get(), 0);
    assert!(changed.borrow().is_empty());
}

#[test]
fn test_select_to_hand_activates_pan_once() {
    let (_event_loop, controller, calls) = create_test_controller(CursorTool::Select);

    let outcome = controller.switch_tool(CursorTool::Hand);
    assert_eq!(
        outcome,
        SwitchOutcome::Switched {
            from: CursorTool::Select,
            to: CursorTool::Hand
        }
    );
    assert_eq!(calls.activate.get(), 1);
    assert_eq!(calls.deactivate.get(), 0);
}

#[test]
fn test_hand_to_select_deactivates_pan_once() {
    let (_event_loop, controller, calls) = create_test_controller(CursorTool::Hand);
    reset(&calls);

    assert!(controller.switch_tool(CursorTool::Select).is_switched());
    assert_eq!(calls.activate.get(), 0);
    assert_eq!(calls.deactivate.get(), 1);
}

#[test]
fn test_switch_publishes_cursor_tool_changed() {
    let (event_loop, controller, _calls) = create_test_controller(CursorTool::Select);
    let changed = record(&event_loop, EventKind::CursorToolChanged);

    event_loop.post(ViewerEvent::SwitchCursorTool {
        tool: CursorTool::Hand,
    });

    assert_eq!(controller.active_tool(), CursorTool::Hand);
    assert_eq!(
        *changed.borrow(),
        vec![ViewerEvent::CursorToolChanged {
            source: controller.source_id(),
            tool: CursorTool::Hand,
        }]
    );
}

#[test]
fn test_zoom_is_rejected_without_side_effects() {
    let (event_loop, controller, calls) = create_test_controller(CursorTool::Hand);
    reset(&calls);
    let changed = record(&event_loop, EventKind::CursorToolChanged);

    let outcome = controller.switch_tool(CursorTool::Zoom);

    assert_eq!(
        outcome,
        SwitchOutcome::Rejected(ToolError::Unsupported(CursorTool::Zoom))
    );
    assert_eq!(controller.active_tool(), CursorTool::Hand);
    assert!(changed.borrow().is_empty());
    // The pan handler stays engaged for the still-active hand tool.
    assert_eq!(calls.deactivate.get(), 0);
    assert_eq!(calls.activate.get(), 0);
}

#[test]
fn test_zoom_request_over_bus_is_dropped() {
    let (event_loop, controller, _calls) = create_test_controller(CursorTool::Select);
    let changed = record(&event_loop, EventKind::CursorToolChanged);

    event_loop.post(ViewerEvent::SwitchCursorTool {
        tool: CursorTool::Zoom,
    });

    assert_eq!(controller.active_tool(), CursorTool::Select);
    assert!(changed.borrow().is_empty());

    // Controller stays usable afterwards.
    event_loop.post(ViewerEvent::SwitchCursorTool {
        tool: CursorTool::Hand,
    });
    assert_eq!(controller.active_tool(), CursorTool::Hand);
}

#[test]
fn test_zoom_on_load_keeps_select() {
    let (_event_loop, controller, calls) = create_test_controller(CursorTool::Zoom);
    assert_eq!(controller.active_tool(), CursorTool::Select);
    assert_eq!(calls.activate.get(), 0);
}

#[test]
fn test_toggle_from_select() {
    let (event_loop, controller, _calls) = create_test_controller(CursorTool::Select);
    let seen = record_notifications(&event_loop);

    event_loop.post(ViewerEvent::ToggleHandCursorTool);

    assert_eq!(controller.active_tool(), CursorTool::Hand);
    assert_eq!(
        *seen.borrow(),
        vec![
            ("cursortoolchanged", CursorTool::Hand),
            ("handcursortooltoggled", CursorTool::Hand),
        ]
    );
}

#[test]
fn test_toggle_from_hand() {
    let (event_loop, controller, _calls) = create_test_controller(CursorTool::Hand);
    let seen = record_notifications(&event_loop);

    event_loop.post(ViewerEvent::ToggleHandCursorTool);

    assert_eq!(controller.active_tool(), CursorTool::Select);
    assert_eq!(
        *seen.borrow(),
        vec![
            ("cursortoolchanged", CursorTool::Select),
            ("handcursortooltoggled", CursorTool::Select),
        ]
    );
}

#[test]
fn test_toggle_source_is_controller() {
    let (event_loop, controller, _calls) = create_test_controller(CursorTool::Select);
    let toggled = record(&event_loop, EventKind::HandCursorToolToggled);

    event_loop.post(ViewerEvent::ToggleHandCursorTool);

    assert_eq!(
        *toggled.borrow(),
        vec![ViewerEvent::HandCursorToolToggled {
            source: controller.source_id(),
            tool: CursorTool::Hand,
        }]
    );
}

#[test]
fn test_fullscreen_forces_select_and_blocks_switching() {
    let (event_loop, controller, calls) = create_test_controller(CursorTool::Hand);
    reset(&calls);

    present(&event_loop, PresentationModeState::Fullscreen);
    assert!(controller.is_presenting());
    assert_eq!(controller.active_tool(), CursorTool::Select);
    assert_eq!(calls.deactivate.get(), 1);

    let seen = record_notifications(&event_loop);
    event_loop.post(ViewerEvent::SwitchCursorTool {
        tool: CursorTool::Hand,
    });
    event_loop.post(ViewerEvent::ToggleHandCursorTool);

    assert_eq!(controller.active_tool(), CursorTool::Select);
    assert_eq!(controller.switch_tool(CursorTool::Hand), SwitchOutcome::Suppressed);
    assert_eq!(calls.activate.get(), 0);
    // The toggle still announces the unchanged tool.
    assert_eq!(
        *seen.borrow(),
        vec![("handcursortooltoggled", CursorTool::Select)]
    );
}

#[test]
fn test_presentation_round_trip_restores_hand() {
    let (event_loop, controller, _calls) = create_test_controller(CursorTool::Hand);
    let seen = record_notifications(&event_loop);

    present(&event_loop, PresentationModeState::Fullscreen);
    present(&event_loop, PresentationModeState::Normal);

    assert_eq!(controller.active_tool(), CursorTool::Hand);
    assert!(!controller.is_presenting());
    assert_eq!(
        *seen.borrow(),
        vec![
            ("cursortoolchanged", CursorTool::Select),
            ("cursortoolchanged", CursorTool::Hand),
        ]
    );

    // Switching works again once presentation mode has ended.
    assert!(controller.switch_tool(CursorTool::Select).is_switched());
}

#[test]
fn test_presentation_round_trip_from_select_is_silent() {
    let (event_loop, controller, calls) = create_test_controller(CursorTool::Select);
    let changed = record(&event_loop, EventKind::CursorToolChanged);

    present(&event_loop, PresentationModeState::Fullscreen);
    assert!(controller.is_presenting());
    present(&event_loop, PresentationModeState::Normal);

    assert!(!controller.is_presenting());
    assert_eq!(controller.active_tool(), CursorTool::Select);
    assert!(changed.borrow().is_empty());
    assert_eq!(calls.activate.get(), 0);
    assert_eq!(calls.deactivate.get(), 0);
}

#[test]
fn test_repeated_fullscreen_keeps_original_saved_tool() {
    let (event_loop, controller, _calls) = create_test_controller(CursorTool::Hand);

    present(&event_loop, PresentationModeState::Fullscreen);
    present(&event_loop, PresentationModeState::Fullscreen);
    present(&event_loop, PresentationModeState::Normal);

    assert_eq!(controller.active_tool(), CursorTool::Hand);
}

#[test]
fn test_listener_reentering_fullscreen_during_restore_stays_presenting() {
    let (event_loop, controller, _calls) = create_test_controller(CursorTool::Hand);
    present(&event_loop, PresentationModeState::Fullscreen);

    let bus = event_loop.bus().clone();
    event_loop
        .bus()
        .subscribe_once(EventKind::CursorToolChanged, move |_| {
            bus.dispatch(ViewerEvent::PresentationModeChanged {
                state: PresentationModeState::Fullscreen,
            });
        });

    present(&event_loop, PresentationModeState::Normal);

    assert!(controller.is_presenting());
    assert_eq!(controller.active_tool(), CursorTool::Select);

    // The nested fullscreen saved the restored hand tool.
    present(&event_loop, PresentationModeState::Normal);
    assert!(!controller.is_presenting());
    assert_eq!(controller.active_tool(), CursorTool::Hand);
}

#[test]
fn test_switch_requested_during_restore_is_not_suppressed() {
    let (event_loop, controller, _calls) = create_test_controller(CursorTool::Hand);
    present(&event_loop, PresentationModeState::Fullscreen);

    let bus = event_loop.bus().clone();
    event_loop
        .bus()
        .subscribe_once(EventKind::CursorToolChanged, move |_| {
            bus.dispatch(ViewerEvent::SwitchCursorTool {
                tool: CursorTool::Select,
            });
        });

    present(&event_loop, PresentationModeState::Normal);

    assert!(!controller.is_presenting());
    assert_eq!(controller.active_tool(), CursorTool::Select);
}

#[test]
fn test_normal_without_fullscreen_is_noop() {
    let (event_loop, controller, _calls) = create_test_controller(CursorTool::Hand);
    let changed = record(&event_loop, EventKind::CursorToolChanged);

    present(&event_loop, PresentationModeState::Normal);

    assert_eq!(controller.active_tool(), CursorTool::Hand);
    assert!(changed.borrow().is_empty());
}

#[test]
fn test_other_presentation_states_are_ignored() {
    let (event_loop, controller, _calls) = create_test_controller(CursorTool::Hand);

    present(&event_loop, PresentationModeState::Changing);
    present(&event_loop, PresentationModeState::Unknown);

    assert_eq!(controller.active_tool(), CursorTool::Hand);
    assert!(!controller.is_presenting());
}

#[test]
fn test_deferred_initial_switch_reaches_late_subscriber() {
    let event_loop = EventLoop::new();
    let calls = Rc::new(PanCalls::default());
    let controller = CursorToolController::with_pan_handler(
        CountingPan {
            calls: calls.clone(),
            active: false,
        },
        event_loop.bus().clone(),
        event_loop.tasks(),
        CursorTool::Hand,
    );

    // Nothing happens until the current phase completes.
    assert_eq!(controller.active_tool(), CursorTool::Select);
    let changed = record(&event_loop, EventKind::CursorToolChanged);
    assert!(changed.borrow().is_empty());

    event_loop.settle();

    assert_eq!(controller.active_tool(), CursorTool::Hand);
    assert_eq!(
        *changed.borrow(),
        vec![ViewerEvent::CursorToolChanged {
            source: controller.source_id(),
            tool: CursorTool::Hand,
        }]
    );
    assert_eq!(calls.activate.get(), 1);
}

#[test]
fn test_deferred_initial_switch_runs_before_first_input() {
    let event_loop = EventLoop::new();
    let controller = CursorToolController::with_pan_handler(
        CountingPan {
            calls: Rc::new(PanCalls::default()),
            active: false,
        },
        event_loop.bus().clone(),
        event_loop.tasks(),
        CursorTool::Hand,
    );

    // The toggle sees the hand tool already active and flips back to select.
    event_loop.post(ViewerEvent::ToggleHandCursorTool);
    assert_eq!(controller.active_tool(), CursorTool::Select);
}

#[test]
fn test_listener_can_query_controller_during_notification() {
    let (event_loop, controller, _calls) = create_test_controller(CursorTool::Select);
    let controller = Rc::new(controller);
    let observed = Rc::new(Cell::new(None));

    let weak = Rc::downgrade(&controller);
    let sink = observed.clone();
    event_loop
        .bus()
        .subscribe(EventKind::CursorToolChanged, move |_| {
            if let Some(controller) = weak.upgrade() {
                sink.set(Some(controller.active_tool()));
            }
        });

    event_loop.post(ViewerEvent::SwitchCursorTool {
        tool: CursorTool::Hand,
    });
    assert_eq!(observed.get(), Some(CursorTool::Hand));
}

#[test]
fn test_drop_unsubscribes_listeners() {
    let (event_loop, controller, _calls) = create_test_controller(CursorTool::Select);
    assert_eq!(event_loop.bus().listener_count(EventKind::SwitchCursorTool), 1);

    drop(controller);

    assert_eq!(event_loop.bus().listener_count(EventKind::SwitchCursorTool), 0);
    assert_eq!(
        event_loop.bus().listener_count(EventKind::PresentationModeChanged),
        0
    );
}

#[test]
fn test_grab_to_pan_follows_hand_tool() {
    let event_loop = EventLoop::new();
    let surface = Rc::new(RefCell::new(Surface::new(800, 600, 800, 2400)));
    let controller = CursorToolController::new(CursorToolOptions {
        container: surface.clone(),
        event_bus: event_loop.bus().clone(),
        task_queue: event_loop.tasks().clone(),
        cursor_tool_on_load: CursorTool::Hand,
    });
    event_loop.settle();
    assert_eq!(surface.borrow().cursor, CursorStyle::Grab);

    assert!(controller.handle_pointer(PointerEvent::Press {
        button: MouseButton::Left,
        x: 10,
        y: 300,
    }));
    controller.handle_pointer(PointerEvent::Motion { x: 10, y: 100 });
    controller.handle_pointer(PointerEvent::Release {
        button: MouseButton::Left,
        x: 10,
        y: 100,
    });
    assert_eq!(surface.borrow().scroll_top, 200);

    present(&event_loop, PresentationModeState::Fullscreen);
    assert_eq!(surface.borrow().cursor, CursorStyle::Default);
    assert!(!controller.handle_pointer(PointerEvent::Press {
        button: MouseButton::Left,
        x: 0,
        y: 0,
    }));

    present(&event_loop, PresentationModeState::Normal);
    assert_eq!(surface.borrow().cursor, CursorStyle::Grab);
}

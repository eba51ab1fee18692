//! Grab-to-pan gesture over a scrollable surface.
//!
//! While active, pressing the primary button over the surface grabs the
//! document; dragging scrolls it opposite to the pointer motion, the same way
//! a hand pushes a sheet of paper.

use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

/// Pointer cursor shown over the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    /// Open hand: panning available
    Grab,
    /// Closed hand: drag in progress
    Grabbing,
}

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Primary button (starts a pan)
    Left,
    Right,
    Middle,
}

/// Pointer input delivered to the surface, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Press { button: MouseButton, x: i32, y: i32 },
    Motion { x: i32, y: i32 },
    Release { button: MouseButton, x: i32, y: i32 },
}

/// Scroll container hosting the document pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    /// Horizontal scroll offset
    pub scroll_left: i32,
    /// Vertical scroll offset
    pub scroll_top: i32,
    /// Visible viewport width
    pub client_width: i32,
    /// Visible viewport height
    pub client_height: i32,
    /// Full content width
    pub scroll_width: i32,
    /// Full content height
    pub scroll_height: i32,
    /// Cursor currently shown over the surface
    pub cursor: CursorStyle,
}

impl Surface {
    pub fn new(client_width: i32, client_height: i32, scroll_width: i32, scroll_height: i32) -> Self {
        Self {
            scroll_left: 0,
            scroll_top: 0,
            client_width,
            client_height,
            scroll_width,
            scroll_height,
            cursor: CursorStyle::Default,
        }
    }

    pub fn max_scroll_left(&self) -> i32 {
        (self.scroll_width - self.client_width).max(0)
    }

    pub fn max_scroll_top(&self) -> i32 {
        (self.scroll_height - self.client_height).max(0)
    }

    /// Scrolls to the given offsets, clamped to the content extent.
    pub fn scroll_to(&mut self, left: i32, top: i32) {
        self.scroll_left = left.clamp(0, self.max_scroll_left());
        self.scroll_top = top.clamp(0, self.max_scroll_top());
    }
}

/// Capability the cursor tool controller needs from a pan gesture handler.
pub trait PanGesture {
    /// Starts listening for pan gestures.
    fn activate(&mut self);

    /// Stops listening and ends any drag in progress.
    fn deactivate(&mut self);

    fn is_active(&self) -> bool;

    /// Offers pointer input to the handler. Returns true if it was consumed.
    fn handle_pointer(&mut self, _event: PointerEvent) -> bool {
        false
    }
}

/// Where a drag started: pointer position and scroll offsets at press time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragOrigin {
    x: i32,
    y: i32,
    scroll_left: i32,
    scroll_top: i32,
}

/// Click-and-drag panning bound to one [`Surface`].
#[derive(Debug)]
pub struct GrabToPan {
    surface: Rc<RefCell<Surface>>,
    active: bool,
    drag: Option<DragOrigin>,
}

impl GrabToPan {
    pub fn new(surface: Rc<RefCell<Surface>>) -> Self {
        Self {
            surface,
            active: false,
            drag: None,
        }
    }

    pub fn toggle(&mut self) {
        if self.active {
            self.deactivate();
        } else {
            self.activate();
        }
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn start_drag(&mut self, x: i32, y: i32) {
        let mut surface = self.surface.borrow_mut();
        self.drag = Some(DragOrigin {
            x,
            y,
            scroll_left: surface.scroll_left,
            scroll_top: surface.scroll_top,
        });
        surface.cursor = CursorStyle::Grabbing;
    }

    fn end_drag(&mut self) {
        if self.drag.take().is_some() {
            let mut surface = self.surface.borrow_mut();
            surface.cursor = if self.active {
                CursorStyle::Grab
            } else {
                CursorStyle::Default
            };
        }
    }
}

impl PanGesture for GrabToPan {
    fn activate(&mut self) {
        if !self.active {
            self.active = true;
            self.surface.borrow_mut().cursor = CursorStyle::Grab;
            debug!("Grab-to-pan activated");
        }
    }

    fn deactivate(&mut self) {
        if self.active {
            self.active = false;
            self.drag = None;
            self.surface.borrow_mut().cursor = CursorStyle::Default;
            debug!("Grab-to-pan deactivated");
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        if !self.active {
            return false;
        }

        match event {
            PointerEvent::Press {
                button: MouseButton::Left,
                x,
                y,
            } => {
                self.start_drag(x, y);
                true
            }
            PointerEvent::Motion { x, y } => {
                let Some(origin) = self.drag else {
                    return false;
                };
                self.surface.borrow_mut().scroll_to(
                    origin.scroll_left - (x - origin.x),
                    origin.scroll_top - (y - origin.y),
                );
                true
            }
            PointerEvent::Release {
                button: MouseButton::Left,
                ..
            } => {
                let was_dragging = self.is_dragging();
                self.end_drag();
                was_dragging
            }
            PointerEvent::Press { .. } | PointerEvent::Release { .. } => false,
        }
    }
}

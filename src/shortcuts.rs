//! Keyboard shortcut routing.
//!
//! Translates key presses into the viewer events the cursor tool controller
//! listens for, using the configured keybinding map.

use crate::config::{Action, KeyBinding};
use crate::events::{PresentationModeState, ViewerEvent};
use crate::tool::CursorTool;
use log::debug;
use std::collections::HashMap;

/// Maps key presses to viewer events.
///
/// Presentation mode is owned by the host viewer. The router follows the
/// presentation state it requests and the state it is told about through
/// [`Shortcuts::on_presentation_mode_changed`], so the toggle shortcut
/// always asks for the opposite of the current mode.
#[derive(Debug)]
pub struct Shortcuts {
    action_map: HashMap<KeyBinding, Action>,
    presenting: bool,
}

impl Shortcuts {
    pub fn new(action_map: HashMap<KeyBinding, Action>) -> Self {
        Self {
            action_map,
            presenting: false,
        }
    }

    /// Looks up the action bound to `binding`, if any.
    pub fn find_action(&self, binding: &KeyBinding) -> Option<Action> {
        self.action_map.get(binding).copied()
    }

    /// Records a presentation mode change that did not come from a shortcut.
    pub fn on_presentation_mode_changed(&mut self, state: PresentationModeState) {
        match state {
            PresentationModeState::Fullscreen => self.presenting = true,
            PresentationModeState::Normal => self.presenting = false,
            PresentationModeState::Unknown | PresentationModeState::Changing => {}
        }
    }

    /// Resolves a key press into the event to publish.
    pub fn on_key_press(&mut self, binding: &KeyBinding) -> Option<ViewerEvent> {
        let Some(action) = self.find_action(binding) else {
            debug!("No action bound to {binding}");
            return None;
        };
        Some(self.handle_action(action))
    }

    fn handle_action(&mut self, action: Action) -> ViewerEvent {
        match action {
            Action::SelectTool => ViewerEvent::SwitchCursorTool {
                tool: CursorTool::Select,
            },
            Action::HandTool => ViewerEvent::SwitchCursorTool {
                tool: CursorTool::Hand,
            },
            Action::ToggleHandTool => ViewerEvent::ToggleHandCursorTool,
            Action::TogglePresentation => {
                self.presenting = !self.presenting;
                let state = if self.presenting {
                    PresentationModeState::Fullscreen
                } else {
                    PresentationModeState::Normal
                };
                ViewerEvent::PresentationModeChanged { state }
            }
        }
    }
}

//! Scripted input replay.
//!
//! Drives a cursor tool controller from a line-oriented script and reports
//! every notification it publishes. One command per line:
//!
//! ```text
//! switch hand              # request a tool
//! toggle-hand              # flip hand/select
//! presentation fullscreen  # fullscreen | normal | changing | unknown
//! key Ctrl+H               # press a bound shortcut
//! drag 10 300 10 100       # primary-button drag from (x0, y0) to (x1, y1)
//! status                   # print the active tool
//! ```

use crate::bus::EventLoop;
use crate::config::{Config, KeyBinding};
use crate::controller::{CursorToolController, CursorToolOptions};
use crate::events::{EventKind, PresentationModeState, ViewerEvent};
use crate::pan::{MouseButton, PointerEvent, Surface};
use crate::shortcuts::Shortcuts;
use crate::tool::{CursorTool, ToolError};
use anyhow::{Context, Result};
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;
use thiserror::Error;

/// Problems found while parsing a script line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid argument '{0}'")]
    InvalidArgument(String),

    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// A parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Switch(CursorTool),
    ToggleHand,
    Presentation(PresentationModeState),
    Key(KeyBinding),
    Drag { from: (i32, i32), to: (i32, i32) },
    Status,
}

impl Command {
    /// Parses one line. Blank lines and comments yield `None`.
    ///
    /// A comment starts at a word beginning with `#`, so `key Shift+#` is
    /// still a key binding.
    pub fn parse(line: &str) -> Result<Option<Self>, ScriptError> {
        let mut words = line
            .split_whitespace()
            .take_while(|word| !word.starts_with('#'));
        let Some(name) = words.next() else {
            return Ok(None);
        };

        let command = match name.to_lowercase().as_str() {
            "switch" => {
                let tool = words.next().ok_or(ScriptError::MissingArgument {
                    command: "switch",
                    expected: "a tool name",
                })?;
                Self::Switch(tool.parse()?)
            }
            "toggle-hand" => Self::ToggleHand,
            "presentation" => {
                let state = words.next().ok_or(ScriptError::MissingArgument {
                    command: "presentation",
                    expected: "a mode state",
                })?;
                let state: PresentationModeState = state
                    .parse()
                    .map_err(|_| ScriptError::InvalidArgument(state.to_string()))?;
                Self::Presentation(state)
            }
            "key" => {
                // Bindings may contain spaces ("Ctrl + H").
                let rest: Vec<&str> = words.by_ref().collect();
                if rest.is_empty() {
                    return Err(ScriptError::MissingArgument {
                        command: "key",
                        expected: "a key binding",
                    });
                }
                let binding = KeyBinding::parse(&rest.join(" "))
                    .map_err(ScriptError::InvalidArgument)?;
                Self::Key(binding)
            }
            "drag" => {
                let mut coords = [0i32; 4];
                for slot in coords.iter_mut() {
                    let word = words.next().ok_or(ScriptError::MissingArgument {
                        command: "drag",
                        expected: "four coordinates",
                    })?;
                    *slot = word
                        .parse()
                        .map_err(|_| ScriptError::InvalidArgument(word.to_string()))?;
                }
                Self::Drag {
                    from: (coords[0], coords[1]),
                    to: (coords[2], coords[3]),
                }
            }
            "status" => Self::Status,
            _ => return Err(ScriptError::UnknownCommand(name.to_string())),
        };

        if let Some(extra) = words.next() {
            return Err(ScriptError::InvalidArgument(extra.to_string()));
        }

        Ok(Some(command))
    }
}

/// Controller wired to an event loop, a replay surface, and an output sink.
pub struct Replayer<W: Write> {
    event_loop: EventLoop,
    controller: CursorToolController,
    surface: Rc<RefCell<Surface>>,
    shortcuts: Shortcuts,
    notifications: Rc<RefCell<Vec<String>>>,
    out: W,
}

impl<W: Write> Replayer<W> {
    /// Builds the controller and settles initialization, reporting the
    /// initial tool switch (if any) before returning.
    pub fn new(config: &Config, tool_override: Option<CursorTool>, out: W) -> Result<Self> {
        let surface = Rc::new(RefCell::new(Surface::new(
            config.surface.width,
            config.surface.height,
            config.surface.content_width,
            config.surface.content_height,
        )));
        let event_loop = EventLoop::new();

        let controller = CursorToolController::new(CursorToolOptions {
            container: surface.clone(),
            event_bus: event_loop.bus().clone(),
            task_queue: event_loop.tasks().clone(),
            cursor_tool_on_load: tool_override.unwrap_or_else(|| config.viewer.initial_tool()),
        });

        // Subscribed after the controller on purpose: the deferred initial
        // switch must still be reported.
        let notifications = Rc::new(RefCell::new(Vec::new()));
        for kind in [EventKind::CursorToolChanged, EventKind::HandCursorToolToggled] {
            let sink = notifications.clone();
            event_loop.bus().subscribe(kind, move |event: &ViewerEvent| {
                if let Some(tool) = event.tool() {
                    sink.borrow_mut()
                        .push(format!("{} tool={}", event.kind().name(), tool));
                }
            });
        }

        let action_map = config
            .keybindings
            .build_action_map()
            .map_err(|err| anyhow::anyhow!(err))
            .context("Invalid keybindings")?;

        let mut replayer = Self {
            event_loop,
            controller,
            surface,
            shortcuts: Shortcuts::new(action_map),
            notifications,
            out,
        };

        replayer.event_loop.settle();
        replayer.flush()?;
        Ok(replayer)
    }

    pub fn controller(&self) -> &CursorToolController {
        &self.controller
    }

    /// Runs every line of `reader`, stopping at the first hard error.
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for (index, line) in reader.lines().enumerate() {
            let line = line.context("Failed to read script")?;
            self.run_line(index + 1, &line)?;
        }
        self.event_loop.settle();
        self.flush()
    }

    /// Runs one script line. Unknown tool names are logged and skipped;
    /// other parse errors are fatal.
    pub fn run_line(&mut self, line_no: usize, line: &str) -> Result<()> {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(()),
            Err(ScriptError::Tool(err)) => {
                log::error!("line {line_no}: {err}, ignoring request");
                return Ok(());
            }
            Err(err) => return Err(anyhow::anyhow!("line {line_no}: {err}")),
        };

        self.execute(command)?;
        self.flush()
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Switch(tool) => {
                self.event_loop.post(ViewerEvent::SwitchCursorTool { tool });
            }
            Command::ToggleHand => {
                self.event_loop.post(ViewerEvent::ToggleHandCursorTool);
            }
            Command::Presentation(state) => {
                self.shortcuts.on_presentation_mode_changed(state);
                self.event_loop
                    .post(ViewerEvent::PresentationModeChanged { state });
            }
            Command::Key(binding) => {
                if let Some(event) = self.shortcuts.on_key_press(&binding) {
                    self.event_loop.post(event);
                }
            }
            Command::Drag { from, to } => {
                self.event_loop.settle();
                let consumed = self.controller.handle_pointer(PointerEvent::Press {
                    button: MouseButton::Left,
                    x: from.0,
                    y: from.1,
                });
                self.controller
                    .handle_pointer(PointerEvent::Motion { x: to.0, y: to.1 });
                self.controller.handle_pointer(PointerEvent::Release {
                    button: MouseButton::Left,
                    x: to.0,
                    y: to.1,
                });
                let surface = self.surface.borrow();
                writeln!(
                    self.out,
                    "drag panned={} scroll={},{}",
                    consumed, surface.scroll_left, surface.scroll_top
                )?;
            }
            Command::Status => {
                self.event_loop.settle();
                writeln!(
                    self.out,
                    "active={} presenting={}",
                    self.controller.active_tool(),
                    self.controller.is_presenting()
                )?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        for line in self.notifications.borrow_mut().drain(..) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Consumes the replayer, returning the output sink.
    pub fn into_output(self) -> W {
        self.out
    }
}

//! Cursor tool selection.

use thiserror::Error;

/// Cursor tool applied to pointer input over the document surface.
///
/// Numeric ids follow the viewer convention (`Select = 0`, `Hand = 1`,
/// `Zoom = 2`) so tool values can travel through integer-typed preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorTool {
    /// Text selection (default)
    #[default]
    Select,
    /// Click-and-drag panning
    Hand,
    /// Zoom by pointer. Declared but has no activation behavior yet.
    Zoom,
}

impl CursorTool {
    /// All declared tools, in id order.
    pub const ALL: [CursorTool; 3] = [Self::Select, Self::Hand, Self::Zoom];

    /// Stable lowercase name used in config files and event output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Hand => "hand",
            Self::Zoom => "zoom",
        }
    }

    /// Numeric id of this tool.
    pub fn id(&self) -> i64 {
        match self {
            Self::Select => 0,
            Self::Hand => 1,
            Self::Zoom => 2,
        }
    }
}

impl std::fmt::Display for CursorTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for CursorTool {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "select" => Ok(Self::Select),
            "hand" => Ok(Self::Hand),
            "zoom" => Ok(Self::Zoom),
            _ => Err(ToolError::UnknownName(s.to_string())),
        }
    }
}

impl TryFrom<i64> for CursorTool {
    type Error = ToolError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Self::Select),
            1 => Ok(Self::Hand),
            2 => Ok(Self::Zoom),
            other => Err(ToolError::UnknownId(other)),
        }
    }
}

/// Errors raised while resolving or activating a cursor tool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("cursor tool '{0}' is not supported")]
    Unsupported(CursorTool),

    #[error("unknown cursor tool name '{0}'")]
    UnknownName(String),

    #[error("unknown cursor tool id {0}")]
    UnknownId(i64),
}

//! Configuration type definitions.

use crate::tool::CursorTool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Viewer defaults.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ViewerConfig {
    /// Tool activated once the document has loaded (select, hand, zoom).
    /// Unknown names fall back to "select".
    #[serde(default = "default_cursor_tool_on_load")]
    pub cursor_tool_on_load: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            cursor_tool_on_load: default_cursor_tool_on_load(),
        }
    }
}

impl ViewerConfig {
    /// The configured load tool, or select if the name is not recognized.
    pub fn initial_tool(&self) -> CursorTool {
        self.cursor_tool_on_load.parse().unwrap_or_else(|err| {
            log::warn!("{err}, using select");
            CursorTool::Select
        })
    }
}

/// Geometry of the scroll container used when replaying input.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SurfaceConfig {
    /// Viewport width in pixels (minimum 1)
    #[serde(default = "default_surface_width")]
    pub width: i32,

    /// Viewport height in pixels (minimum 1)
    #[serde(default = "default_surface_height")]
    pub height: i32,

    /// Document width in pixels (at least the viewport width)
    #[serde(default = "default_content_width")]
    pub content_width: i32,

    /// Document height in pixels (at least the viewport height)
    #[serde(default = "default_content_height")]
    pub content_height: i32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: default_surface_width(),
            height: default_surface_height(),
            content_width: default_content_width(),
            content_height: default_content_height(),
        }
    }
}

fn default_cursor_tool_on_load() -> String {
    "select".to_string()
}

fn default_surface_width() -> i32 {
    800
}

fn default_surface_height() -> i32 {
    600
}

fn default_content_width() -> i32 {
    1600
}

// Roughly four letter-size pages at 96 dpi
fn default_content_height() -> i32 {
    4224
}

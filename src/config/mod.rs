//! Configuration file support for the cursor tool driver.
//!
//! Settings are read from `~/.config/viewer-cursor-tools/config.toml` (or an
//! explicit path). They cover the tool activated when a document loads, the
//! keyboard shortcuts that drive the tools, and the size of the replay
//! surface used by the `cursor-tools` binary.
//!
//! If no config file exists, defaults are used.

pub mod keybindings;
pub mod types;

pub use keybindings::{Action, KeyBinding, KeybindingsConfig};
pub use types::{SurfaceConfig, ViewerConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the user's config directory.
const CONFIG_DIR_NAME: &str = "viewer-cursor-tools";

/// Root configuration structure.
///
/// # Example TOML
/// ```toml
/// [viewer]
/// cursor_tool_on_load = "hand"
///
/// [surface]
/// width = 1024
/// height = 768
///
/// [keybindings]
/// select_tool = ["S"]
/// hand_tool = ["H"]
/// ```
#[derive(Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Viewer defaults
    #[serde(default)]
    pub viewer: ViewerConfig,

    /// Replay surface geometry
    #[serde(default)]
    pub surface: SurfaceConfig,

    /// Keyboard shortcuts
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

impl Config {
    /// Replaces out-of-range values with usable ones, logging a warning for each.
    fn validate_and_clamp(&mut self) {
        let tool = self.viewer.cursor_tool_on_load.to_lowercase();
        if !matches!(tool.as_str(), "select" | "hand" | "zoom") {
            log::warn!(
                "Invalid cursor_tool_on_load '{}', falling back to 'select'",
                self.viewer.cursor_tool_on_load
            );
            self.viewer.cursor_tool_on_load = "select".to_string();
        }

        if self.surface.width < 1 || self.surface.height < 1 {
            log::warn!(
                "Invalid surface size {}x{}, clamping to at least 1x1",
                self.surface.width,
                self.surface.height
            );
            self.surface.width = self.surface.width.max(1);
            self.surface.height = self.surface.height.max(1);
        }

        // Content never smaller than the viewport.
        if self.surface.content_width < self.surface.width {
            self.surface.content_width = self.surface.width;
        }
        if self.surface.content_height < self.surface.height {
            self.surface.content_height = self.surface.height;
        }
    }

    /// Returns the path to the default configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir.join("config.toml"))
    }

    /// Loads the default configuration file, or defaults if it does not exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// contains invalid keybindings.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config.validate_and_clamp();

        // Surface keybinding mistakes at load time rather than on first key press.
        config
            .keybindings
            .build_action_map()
            .map_err(|err| anyhow::anyhow!(err))
            .with_context(|| format!("Invalid keybindings in {}", path.display()))?;

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

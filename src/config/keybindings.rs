//! Keybinding configuration types and parsing.
//!
//! Users bind viewer actions to key combinations in config.toml:
//! ```toml
//! [keybindings]
//! select_tool = ["S"]
//! hand_tool = ["H"]
//! toggle_hand_tool = ["Ctrl+H"]
//! toggle_presentation = ["Ctrl+Alt+P", "F5"]
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SelectTool,
    HandTool,
    ToggleHandTool,
    TogglePresentation,
}

/// A key with optional modifiers.
///
/// Single-character keys are stored uppercased so "h" and "H" bind the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyBinding {
    /// Parses strings like "H", "Ctrl+H", "Ctrl + Alt + P" or "Ctrl++".
    ///
    /// Modifiers may appear in any order. The last `+`-separated part is the key.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty keybinding string".to_string());
        }

        // "+" itself may be the key: "+", "Ctrl++", "Ctrl + +".
        let (modifiers, key) = if s == "+" {
            ("", "+")
        } else if let Some(rest) = s.strip_suffix('+') {
            let rest = rest.trim_end();
            match rest.strip_suffix('+') {
                Some(modifiers) => (modifiers, "+"),
                None => return Err(format!("No key specified in: {}", s)),
            }
        } else {
            match s.rsplit_once('+') {
                Some((modifiers, key)) => (modifiers, key.trim()),
                None => ("", s),
            }
        };

        if key.is_empty() {
            return Err(format!("No key specified in: {}", s));
        }

        let mut binding = Self {
            key: normalize_key(key),
            ctrl: false,
            shift: false,
            alt: false,
        };

        for part in modifiers.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => binding.ctrl = true,
                "shift" => binding.shift = true,
                "alt" => binding.alt = true,
                other => return Err(format!("Unknown modifier '{}' in: {}", other, s)),
            }
        }

        Ok(binding)
    }
}

fn normalize_key(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_uppercase().collect(),
        _ => key.to_string(),
    }
}

impl std::fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        f.write_str(&self.key)
    }
}

/// Configured keybindings, several per action allowed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeybindingsConfig {
    #[serde(default = "default_select_tool")]
    pub select_tool: Vec<String>,

    #[serde(default = "default_hand_tool")]
    pub hand_tool: Vec<String>,

    #[serde(default = "default_toggle_hand_tool")]
    pub toggle_hand_tool: Vec<String>,

    #[serde(default = "default_toggle_presentation")]
    pub toggle_presentation: Vec<String>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            select_tool: default_select_tool(),
            hand_tool: default_hand_tool(),
            toggle_hand_tool: default_toggle_hand_tool(),
            toggle_presentation: default_toggle_presentation(),
        }
    }
}

impl KeybindingsConfig {
    /// Build a lookup map from keybindings to actions.
    /// Returns an error if any keybinding string is invalid or bound twice.
    pub fn build_action_map(&self) -> Result<HashMap<KeyBinding, Action>, String> {
        let mut map = HashMap::new();

        let groups = [
            (&self.select_tool, Action::SelectTool),
            (&self.hand_tool, Action::HandTool),
            (&self.toggle_hand_tool, Action::ToggleHandTool),
            (&self.toggle_presentation, Action::TogglePresentation),
        ];

        for (bindings, action) in groups {
            for binding_str in bindings {
                let binding = KeyBinding::parse(binding_str)?;
                if let Some(existing) = map.insert(binding, action) {
                    return Err(format!(
                        "Duplicate keybinding '{}' assigned to both {:?} and {:?}",
                        binding_str, existing, action
                    ));
                }
            }
        }

        Ok(map)
    }
}

fn default_select_tool() -> Vec<String> {
    vec!["S".to_string()]
}

fn default_hand_tool() -> Vec<String> {
    vec!["H".to_string()]
}

fn default_toggle_hand_tool() -> Vec<String> {
    vec!["Ctrl+H".to_string()]
}

fn default_toggle_presentation() -> Vec<String> {
    vec!["Ctrl+Alt+P".to_string()]
}

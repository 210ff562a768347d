//! Key bindings and the interaction controller.
//!
//! Bindings are plain data built from configuration. The controller looks
//! up each input code and applies the bound action to the viewer state.
//! Unbound codes are ignored here and nowhere else.

use crate::state::ViewerState;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use thermal_common::{ThermalError, ThermalResult};
use tracing::debug;

/// A key press reported by the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputCode {
    Char(char),
    Escape,
    Space,
    Enter,
    Tab,
}

impl FromStr for InputCode {
    type Err = ThermalError;

    /// Parses a single character (case-sensitive) or one of `esc`, `space`,
    /// `enter`, `tab` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return match c {
                ' ' => Ok(InputCode::Space),
                '\t' => Ok(InputCode::Tab),
                c if c.is_control() => Err(ThermalError::Config(format!("unknown key name '{}'", s.escape_debug()))),
                c => Ok(InputCode::Char(c)),
            };
        }

        match s.to_ascii_lowercase().as_str() {
            "esc" | "escape" => Ok(InputCode::Escape),
            "space" => Ok(InputCode::Space),
            "enter" | "return" => Ok(InputCode::Enter),
            "tab" => Ok(InputCode::Tab),
            _ => Err(ThermalError::Config(format!("unknown key name '{}'", s))),
        }
    }
}

impl fmt::Display for InputCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputCode::Char(c) => write!(f, "{}", c),
            InputCode::Escape => f.write_str("esc"),
            InputCode::Space => f.write_str("space"),
            InputCode::Enter => f.write_str("enter"),
            InputCode::Tab => f.write_str("tab"),
        }
    }
}

/// A state transition a key can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    PaletteNext,
    PalettePrev,
    InterpolationNext,
    InterpolationPrev,
    ToggleFilter,
    ToggleOverlay,
    Exit,
}

impl Action {
    pub fn apply(self, state: &mut ViewerState) {
        match self {
            Action::PaletteNext => state.next_palette(),
            Action::PalettePrev => state.prev_palette(),
            Action::InterpolationNext => state.next_interpolation(),
            Action::InterpolationPrev => state.prev_interpolation(),
            Action::ToggleFilter => state.toggle_filter(),
            Action::ToggleOverlay => state.toggle_overlay(),
            Action::Exit => state.request_exit(),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Action::PaletteNext => "next colormap",
            Action::PalettePrev => "previous colormap",
            Action::InterpolationNext => "next interpolation",
            Action::InterpolationPrev => "previous interpolation",
            Action::ToggleFilter => "toggle smoothing filter",
            Action::ToggleOverlay => "toggle info overlay",
            Action::Exit => "exit",
        }
    }
}

/// Mapping from input codes to actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    map: HashMap<InputCode, Action>,
}

impl KeyBindings {
    /// Build from `(code, action)` pairs. A code bound twice is an error.
    pub fn from_pairs<I>(pairs: I) -> ThermalResult<Self>
    where
        I: IntoIterator<Item = (InputCode, Action)>,
    {
        let mut map = HashMap::new();
        for (code, action) in pairs {
            if let Some(previous) = map.insert(code, action) {
                return Err(ThermalError::Config(format!(
                    "key '{}' is bound to both {:?} and {:?}",
                    code, previous, action
                )));
            }
        }
        Ok(Self { map })
    }

    /// Build from configured key names.
    pub fn from_config(bindings: &BTreeMap<String, Action>) -> ThermalResult<Self> {
        let pairs = bindings
            .iter()
            .map(|(name, action)| name.parse::<InputCode>().map(|code| (code, *action)))
            .collect::<ThermalResult<Vec<_>>>()?;
        Self::from_pairs(pairs)
    }

    pub fn action_for(&self, code: InputCode) -> Option<Action> {
        self.map.get(&code).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// One-line summary of every binding, sorted by key.
    pub fn help_text(&self) -> String {
        let mut entries: Vec<_> = self.map.iter().collect();
        entries.sort_by_key(|(code, _)| **code);
        entries
            .into_iter()
            .map(|(code, action)| format!("{}: {}", code, action.description()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let map = default_binding_names()
            .into_iter()
            .filter_map(|(name, action)| name.parse().ok().map(|code| (code, action)))
            .collect();
        Self { map }
    }
}

/// Factory key layout.
pub fn default_binding_names() -> BTreeMap<String, Action> {
    [
        ("d", Action::PaletteNext),
        ("a", Action::PalettePrev),
        ("w", Action::InterpolationNext),
        ("s", Action::InterpolationPrev),
        ("f", Action::ToggleFilter),
        ("i", Action::ToggleOverlay),
        ("esc", Action::Exit),
    ]
    .into_iter()
    .map(|(name, action)| (name.to_string(), action))
    .collect()
}

/// Applies bound actions to the viewer state.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    bindings: KeyBindings,
}

impl InteractionController {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Apply the action bound to `code`, if any.
    pub fn handle(&self, code: InputCode, state: &mut ViewerState) -> Option<Action> {
        let action = self.bindings.action_for(code)?;
        action.apply(state);
        debug!(key = %code, action = ?action, "Handled input");
        Some(action)
    }
}

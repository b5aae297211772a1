//! Key bindings for navigating and tapping sheet rows

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Commands a presented sheet understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetCommand {
    /// Highlight the next tappable row
    Next,
    /// Highlight the previous tappable row
    Previous,
    /// Highlight the first tappable row
    First,
    /// Highlight the last tappable row
    Last,
    /// Tap the highlighted row
    Select,
    /// Tap the cancel button, or close the sheet if it has none
    Cancel,
}

impl SheetCommand {
    pub fn all() -> &'static [SheetCommand] {
        &[
            SheetCommand::Next,
            SheetCommand::Previous,
            SheetCommand::First,
            SheetCommand::Last,
            SheetCommand::Select,
            SheetCommand::Cancel,
        ]
    }
}

/// Mapping from sheet commands to key strings
///
/// Serializes as a JSON object of command name to key list:
///
/// ```
/// use tui_sheet_core::keymap::{Keymap, SheetCommand};
/// use tui_sheet_core::testing::key;
///
/// let user = Keymap::from_json(r#"{ "select": ["space"] }"#).unwrap();
/// let keymap = Keymap::merge(Keymap::default(), user);
///
/// assert_eq!(keymap.command_for(key("space")), Some(SheetCommand::Select));
/// assert_eq!(keymap.command_for(key("j")), Some(SheetCommand::Next));
/// assert_eq!(keymap.command_for(key("enter")), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keymap {
    bindings: HashMap<SheetCommand, Vec<String>>,
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self::empty();
        keymap.bind(SheetCommand::Next, ["j", "down", "tab"]);
        keymap.bind(SheetCommand::Previous, ["k", "up", "shift+tab"]);
        keymap.bind(SheetCommand::First, ["g", "home"]);
        keymap.bind(SheetCommand::Last, ["shift+g", "end"]);
        keymap.bind(SheetCommand::Select, ["enter"]);
        keymap.bind(SheetCommand::Cancel, ["esc", "q"]);
        keymap
    }
}

impl Keymap {
    /// Keymap with no bindings
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replace the keys bound to a command
    pub fn bind<I, S>(&mut self, command: SheetCommand, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bindings
            .insert(command, keys.into_iter().map(Into::into).collect());
    }

    pub fn keys(&self, command: SheetCommand) -> &[String] {
        self.bindings.get(&command).map_or(&[], Vec::as_slice)
    }

    /// Command bound to a key event, if any
    pub fn command_for(&self, key: KeyEvent) -> Option<SheetCommand> {
        SheetCommand::all()
            .iter()
            .copied()
            .find(|command| self.keys(*command).iter().any(|k| key_matches(k, &key)))
    }

    /// First key bound to a command, formatted for a hint line
    pub fn hint(&self, command: SheetCommand) -> Option<String> {
        self.keys(command)
            .first()
            .map(|k| format_key_for_display(k))
    }

    /// Merge user config onto defaults - user config overrides defaults
    pub fn merge(mut defaults: Self, user: Self) -> Self {
        for (command, keys) in user.bindings {
            defaults.bindings.insert(command, keys);
        }
        defaults
    }
}

fn key_matches(binding: &str, key: &KeyEvent) -> bool {
    let Some(parsed) = parse_key_string(binding) else {
        return false;
    };
    // Character keys compare case-insensitively; terminals disagree on
    // whether shift+g arrives as 'g' or 'G' with SHIFT set.
    let codes_match = match (&parsed.code, &key.code) {
        (KeyCode::Char(c1), KeyCode::Char(c2)) => c1.eq_ignore_ascii_case(c2),
        _ => parsed.code == key.code,
    };
    codes_match && parsed.modifiers == key.modifiers
}

/// Parse a key string like "q", "esc", "ctrl+p", "shift+tab" into a KeyEvent
pub fn parse_key_string(key_str: &str) -> Option<KeyEvent> {
    let key_str = key_str.trim().to_lowercase();

    if key_str.is_empty() {
        return None;
    }

    if key_str == "shift+tab" || key_str == "backtab" {
        return Some(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
    }

    let parts: Vec<&str> = key_str.split('+').collect();
    let mut modifiers = KeyModifiers::empty();
    let key_part = parts.last()?.trim();

    for part in &parts[..parts.len() - 1] {
        match part.trim() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => {}
        }
    }

    let code = match key_part {
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        c if c.chars().count() == 1 => KeyCode::Char(c.chars().next()?),
        _ => return None,
    };

    Some(KeyEvent::new(code, modifiers))
}

/// Format a key string for display (e.g., "ctrl+p" -> "^P", "esc" -> "Esc")
pub fn format_key_for_display(key_str: &str) -> String {
    let key_str = key_str.trim().to_lowercase();

    if key_str == "shift+tab" || key_str == "backtab" {
        return "Shift+Tab".to_string();
    }

    let parts: Vec<&str> = key_str.split('+').collect();
    let key_part = parts.last().copied().unwrap_or(key_str.as_str());
    let mut prefix = String::new();
    for part in &parts[..parts.len().saturating_sub(1)] {
        match part.trim() {
            "ctrl" | "control" => prefix.push('^'),
            "shift" => prefix.push_str("Shift+"),
            "alt" => prefix.push_str("Alt+"),
            _ => {}
        }
    }

    let key_display = match key_part {
        "esc" | "escape" => "Esc".to_string(),
        "enter" | "return" => "Enter".to_string(),
        "tab" => "Tab".to_string(),
        "up" => "↑".to_string(),
        "down" => "↓".to_string(),
        "home" => "Home".to_string(),
        "end" => "End".to_string(),
        "space" => "Space".to_string(),
        c if prefix.starts_with('^') => c.to_uppercase(),
        c => c.to_string(),
    };

    format!("{}{}", prefix, key_display)
}

//! Input events a presented sheet reacts to

use crossterm::event::{KeyEvent, KeyModifiers};

/// Event types, used to filter what a component cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Keyboard events
    Key,
    /// Single tap (left mouse press)
    Tap,
    /// Scroll wheel events
    Scroll,
    /// Terminal resize events
    Resize,
    /// Periodic tick
    Tick,
}

/// The event payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Keyboard event
    Key(KeyEvent),
    /// Tap at a terminal cell
    Tap { column: u16, row: u16 },
    /// Scroll event with position and delta
    Scroll { column: u16, row: u16, delta: isize },
    /// Terminal resize
    Resize(u16, u16),
    /// Periodic tick
    Tick,
}

impl EventKind {
    /// Get the event type for this event kind
    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::Key(_) => EventType::Key,
            EventKind::Tap { .. } => EventType::Tap,
            EventKind::Scroll { .. } => EventType::Scroll,
            EventKind::Resize(_, _) => EventType::Resize,
            EventKind::Tick => EventType::Tick,
        }
    }

    /// Whether the host should handle this before the sheet does
    ///
    /// Ctrl+C and resizes belong to the application, not the sheet.
    pub fn is_global(&self) -> bool {
        match self {
            EventKind::Key(key) => {
                use crossterm::event::KeyCode;
                key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c'))
            }
            EventKind::Resize(_, _) => true,
            _ => false,
        }
    }
}

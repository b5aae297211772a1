//! Test utilities for action sheets
//!
//! - [`key`]: Create `KeyEvent` from string (e.g., `key("ctrl+p")`)
//! - [`tap_at`]: Create a tap event at a terminal cell
//! - [`RenderHarness`]: Render into a `TestBackend` and read the result back
//! - [`SelectionHarness`]: Records every row a selection action receives
//! - [`RecordingPresenter`], [`RecordingHeader`]: Doubles for the host seams
//! - Assertion macros for verifying selections
//!
//! # Example
//!
//! ```
//! use tui_sheet_core::row::Row;
//! use tui_sheet_core::sheet::{ActionSheet, RowPosition};
//! use tui_sheet_core::testing::{RecordingPresenter, SelectionHarness};
//! use tui_sheet_core::assert_selected;
//!
//! let presenter = RecordingPresenter::modal();
//! let mut harness = SelectionHarness::new();
//! let mut sheet = ActionSheet::builder(vec![Row::item("Copy"), Row::item("Paste")])
//!     .presenter(presenter.clone())
//!     .on_select(harness.action())
//!     .build()
//!     .unwrap();
//!
//! sheet.tap(RowPosition::item(1)).unwrap();
//!
//! let selected = harness.drain_selected();
//! assert_selected!(selected, "Paste");
//! assert_eq!(presenter.dismissals(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use crate::event::EventKind;
use crate::header::HeaderSurface;
use crate::keymap::parse_key_string;
use crate::presenter::{PresentationStyle, Presenter};
use crate::row::{Row, RowId, RowKind};
use crate::sheet::{ActionSheet, SelectResult};

// ============================================================================
// Events
// ============================================================================

/// Create a `KeyEvent` from a key string.
///
/// # Examples
///
/// ```
/// use tui_sheet_core::testing::key;
/// use crossterm::event::{KeyCode, KeyModifiers};
///
/// let k = key("q");
/// assert_eq!(k.code, KeyCode::Char('q'));
///
/// let k = key("ctrl+p");
/// assert!(k.modifiers.contains(KeyModifiers::CONTROL));
/// ```
///
/// # Panics
///
/// Panics if the key string cannot be parsed.
pub fn key(s: &str) -> KeyEvent {
    parse_key_string(s).unwrap_or_else(|| panic!("Invalid key string: {:?}", s))
}

/// Create a `KeyEvent` for a character with no modifiers.
pub fn char_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty())
}

/// Create a `KeyEvent` for a character with Ctrl modifier.
pub fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

/// Create a tap event at a terminal cell
pub fn tap_at(column: u16, row: u16) -> EventKind {
    EventKind::Tap { column, row }
}

// ============================================================================
// Rendering
// ============================================================================

/// Renders into an in-memory terminal for snapshot-style assertions
pub struct RenderHarness {
    terminal: Terminal<TestBackend>,
}

impl RenderHarness {
    pub fn new(width: u16, height: u16) -> Self {
        let terminal =
            Terminal::new(TestBackend::new(width, height)).expect("test backend never fails");
        Self { terminal }
    }

    /// Render a frame and return the resulting buffer
    pub fn render(&mut self, render: impl FnOnce(&mut Frame)) -> &Buffer {
        self.terminal.draw(render).expect("test backend never fails");
        self.terminal.backend().buffer()
    }

    /// Render a frame and return its text without styling
    pub fn render_to_string_plain(&mut self, render: impl FnOnce(&mut Frame)) -> String {
        buffer_to_string_plain(self.render(render))
    }
}

/// Buffer contents as lines of text, trailing spaces trimmed
pub fn buffer_to_string_plain(buffer: &Buffer) -> String {
    buffer_rect_to_string_plain(buffer, buffer.area)
}

/// Text of one region of a buffer, trailing spaces trimmed
pub fn buffer_rect_to_string_plain(buffer: &Buffer, area: Rect) -> String {
    let area = area.intersection(buffer.area);
    let mut lines = Vec::with_capacity(area.height as usize);
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            if let Some(cell) = buffer.cell(Position::new(x, y)) {
                line.push_str(cell.symbol());
            }
        }
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

// ============================================================================
// Selection
// ============================================================================

/// A row as seen by a selection action
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub id: RowId,
    pub title: String,
    pub kind: RowKind,
    pub is_toggled: Option<bool>,
    pub value: Option<serde_json::Value>,
}

impl From<&Row> for Selection {
    fn from(row: &Row) -> Self {
        Self {
            id: row.id(),
            title: row.title_text().to_string(),
            kind: row.kind(),
            is_toggled: row.is_toggled(),
            value: row.value().cloned(),
        }
    }
}

/// Collects selections through a channel
///
/// Hand [`SelectionHarness::action`] to a sheet, then drain what it saw.
pub struct SelectionHarness {
    tx: mpsc::UnboundedSender<Selection>,
    rx: mpsc::UnboundedReceiver<Selection>,
}

impl SelectionHarness {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// A selection action that records each row it receives
    pub fn action(&self) -> impl FnMut(&ActionSheet, &Row) -> SelectResult + 'static {
        let tx = self.tx.clone();
        move |_sheet, row| {
            let _ = tx.send(Selection::from(row));
            Ok(())
        }
    }

    /// Drain all recorded selections
    pub fn drain_selected(&mut self) -> Vec<Selection> {
        let mut selected = Vec::new();
        while let Ok(selection) = self.rx.try_recv() {
            selected.push(selection);
        }
        selected
    }
}

impl Default for SelectionHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Host doubles
// ============================================================================

/// Presenter that counts dismissals; clones share the count
#[derive(Debug, Clone)]
pub struct RecordingPresenter {
    style: PresentationStyle,
    anchor: Option<Position>,
    dismissals: Rc<Cell<usize>>,
}

impl RecordingPresenter {
    pub fn modal() -> Self {
        Self {
            style: PresentationStyle::Modal,
            anchor: None,
            dismissals: Rc::new(Cell::new(0)),
        }
    }

    pub fn popover(anchor: Option<Position>) -> Self {
        Self {
            style: PresentationStyle::Popover,
            anchor,
            ..Self::modal()
        }
    }

    pub fn dismissals(&self) -> usize {
        self.dismissals.get()
    }
}

impl Presenter for RecordingPresenter {
    fn style(&self) -> PresentationStyle {
        self.style
    }

    fn anchor(&self) -> Option<Position> {
        self.anchor
    }

    fn dismiss(&mut self) {
        self.dismissals.set(self.dismissals.get() + 1);
    }
}

/// Shared log of header attach/detach calls
pub type HeaderLog = Rc<RefCell<Vec<String>>>;

/// Header with a fixed height that logs attach and detach
#[derive(Debug)]
pub struct RecordingHeader {
    name: String,
    height: f32,
    log: HeaderLog,
}

impl RecordingHeader {
    pub fn log() -> HeaderLog {
        Rc::new(RefCell::new(Vec::new()))
    }

    pub fn new(name: impl Into<String>, height: f32, log: &HeaderLog) -> Self {
        Self {
            name: name.into(),
            height,
            log: log.clone(),
        }
    }
}

impl HeaderSurface for RecordingHeader {
    fn height(&self) -> f32 {
        self.height
    }

    fn attach(&mut self) {
        self.log.borrow_mut().push(format!("attach {}", self.name));
    }

    fn detach(&mut self) {
        self.log.borrow_mut().push(format!("detach {}", self.name));
    }
}

// ============================================================================
// Assertions
// ============================================================================

/// Assert that a row with the given title was selected.
///
/// ```ignore
/// let selected = harness.drain_selected();
/// assert_selected!(selected, "Copy");
/// ```
#[macro_export]
macro_rules! assert_selected {
    ($selected:expr, $title:expr) => {
        assert!(
            $selected.iter().any(|s| s.title == $title),
            "Expected `{}` to be selected, but got: {:?}",
            $title,
            $selected.iter().map(|s| &s.title).collect::<Vec<_>>()
        );
    };
}

/// Count selections matching a pattern on the row kind.
///
/// ```ignore
/// let selected = harness.drain_selected();
/// assert_eq!(count_selected!(selected, RowKind::Toggle { .. }), 2);
/// ```
#[macro_export]
macro_rules! count_selected {
    ($selected:expr, $pattern:pat $(if $guard:expr)?) => {
        $selected
            .iter()
            .filter(|s| matches!(s.kind, $pattern $(if $guard)?))
            .count()
    };
}

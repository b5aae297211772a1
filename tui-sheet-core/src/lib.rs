//! Core types for terminal action sheets
//!
//! An action sheet is a modal panel of rows: items at the top, buttons at
//! the bottom, with an optional header above both. This crate holds the
//! model that a renderer draws from.
//!
//! # Core Concepts
//!
//! - **Row**: One entry, with a kind that decides its group and height
//! - **Appearance**: Row heights, content inset and popover width
//! - **ActionSheet**: Rows, appearance, header, presenter and selection action
//! - **SheetLayout**: Heights computed from the current state
//! - **Keymap**: Key bindings for navigating a presented sheet
//!
//! # Basic Example
//!
//! ```
//! use tui_sheet_core::prelude::*;
//!
//! let mut sheet = ActionSheet::builder(vec![
//!     Row::title("Share"),
//!     Row::item("Copy link"),
//!     Row::toggle("Include comments", false),
//!     Row::cancel_button("Cancel"),
//! ])
//! .on_select(|_sheet, row| {
//!     println!("{} selected", row.title_text());
//!     Ok(())
//! })
//! .build()
//! .unwrap();
//!
//! let layout = sheet.host_will_layout().unwrap();
//! assert_eq!(layout.item_heights.len(), 3);
//!
//! // Toggles flip and keep the sheet open
//! sheet.tap(RowPosition::item(2)).unwrap();
//! assert_eq!(sheet.items()[2].is_toggled(), Some(true));
//! assert!(!sheet.is_dismissed());
//! ```

pub mod appearance;
pub mod component;
pub mod error;
pub mod event;
pub mod header;
pub mod keymap;
pub mod layout;
pub mod lifecycle;
pub mod partition;
pub mod poller;
pub mod presenter;
pub mod row;
pub mod sheet;
pub mod testing;

// Model exports
pub use appearance::{Appearance, SharedAppearance};
pub use error::{Result, SelectError, SheetError};
pub use layout::{AppearanceHeights, HeightContext, RowHeights, SheetLayout, Size};
pub use lifecycle::{PresentationGuard, PresentationPhase};
pub use partition::{partition, Partition};
pub use row::{Row, RowGroup, RowId, RowKind};
pub use sheet::{
    ActionSheet, ActionSheetBuilder, AppearanceRef, AppearanceSource, DismissOutcome,
    RowPosition, SelectAction, SelectResult, TapOutcome,
};

// Host seam exports
pub use component::Component;
pub use header::{HeaderSurface, TextHeader};
pub use presenter::{ModalPresenter, PopoverPresenter, PresentationStyle, Presenter};

// Event system exports
pub use event::{EventKind, EventType};
pub use keymap::{format_key_for_display, parse_key_string, Keymap, SheetCommand};
pub use poller::{process_raw_event, spawn_event_poller, RawEvent};

// Re-export ratatui types for convenience
pub use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    Frame,
};

// Testing exports
pub use testing::{
    buffer_rect_to_string_plain, buffer_to_string_plain, char_key, ctrl_key, key, tap_at,
    RecordingHeader, RecordingPresenter, RenderHarness, Selection, SelectionHarness,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::appearance::{Appearance, SharedAppearance};
    pub use crate::component::Component;
    pub use crate::error::{Result, SheetError};
    pub use crate::event::{EventKind, EventType};
    pub use crate::header::{HeaderSurface, TextHeader};
    pub use crate::keymap::{Keymap, SheetCommand};
    pub use crate::layout::{RowHeights, SheetLayout, Size};
    pub use crate::poller::{process_raw_event, spawn_event_poller, RawEvent};
    pub use crate::presenter::{ModalPresenter, PopoverPresenter, PresentationStyle, Presenter};
    pub use crate::row::{Row, RowGroup, RowKind};
    pub use crate::sheet::{ActionSheet, DismissOutcome, RowPosition, TapOutcome};

    // Re-export ratatui types
    pub use ratatui::{
        layout::Rect,
        style::{Color, Modifier, Style},
        text::{Line, Span, Text},
        Frame,
    };
}

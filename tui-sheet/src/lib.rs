//! tui-sheet: Modal action sheets for Rust TUI apps
//!
//! A sheet is a list of rows split into items and buttons, with an optional
//! header. The host owns the sheet, draws it with [`ActionSheetView`], and
//! applies the actions the view emits.
//!
//! # Example
//! ```
//! use tui_sheet::prelude::*;
//!
//! let mut sheet = ActionSheet::builder(vec![
//!     Row::item("Rename"),
//!     Row::item("Delete"),
//!     Row::cancel_button("Cancel"),
//! ])
//! .row_heights(TerminalHeights)
//! .on_select(|_sheet, row| {
//!     println!("{}", row.title_text());
//!     Ok(())
//! })
//! .build()
//! .unwrap();
//!
//! sheet.set_content_width(40.0).unwrap();
//! sheet.host_will_layout().unwrap();
//! assert_eq!(sheet.tap(RowPosition::item(1)).unwrap(), TapOutcome::Dismissed);
//! ```

// Re-export everything from core
pub use tui_sheet_core::*;

// Re-export the renderer
pub use tui_sheet_components::{
    cells, centered_rect, render_modal, sheet_rect, text_width, wrap_title, ActionSheetView,
    ActionSheetViewProps, ModalStyle, SheetViewStyle, TerminalHeights, CHECKMARK_WIDTH,
    ROW_PADDING,
};

/// Prelude for convenient imports
pub mod prelude {
    // Model
    pub use tui_sheet_core::{
        ActionSheet, Appearance, DismissOutcome, Row, RowGroup, RowKind, RowPosition,
        SharedAppearance, SheetError, SheetLayout, Size, TapOutcome,
    };

    // Host seams
    pub use tui_sheet_core::{
        Component, HeaderSurface, ModalPresenter, PopoverPresenter, PresentationStyle, Presenter,
        RowHeights, TextHeader,
    };

    // Event system
    pub use tui_sheet_core::{
        process_raw_event, spawn_event_poller, EventKind, EventType, Keymap, RawEvent,
        SheetCommand,
    };

    // Rendering
    pub use tui_sheet_components::{
        render_modal, sheet_rect, ActionSheetView, ActionSheetViewProps, ModalStyle,
        SheetViewStyle, TerminalHeights,
    };

    // Ratatui re-exports
    pub use tui_sheet_core::{Color, Frame, Line, Modifier, Rect, Span, Style, Text};
}

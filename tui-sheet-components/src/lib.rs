//! Ratatui rendering for tui-sheet action sheets
//!
//! [`ActionSheetView`] implements the `Component<A>` trait and emits
//! actions via callback functions passed through Props. The host owns the
//! sheet and applies those actions to it.
//!
//! # Components
//!
//! - [`ActionSheetView`] - Sheet rows with keyboard and tap navigation
//! - [`render_modal`] / [`sheet_rect`] - Dimmed overlay and sheet placement
//! - [`TerminalHeights`] - Row heights matching what the view draws
//!
//! # Example
//!
//! ```ignore
//! use tui_sheet_components::{ActionSheetView, ActionSheetViewProps, ModalStyle};
//!
//! // In your render function:
//! view.present(frame, ActionSheetViewProps {
//!     sheet: &state.sheet,
//!     highlighted: state.highlighted,
//!     keymap: &state.keymap,
//!     is_focused: true,
//!     on_highlight: Action::Highlight,
//!     on_tap: Action::Tap,
//!     on_cancel: || Action::Close,
//! }, &ModalStyle::default());
//! ```

mod metrics;
mod modal;
mod sheet_view;

pub use metrics::{text_width, wrap_title, TerminalHeights, CHECKMARK_WIDTH, ROW_PADDING};
pub use modal::{cells, centered_rect, render_modal, sheet_rect, ModalStyle};
pub use sheet_view::{ActionSheetView, ActionSheetViewProps, SheetViewStyle};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        centered_rect, render_modal, sheet_rect, ActionSheetView, ActionSheetViewProps,
        ModalStyle, SheetViewStyle, TerminalHeights,
    };
}

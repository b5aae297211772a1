//! Row heights as the terminal renderer will draw them

use std::borrow::Cow;

use textwrap::Options;
use tui_sheet_core::{HeightContext, Row, RowHeights, RowKind};

/// Blank columns on each side of a row's text
pub const ROW_PADDING: u16 = 1;

/// Columns reserved in front of toggle titles for the checkmark
pub const CHECKMARK_WIDTH: u16 = 2;

/// Reports the heights [`ActionSheetView`](crate::ActionSheetView) draws
///
/// Item and toggle titles wrap to the content width. Each extra wrapped
/// line adds one cell on top of the configured height, so a taller
/// configured row keeps its spare room. Other kinds use the appearance
/// value as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalHeights;

impl RowHeights for TerminalHeights {
    fn row_height(&self, row: &Row, cx: &HeightContext<'_>) -> f32 {
        let base = cx.appearance.height_for(row.kind());
        match row.kind() {
            RowKind::Item | RowKind::Toggle { .. } => {
                let width = text_width(row.kind(), cx.content_width);
                let lines = wrap_title(row.title_text(), width).len();
                base + lines.saturating_sub(1) as f32
            }
            _ => base,
        }
    }
}

/// Columns left for a row's title inside `content_width`
pub fn text_width(kind: RowKind, content_width: f32) -> usize {
    let mut reserved = 2 * ROW_PADDING;
    if matches!(kind, RowKind::Toggle { .. }) {
        reserved += CHECKMARK_WIDTH;
    }
    let width = content_width.max(0.0).floor() as usize;
    width.saturating_sub(reserved as usize).max(1)
}

/// Wrap a title to `width` columns, always yielding at least one line
pub fn wrap_title(title: &str, width: usize) -> Vec<Cow<'_, str>> {
    let lines = textwrap::wrap(title, Options::new(width.max(1)));
    if lines.is_empty() {
        vec![Cow::Borrowed("")]
    } else {
        lines
    }
}

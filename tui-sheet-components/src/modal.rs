//! Modal overlay with background dimming, and sheet placement
//!
//! Dims the background on each frame (keeping animations live) and fills
//! the sheet area so it can be drawn on top.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
    widgets::Widget,
    Frame,
};
use tui_sheet_core::{PresentationStyle, Size};

/// Configuration for modal appearance
pub struct ModalStyle {
    /// Dim factor for background (0.0 = no dim, 1.0 = black)
    pub dim_factor: f32,
    /// Background color for the modal area (None = transparent/cleared)
    pub bg_color: Option<Color>,
}

impl Default for ModalStyle {
    fn default() -> Self {
        Self {
            dim_factor: 0.5,
            bg_color: None,
        }
    }
}

impl ModalStyle {
    /// Create a style with a background color
    pub fn with_bg(bg_color: Color) -> Self {
        Self {
            bg_color: Some(bg_color),
            ..Default::default()
        }
    }
}

/// Render a modal overlay with dimmed background
///
/// Call this AFTER rendering background content. It dims the current buffer
/// and fills the sheet area with the background color.
///
/// # Example
///
/// ```ignore
/// // Render background first
/// app.render(frame, area, props);
///
/// // Then the sheet on top
/// let size = sheet.preferred_size()?;
/// let rect = sheet_rect(sheet.presenter().style(), size, None, frame.area());
/// render_modal(frame, rect, &ModalStyle::with_bg(Color::Rgb(30, 30, 40)));
/// view.render(frame, rect, props);
/// ```
pub fn render_modal(frame: &mut Frame, area: Rect, style: &ModalStyle) {
    dim_buffer(frame.buffer_mut(), style.dim_factor);

    if let Some(bg) = style.bg_color {
        frame.render_widget(BgFill(bg), area);
    }
}

/// Simple widget that fills an area with a background color
struct BgFill(Color);

impl Widget for BgFill {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                buf[(x, y)].set_bg(self.0);
                buf[(x, y)].set_symbol(" ");
            }
        }
    }
}

/// Scale every color in the buffer towards black
fn dim_buffer(buffer: &mut Buffer, factor: f32) {
    let scale = 1.0 - factor.clamp(0.0, 1.0);
    for cell in buffer.content.iter_mut() {
        cell.fg = dim_color(cell.fg, scale);
        cell.bg = dim_color(cell.bg, scale);
    }
}

fn dim_color(color: Color, scale: f32) -> Color {
    let rgb = match color {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Red => (205, 0, 0),
        Color::Green => (0, 205, 0),
        Color::Yellow => (205, 205, 0),
        Color::Blue => (0, 0, 238),
        Color::Magenta => (205, 0, 205),
        Color::Cyan => (0, 205, 205),
        Color::Gray => (229, 229, 229),
        Color::DarkGray => (127, 127, 127),
        Color::LightRed => (255, 0, 0),
        Color::LightGreen => (0, 255, 0),
        Color::LightYellow => (255, 255, 0),
        Color::LightBlue => (92, 92, 255),
        Color::LightMagenta => (255, 0, 255),
        Color::LightCyan => (0, 255, 255),
        Color::White => (255, 255, 255),
        // Reset, Black and palette indexes stay as they are
        other => return other,
    };
    let dim = |c: u8| ((c as f32) * scale) as u8;
    Color::Rgb(dim(rgb.0), dim(rgb.1), dim(rgb.2))
}

/// Calculate a centered rectangle within an area
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Round a length in cells up to whole terminal cells
pub fn cells(length: f32) -> u16 {
    if length.is_nan() {
        return 0;
    }
    length.ceil().clamp(0.0, u16::MAX as f32) as u16
}

/// Where a sheet of `size` goes inside `area`
///
/// Modal sheets sit on the bottom edge, centered horizontally; a zero
/// width means full width. Popovers open below `anchor` (or above it when
/// there is no room), shifted left to stay on screen, and are centered
/// without an anchor. The result never leaves `area`.
pub fn sheet_rect(
    style: PresentationStyle,
    size: Size,
    anchor: Option<Position>,
    area: Rect,
) -> Rect {
    let height = cells(size.height).min(area.height);
    match style {
        PresentationStyle::Modal => {
            let width = match cells(size.width) {
                0 => area.width,
                w => w.min(area.width),
            };
            let x = area.x + (area.width - width) / 2;
            Rect::new(x, area.bottom() - height, width, height)
        }
        PresentationStyle::Popover => {
            let width = cells(size.width).min(area.width);
            let Some(anchor) = anchor else {
                let x = area.x + (area.width - width) / 2;
                let y = area.y + (area.height - height) / 2;
                return Rect::new(x, y, width, height);
            };
            let x = anchor
                .x
                .clamp(area.left(), area.right())
                .min(area.right() - width);
            let below = anchor.y.saturating_add(1).max(area.top());
            let y = if below.saturating_add(height) <= area.bottom() {
                below
            } else {
                anchor
                    .y
                    .saturating_sub(height)
                    .clamp(area.top(), area.bottom() - height)
            };
            Rect::new(x, y, width, height)
        }
    }
}

//! Optional header surface shown above the items

use std::fmt;

use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Something the sheet can display above its items
///
/// The sheet only needs the header's height. `attach` and `detach` are
/// called when the header is installed on or removed from a sheet; the
/// previous header is always detached before the next one is attached.
pub trait HeaderSurface: fmt::Debug {
    /// Height in terminal cells
    fn height(&self) -> f32;

    fn attach(&mut self) {}

    fn detach(&mut self) {}

    /// Draw the header into `area`
    #[allow(unused_variables)]
    fn render(&self, frame: &mut Frame, area: Rect) {}
}

/// Header made of plain text lines, one cell tall per line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextHeader {
    lines: Vec<String>,
    attached: bool,
}

impl TextHeader {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            attached: false,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl HeaderSurface for TextHeader {
    fn height(&self) -> f32 {
        self.lines.len() as f32
    }

    fn attach(&mut self) {
        self.attached = true;
    }

    fn detach(&mut self) {
        self.attached = false;
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let text: Vec<Line> = self.lines.iter().map(|l| Line::raw(l.as_str())).collect();
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), area);
    }
}

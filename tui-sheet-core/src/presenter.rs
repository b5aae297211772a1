//! Presenters decide how a sheet is shown and receive its dismissal

use std::fmt;

use ratatui::layout::Position;
use tracing::debug;

/// How a sheet is placed on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationStyle {
    /// Full-width sheet anchored to the bottom of the screen
    #[default]
    Modal,
    /// Popover-width box near an anchor point
    Popover,
}

/// Receives the dismissal of a presented sheet
///
/// The sheet calls `dismiss` at most once per presentation.
pub trait Presenter: fmt::Debug {
    fn style(&self) -> PresentationStyle;

    /// Anchor point for popovers, if any
    fn anchor(&self) -> Option<Position> {
        None
    }

    /// Tear down the presentation
    fn dismiss(&mut self);
}

/// Default presenter: bottom-anchored modal sheet
#[derive(Debug, Clone, Default)]
pub struct ModalPresenter {
    dismissed: bool,
}

impl ModalPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }
}

impl Presenter for ModalPresenter {
    fn style(&self) -> PresentationStyle {
        PresentationStyle::Modal
    }

    fn dismiss(&mut self) {
        debug!("Modal sheet dismissed");
        self.dismissed = true;
    }
}

/// Presents the sheet as a popover, optionally anchored at a screen position
#[derive(Debug, Clone, Default)]
pub struct PopoverPresenter {
    anchor: Option<Position>,
    dismissed: bool,
}

impl PopoverPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Popover opening next to `anchor` (e.g. the cell that was clicked)
    pub fn anchored_at(anchor: Position) -> Self {
        Self {
            anchor: Some(anchor),
            dismissed: false,
        }
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }
}

impl Presenter for PopoverPresenter {
    fn style(&self) -> PresentationStyle {
        PresentationStyle::Popover
    }

    fn anchor(&self) -> Option<Position> {
        self.anchor
    }

    fn dismiss(&mut self) {
        debug!(anchor = ?self.anchor, "Popover sheet dismissed");
        self.dismissed = true;
    }
}

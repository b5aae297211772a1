//! The action sheet aggregate: rows, appearance, sizing, taps and dismissal
//!
//! # Lifecycle
//!
//! 1. Build the sheet from a combined row list. Rows are partitioned into
//!    items and buttons right away.
//! 2. The host calls [`ActionSheet::host_will_layout`] before every layout
//!    pass. Each call recomputes the layout from current rows, header and
//!    appearance.
//! 3. Taps go through [`ActionSheet::tap`]: toggles flip, the selection
//!    action runs, and rows that dismiss close the sheet once.
//!
//! # Example
//!
//! ```
//! use tui_sheet_core::row::Row;
//! use tui_sheet_core::sheet::{ActionSheet, RowPosition, TapOutcome};
//!
//! let mut sheet = ActionSheet::new(
//!     vec![Row::item("Copy"), Row::item("Paste"), Row::cancel_button("Cancel")],
//!     |_sheet, row| {
//!         println!("picked {}", row.title_text());
//!         Ok(())
//!     },
//! )
//! .unwrap();
//!
//! assert_eq!(sheet.items().len(), 2);
//! assert_eq!(sheet.buttons().len(), 1);
//!
//! sheet.host_will_layout().unwrap();
//! let outcome = sheet.tap(RowPosition::item(0)).unwrap();
//! assert_eq!(outcome, TapOutcome::Dismissed);
//! assert!(sheet.is_dismissed());
//! ```

use std::cell::OnceCell;
use std::fmt;
use std::ops::Deref;

use parking_lot::RwLockReadGuard;
use tracing::{debug, trace};

use crate::appearance::{self, Appearance, SharedAppearance};
use crate::error::{Result, SelectError, SheetError};
use crate::header::HeaderSurface;
use crate::layout::{group_total, AppearanceHeights, HeightContext, RowHeights, SheetLayout, Size};
use crate::lifecycle::{PresentationGuard, PresentationPhase};
use crate::partition::partition;
use crate::presenter::{ModalPresenter, PresentationStyle, Presenter};
use crate::row::{Row, RowGroup, RowKind};

/// Result of a selection action
pub type SelectResult = std::result::Result<(), SelectError>;

/// Callback run when a row is selected
pub type SelectAction = Box<dyn FnMut(&ActionSheet, &Row) -> SelectResult>;

fn noop_select(_sheet: &ActionSheet, _row: &Row) -> SelectResult {
    Ok(())
}

/// Location of a row inside a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowPosition {
    pub group: RowGroup,
    pub index: usize,
}

impl RowPosition {
    pub const fn item(index: usize) -> Self {
        Self {
            group: RowGroup::Items,
            index,
        }
    }

    pub const fn button(index: usize) -> Self {
        Self {
            group: RowGroup::Buttons,
            index,
        }
    }
}

/// What a tap did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// The selection action ran and the sheet stays open
    Selected,
    /// The selection action ran and the sheet was dismissed
    Dismissed,
    /// The sheet was already dismissed; nothing ran
    Ignored,
}

/// What a dismissal request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissOutcome {
    Dismissed,
    /// An earlier request already dismissed the sheet
    AlreadyDismissed,
}

/// Where a sheet's appearance comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppearanceSource {
    /// Private copy of the standard appearance, taken on first access
    Inherited,
    /// Shared handle read live
    Explicit,
}

enum AppearanceSlot {
    Inherited {
        standard: SharedAppearance,
        copy: OnceCell<Appearance>,
    },
    Explicit(SharedAppearance),
}

fn copy_standard(standard: &SharedAppearance) -> Appearance {
    debug!("Copying standard appearance into sheet");
    standard.snapshot()
}

/// Borrowed view of a sheet's current appearance
pub enum AppearanceRef<'a> {
    Copied(&'a Appearance),
    Shared(RwLockReadGuard<'a, Appearance>),
}

impl Deref for AppearanceRef<'_> {
    type Target = Appearance;

    fn deref(&self) -> &Appearance {
        match self {
            AppearanceRef::Copied(appearance) => *appearance,
            AppearanceRef::Shared(guard) => &**guard,
        }
    }
}

impl fmt::Debug for AppearanceRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

/// Builder for [`ActionSheet`]
pub struct ActionSheetBuilder {
    rows: Vec<Row>,
    on_select: Option<SelectAction>,
    presenter: Option<Box<dyn Presenter>>,
    appearance: Option<SharedAppearance>,
    standard: Option<SharedAppearance>,
    heights: Option<Box<dyn RowHeights>>,
    header: Option<Box<dyn HeaderSurface>>,
}

impl ActionSheetBuilder {
    /// Selection action. Defaults to doing nothing.
    pub fn on_select<F>(mut self, action: F) -> Self
    where
        F: FnMut(&ActionSheet, &Row) -> SelectResult + 'static,
    {
        self.on_select = Some(Box::new(action));
        self
    }

    /// Presenter. Defaults to [`ModalPresenter`].
    pub fn presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Some(Box::new(presenter));
        self
    }

    /// Use a shared appearance, read live. Disables inheritance.
    pub fn appearance(mut self, appearance: SharedAppearance) -> Self {
        self.appearance = Some(appearance);
        self
    }

    /// Standard appearance to copy from on first access
    ///
    /// Defaults to the process-wide [`appearance::standard`].
    pub fn inherit_from(mut self, standard: SharedAppearance) -> Self {
        self.standard = Some(standard);
        self
    }

    /// Source of per-row heights. Defaults to [`AppearanceHeights`].
    pub fn row_heights(mut self, heights: impl RowHeights + 'static) -> Self {
        self.heights = Some(Box::new(heights));
        self
    }

    pub fn header(mut self, header: impl HeaderSurface + 'static) -> Self {
        self.header = Some(Box::new(header));
        self
    }

    pub fn build(self) -> Result<ActionSheet> {
        let appearance = match self.appearance {
            Some(shared) => AppearanceSlot::Explicit(shared),
            None => AppearanceSlot::Inherited {
                standard: self.standard.unwrap_or_else(appearance::standard),
                copy: OnceCell::new(),
            },
        };

        let mut sheet = ActionSheet {
            items: Vec::new(),
            buttons: Vec::new(),
            header: None,
            appearance,
            heights: self.heights.unwrap_or_else(|| Box::new(AppearanceHeights)),
            presenter: self
                .presenter
                .unwrap_or_else(|| Box::new(ModalPresenter::new())),
            on_select: self.on_select.unwrap_or_else(|| Box::new(noop_select)),
            content_width: 0.0,
            layout: None,
            lifecycle: PresentationGuard::new(),
        };
        sheet.set_rows(self.rows)?;
        if let Some(header) = self.header {
            sheet.set_header(Some(header))?;
        }
        Ok(sheet)
    }
}

/// A modal sheet of items and buttons
pub struct ActionSheet {
    items: Vec<Row>,
    buttons: Vec<Row>,
    header: Option<Box<dyn HeaderSurface>>,
    appearance: AppearanceSlot,
    heights: Box<dyn RowHeights>,
    presenter: Box<dyn Presenter>,
    on_select: SelectAction,
    content_width: f32,
    layout: Option<SheetLayout>,
    lifecycle: PresentationGuard,
}

impl fmt::Debug for ActionSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionSheet")
            .field("items", &self.items)
            .field("buttons", &self.buttons)
            .field("header", &self.header)
            .field("appearance_source", &self.appearance_source())
            .field("presenter", &self.presenter)
            .field("content_width", &self.content_width)
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

impl ActionSheet {
    pub fn builder(rows: impl IntoIterator<Item = Row>) -> ActionSheetBuilder {
        ActionSheetBuilder {
            rows: rows.into_iter().collect(),
            on_select: None,
            presenter: None,
            appearance: None,
            standard: None,
            heights: None,
            header: None,
        }
    }

    /// Sheet with a modal presenter and an inherited appearance
    pub fn new<F>(rows: impl IntoIterator<Item = Row>, on_select: F) -> Result<Self>
    where
        F: FnMut(&ActionSheet, &Row) -> SelectResult + 'static,
    {
        Self::builder(rows).on_select(on_select).build()
    }

    // ------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------

    pub fn items(&self) -> &[Row] {
        &self.items
    }

    pub fn buttons(&self) -> &[Row] {
        &self.buttons
    }

    /// Items followed by buttons, with their positions
    pub fn rows(&self) -> impl Iterator<Item = (RowPosition, &Row)> {
        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(i, row)| (RowPosition::item(i), row));
        let buttons = self
            .buttons
            .iter()
            .enumerate()
            .map(|(i, row)| (RowPosition::button(i), row));
        items.chain(buttons)
    }

    pub fn row(&self, position: RowPosition) -> Option<&Row> {
        match position.group {
            RowGroup::Items => self.items.get(position.index),
            RowGroup::Buttons => self.buttons.get(position.index),
        }
    }

    fn row_mut(&mut self, position: RowPosition) -> Option<&mut Row> {
        match position.group {
            RowGroup::Items => self.items.get_mut(position.index),
            RowGroup::Buttons => self.buttons.get_mut(position.index),
        }
    }

    /// Position of the first cancel button, if the sheet has one
    pub fn cancel_position(&self) -> Option<RowPosition> {
        self.buttons
            .iter()
            .position(|row| row.kind() == RowKind::CancelButton)
            .map(RowPosition::button)
    }

    /// Replace all rows, partitioning them into items and buttons
    pub fn set_rows(&mut self, rows: impl IntoIterator<Item = Row>) -> Result<()> {
        let rows: Vec<Row> = rows.into_iter().collect();
        let input_len = rows.len();
        let split = partition(rows);
        split.verify(input_len)?;
        debug!(
            items = split.items.len(),
            buttons = split.buttons.len(),
            "Sheet rows set"
        );
        self.items = split.items;
        self.buttons = split.buttons;
        self.layout = None;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Header
    // ------------------------------------------------------------------

    pub fn header(&self) -> Option<&dyn HeaderSurface> {
        self.header.as_deref()
    }

    /// Install a new header (or none), returning the previous one
    ///
    /// The new header's height is checked first; on error nothing changes.
    /// The previous header is detached before the new one is attached.
    pub fn set_header(
        &mut self,
        header: Option<Box<dyn HeaderSurface>>,
    ) -> Result<Option<Box<dyn HeaderSurface>>> {
        if let Some(new) = &header {
            SheetError::check_length("header height", new.height())?;
        }

        let mut previous = self.header.take();
        if let Some(old) = previous.as_mut() {
            old.detach();
        }

        self.header = header;
        self.layout = None;
        if let Some(new) = self.header.as_mut() {
            new.attach();
            trace!(height = new.height(), "Header attached");
        }
        Ok(previous)
    }

    // ------------------------------------------------------------------
    // Appearance
    // ------------------------------------------------------------------

    /// Current appearance
    ///
    /// For an inherited appearance the first call copies the standard
    /// values; every later call returns that copy.
    pub fn appearance(&self) -> AppearanceRef<'_> {
        match &self.appearance {
            AppearanceSlot::Inherited { standard, copy } => {
                AppearanceRef::Copied(copy.get_or_init(|| copy_standard(standard)))
            }
            AppearanceSlot::Explicit(shared) => AppearanceRef::Shared(shared.read()),
        }
    }

    pub fn appearance_source(&self) -> AppearanceSource {
        match self.appearance {
            AppearanceSlot::Inherited { .. } => AppearanceSource::Inherited,
            AppearanceSlot::Explicit(_) => AppearanceSource::Explicit,
        }
    }

    /// Switch to a shared appearance, read live from now on
    pub fn set_appearance(&mut self, appearance: SharedAppearance) {
        self.appearance = AppearanceSlot::Explicit(appearance);
        self.layout = None;
    }

    /// Mutate the sheet's appearance
    ///
    /// Inherited appearances are changed on the sheet's own copy only.
    /// Explicit ones are changed through the shared handle, so every holder
    /// sees the change. A failing closure leaves the appearance untouched.
    pub fn update_appearance<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Appearance) -> Result<()>,
    {
        self.layout = None;
        match &mut self.appearance {
            AppearanceSlot::Inherited { standard, copy } => {
                let current = std::mem::take(copy)
                    .into_inner()
                    .unwrap_or_else(|| copy_standard(standard));
                let mut scratch = current.clone();
                let result = f(&mut scratch);
                *copy = OnceCell::from(if result.is_ok() { scratch } else { current });
                result
            }
            AppearanceSlot::Explicit(shared) => shared.update(f),
        }
    }

    /// Replace the source of per-row heights
    pub fn set_row_heights(&mut self, heights: impl RowHeights + 'static) {
        self.heights = Box::new(heights);
        self.layout = None;
    }

    pub fn presenter(&self) -> &dyn Presenter {
        self.presenter.as_ref()
    }

    // ------------------------------------------------------------------
    // Sizing
    // ------------------------------------------------------------------

    /// Popovers are measured at `popover_width`, the width they are drawn
    /// at. Modal sheets use the host-assigned width, or `popover_width`
    /// until one is assigned.
    fn height_context<'a>(&self, appearance: &'a Appearance) -> HeightContext<'a> {
        let content_width = match self.presenter.style() {
            PresentationStyle::Modal if self.content_width > 0.0 => self.content_width,
            _ => appearance.popover_width(),
        };
        HeightContext {
            appearance,
            content_width,
        }
    }

    fn group_height(&self, rows: &[Row]) -> Result<f32> {
        let appearance = self.appearance();
        let cx = self.height_context(&appearance);
        rows.iter().try_fold(0.0_f32, |sum, row| -> Result<f32> {
            let height = self.heights.row_height(row, &cx);
            Ok(sum + SheetError::check_length("row height", height)?)
        })
    }

    /// Layout computed from current state
    pub fn layout(&self) -> Result<SheetLayout> {
        let appearance = self.appearance();
        let cx = self.height_context(&appearance);
        self.compute_layout(&cx)
    }

    /// Layout with rows measured at `width` cells
    ///
    /// Renderers call this with the width they actually draw in, so rows
    /// that wrap get the height they will be given on screen.
    pub fn layout_for_width(&self, width: f32) -> Result<SheetLayout> {
        let width = SheetError::check_length("content width", width)?;
        let appearance = self.appearance();
        let cx = HeightContext {
            appearance: &appearance,
            content_width: width,
        };
        self.compute_layout(&cx)
    }

    fn compute_layout(&self, cx: &HeightContext<'_>) -> Result<SheetLayout> {
        SheetLayout::compute(
            &self.items,
            &self.buttons,
            self.header.as_ref().map_or(0.0, |h| h.height()),
            cx,
            self.heights.as_ref(),
        )
    }

    /// Sum of the item row heights, 0 without items
    pub fn items_height(&self) -> Result<f32> {
        self.group_height(&self.items)
    }

    pub fn items_total_height(&self) -> Result<f32> {
        Ok(group_total(self.items_height()?, self.appearance().content_inset()))
    }

    /// Sum of the button row heights, 0 without buttons
    pub fn buttons_height(&self) -> Result<f32> {
        self.group_height(&self.buttons)
    }

    pub fn buttons_total_height(&self) -> Result<f32> {
        Ok(group_total(
            self.buttons_height()?,
            self.appearance().content_inset(),
        ))
    }

    /// Height of the header, 0 without one
    pub fn header_height(&self) -> Result<f32> {
        match &self.header {
            Some(header) => SheetError::check_length("header height", header.height()),
            None => Ok(0.0),
        }
    }

    pub fn header_total_height(&self) -> Result<f32> {
        Ok(group_total(
            self.header_height()?,
            self.appearance().content_inset(),
        ))
    }

    pub fn content_height(&self) -> Result<f32> {
        Ok(self.header_total_height()? + self.items_total_height()? + self.buttons_total_height()?)
    }

    /// Width assigned by the host through the preferred content size
    pub fn content_width(&self) -> f32 {
        self.content_width
    }

    pub fn set_content_width(&mut self, width: f32) -> Result<()> {
        self.content_width = SheetError::check_length("content width", width)?;
        self.layout = None;
        Ok(())
    }

    /// Host-assigned width with a freshly computed content height
    pub fn preferred_content_size(&self) -> Result<Size> {
        Ok(Size::new(self.content_width, self.content_height()?))
    }

    /// Assign the preferred content size. Only the width is kept; the
    /// height is always recomputed from content.
    pub fn set_preferred_content_size(&mut self, size: Size) -> Result<()> {
        self.set_content_width(size.width)
    }

    /// Popover width from the appearance with the content height
    pub fn preferred_popover_size(&self) -> Result<Size> {
        let width = self.appearance().popover_width();
        Ok(Size::new(width, self.content_height()?))
    }

    /// Preferred size for the presenter's style
    pub fn preferred_size(&self) -> Result<Size> {
        match self.presenter.style() {
            PresentationStyle::Modal => self.preferred_content_size(),
            PresentationStyle::Popover => self.preferred_popover_size(),
        }
    }

    // ------------------------------------------------------------------
    // Presentation lifecycle
    // ------------------------------------------------------------------

    /// Notification from the host that a layout pass is about to run
    pub fn host_will_layout(&mut self) -> Result<&SheetLayout> {
        self.prepare_for_presentation()
    }

    /// Recompute the layout from current rows, header and appearance
    ///
    /// Runs in full on every call; the result is kept for the renderer.
    /// A dismissed sheet still gets a layout but stays idle.
    pub fn prepare_for_presentation(&mut self) -> Result<&SheetLayout> {
        let layout = self.layout()?;
        if self.lifecycle.is_dismissed() {
            trace!("Layout pass on a dismissed sheet");
            let layout: &SheetLayout = self.layout.insert(layout);
            return Ok(layout);
        }
        self.lifecycle.mark_prepared();
        debug!(
            content_height = layout.content_height,
            pass = self.lifecycle.preparations(),
            "Prepared sheet for presentation"
        );
        let layout: &SheetLayout = self.layout.insert(layout);
        Ok(layout)
    }

    /// Layout from the latest preparation pass
    pub fn prepared_layout(&self) -> Option<&SheetLayout> {
        self.layout.as_ref()
    }

    pub fn phase(&self) -> PresentationPhase {
        self.lifecycle.phase()
    }

    /// Number of preparation passes run so far
    pub fn preparations(&self) -> usize {
        self.lifecycle.preparations()
    }

    pub fn is_dismissed(&self) -> bool {
        self.lifecycle.is_dismissed()
    }

    /// Dismiss the sheet through its presenter
    pub fn dismiss(&mut self) -> DismissOutcome {
        self.dismiss_then(|| {})
    }

    /// Dismiss the sheet and run `completion` once the presenter is done
    ///
    /// Only the first request does anything; `completion` is dropped
    /// without running on later requests.
    pub fn dismiss_then(&mut self, completion: impl FnOnce()) -> DismissOutcome {
        if !self.lifecycle.begin_dismissal() {
            trace!("Ignoring repeated dismissal");
            return DismissOutcome::AlreadyDismissed;
        }
        self.presenter.dismiss();
        self.layout = None;
        completion();
        DismissOutcome::Dismissed
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Replace the selection action
    pub fn set_select_action<F>(&mut self, action: F)
    where
        F: FnMut(&ActionSheet, &Row) -> SelectResult + 'static,
    {
        self.on_select = Box::new(action);
    }

    /// Run the selection action for `row`, without toggling or dismissing
    pub fn select(&mut self, row: &Row) -> Result<()> {
        let mut action = std::mem::replace(&mut self.on_select, Box::new(noop_select));
        let result = action(&*self, row);
        self.on_select = action;
        result.map_err(SheetError::Selection)
    }

    /// Tap the sheet's row at `position`
    ///
    /// Toggles flip before the selection action runs, so the action sees
    /// the new state. Rows that dismiss on select then close the sheet. A
    /// failing action is returned as [`SheetError::Selection`] and the
    /// sheet stays open.
    pub fn tap(&mut self, position: RowPosition) -> Result<TapOutcome> {
        if self.is_dismissed() {
            trace!(?position, "Ignoring tap on dismissed sheet");
            return Ok(TapOutcome::Ignored);
        }
        let row = self
            .row_mut(position)
            .ok_or(SheetError::RowOutOfRange { position })?;
        row.flip_toggle();
        let row = row.clone();
        self.select_then_dismiss(&row)
    }

    /// Tap a row the sheet does not own
    ///
    /// Same protocol as [`ActionSheet::tap`], applied to the caller's row.
    pub fn tap_row(&mut self, row: &mut Row) -> Result<TapOutcome> {
        if self.is_dismissed() {
            trace!(row = row.id().get(), "Ignoring tap on dismissed sheet");
            return Ok(TapOutcome::Ignored);
        }
        row.flip_toggle();
        self.select_then_dismiss(row)
    }

    fn select_then_dismiss(&mut self, row: &Row) -> Result<TapOutcome> {
        debug!(
            row = row.id().get(),
            kind = row.kind().name(),
            toggled = ?row.is_toggled(),
            "Row tapped"
        );
        self.select(row)?;
        if row.dismisses_on_select() {
            self.dismiss();
            Ok(TapOutcome::Dismissed)
        } else {
            Ok(TapOutcome::Selected)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::header::TextHeader;
    use crate::presenter::PopoverPresenter;
    use crate::testing::{RecordingHeader, RecordingPresenter, SelectionHarness};

    fn standard() -> SharedAppearance {
        let standard = SharedAppearance::default();
        standard
            .update(|a| {
                a.set_item_height(50.0)?;
                a.set_ok_button_height(20.0)?;
                a.set_cancel_button_height(30.0)?;
                a.set_content_inset(10.0)
            })
            .unwrap();
        standard
    }

    fn sheet(rows: Vec<Row>) -> ActionSheet {
        ActionSheet::builder(rows)
            .inherit_from(standard())
            .build()
            .unwrap()
    }

    fn header(height: usize) -> TextHeader {
        TextHeader::new(vec![""; height])
    }

    // --- creation ---------------------------------------------------------

    #[test]
    fn test_applies_provided_rows() {
        let item1 = Row::item("foo");
        let item2 = Row::item("bar");
        let sheet = sheet(vec![item1.clone(), item2.clone()]);

        assert_eq!(sheet.items().len(), 2);
        assert_eq!(sheet.items()[0].id(), item1.id());
        assert_eq!(sheet.items()[1].id(), item2.id());
    }

    #[test]
    fn test_separates_items_and_buttons() {
        let button = Row::ok_button("Sheeeeeeeeet!");
        let item1 = Row::item("foo");
        let item2 = Row::item("bar");
        let sheet = sheet(vec![item1.clone(), item2.clone(), button.clone()]);

        assert_eq!(sheet.items().len(), 2);
        assert_eq!(sheet.items()[0].id(), item1.id());
        assert_eq!(sheet.items()[1].id(), item2.id());
        assert_eq!(sheet.buttons().len(), 1);
        assert_eq!(sheet.buttons()[0].id(), button.id());
    }

    #[test]
    fn test_set_rows_replaces_content() {
        let mut sheet = sheet(vec![Row::item("old")]);
        let button = Row::ok_button("Sheeeeeeeeet!");
        let item = Row::item("foo");

        sheet.set_rows(vec![button.clone(), item.clone()]).unwrap();

        assert_eq!(sheet.items().len(), 1);
        assert_eq!(sheet.items()[0].id(), item.id());
        assert_eq!(sheet.buttons()[0].id(), button.id());
    }

    #[test]
    fn test_default_presenter_is_modal() {
        let sheet = sheet(Vec::new());
        assert_eq!(sheet.presenter().style(), PresentationStyle::Modal);
    }

    #[test]
    fn test_applies_provided_presenter() {
        let sheet = ActionSheet::builder(Vec::new())
            .presenter(PopoverPresenter::new())
            .build()
            .unwrap();
        assert_eq!(sheet.presenter().style(), PresentationStyle::Popover);
    }

    #[test]
    fn test_applies_provided_action() {
        let counter = Rc::new(Cell::new(0));
        let seen = counter.clone();
        let mut sheet = ActionSheet::new(Vec::new(), move |_, _| {
            seen.set(seen.get() + 1);
            Ok(())
        })
        .unwrap();

        sheet.select(&Row::item("foo")).unwrap();
        assert_eq!(counter.get(), 1);
    }

    // --- lifecycle --------------------------------------------------------

    #[test]
    fn test_layout_notification_prepares_for_presentation() {
        let mut sheet = sheet(Vec::new());
        assert_eq!(sheet.phase(), PresentationPhase::Idle);

        sheet.host_will_layout().unwrap();

        assert_eq!(sheet.preparations(), 1);
        assert_eq!(sheet.phase(), PresentationPhase::Prepared);
    }

    #[test]
    fn test_repeated_layout_passes_see_current_state() {
        let mut sheet = sheet(vec![Row::item("foo")]);
        assert_eq!(sheet.host_will_layout().unwrap().content_height, 60.0);

        sheet.set_header(Some(Box::new(header(5)))).unwrap();
        sheet.update_appearance(|a| a.set_item_height(20.0)).unwrap();

        assert_eq!(sheet.host_will_layout().unwrap().content_height, 45.0);
        assert_eq!(sheet.preparations(), 2);
        assert_eq!(sheet.prepared_layout().unwrap().header_total_height, 15.0);
    }

    #[test]
    fn test_header_change_drops_prepared_layout() {
        let mut sheet = sheet(vec![Row::item("foo")]);
        sheet.host_will_layout().unwrap();
        assert!(sheet.prepared_layout().is_some());

        sheet.set_header(Some(Box::new(header(5)))).unwrap();
        assert!(sheet.prepared_layout().is_none());
    }

    #[test]
    fn test_sizing_setters_drop_prepared_layout() {
        let mut sheet = sheet(vec![Row::item("foo")]);
        assert_eq!(sheet.host_will_layout().unwrap().items_height, 50.0);

        sheet.update_appearance(|a| a.set_item_height(3.0)).unwrap();
        assert!(sheet.prepared_layout().is_none());
        assert_eq!(sheet.host_will_layout().unwrap().items_height, 3.0);

        sheet.set_content_width(80.0).unwrap();
        assert!(sheet.prepared_layout().is_none());
        sheet.host_will_layout().unwrap();

        sheet.set_row_heights(Doubled);
        assert!(sheet.prepared_layout().is_none());
        sheet.host_will_layout().unwrap();

        sheet.set_appearance(SharedAppearance::default());
        assert!(sheet.prepared_layout().is_none());
        assert_eq!(sheet.host_will_layout().unwrap().items_height, 2.0);
    }

    #[test]
    fn test_layout_pass_after_dismissal_stays_idle() {
        let mut sheet = sheet(vec![Row::item("foo")]);
        sheet.host_will_layout().unwrap();
        sheet.dismiss();

        let layout = sheet.host_will_layout().unwrap();
        assert_eq!(layout.items_height, 50.0);
        assert_eq!(sheet.phase(), PresentationPhase::Idle);
        assert_eq!(sheet.preparations(), 1);
        assert!(sheet.is_dismissed());
    }

    // --- appearance -------------------------------------------------------

    #[test]
    fn test_copies_standard_appearance_when_lazily_created() {
        let standard = standard();
        standard.update(|a| a.set_section_margin(7.0)).unwrap();
        let sheet = ActionSheet::builder(Vec::new())
            .inherit_from(standard.clone())
            .build()
            .unwrap();

        assert_eq!(sheet.appearance_source(), AppearanceSource::Inherited);
        assert_eq!(sheet.appearance().section_margin(), 7.0);
    }

    #[test]
    fn test_standard_changes_before_first_access_are_seen() {
        let standard = standard();
        let sheet = ActionSheet::builder(Vec::new())
            .inherit_from(standard.clone())
            .build()
            .unwrap();

        standard.update(|a| a.set_item_height(99.0)).unwrap();

        assert_eq!(sheet.appearance().item_height(), 99.0);
    }

    #[test]
    fn test_standard_changes_after_first_access_are_not_seen() {
        let standard = standard();
        let sheet = ActionSheet::builder(vec![Row::item("foo")])
            .inherit_from(standard.clone())
            .build()
            .unwrap();
        assert_eq!(sheet.items_height().unwrap(), 50.0);

        standard.update(|a| a.set_item_height(99.0)).unwrap();

        assert_eq!(sheet.appearance().item_height(), 50.0);
        assert_eq!(sheet.items_height().unwrap(), 50.0);
    }

    #[test]
    fn test_does_not_copy_standard_appearance_when_manually_set() {
        let mut sheet = sheet(Vec::new());
        let mut custom = Appearance::new();
        custom.set_section_margin(121214.0).unwrap();
        let shared = SharedAppearance::new(custom);

        sheet.set_appearance(shared.clone());

        assert_eq!(sheet.appearance_source(), AppearanceSource::Explicit);
        assert_eq!(sheet.appearance().section_margin(), 121214.0);
    }

    #[test]
    fn test_explicit_appearance_changes_are_live() {
        let shared = SharedAppearance::default();
        let sheet = ActionSheet::builder(vec![Row::item("foo"), Row::item("bar")])
            .appearance(shared.clone())
            .build()
            .unwrap();
        assert_eq!(sheet.items_height().unwrap(), 2.0);

        shared.update(|a| a.set_item_height(4.0)).unwrap();

        assert_eq!(sheet.items_height().unwrap(), 8.0);
    }

    #[test]
    fn test_update_inherited_appearance_does_not_touch_standard() {
        let standard = standard();
        let mut sheet = ActionSheet::builder(Vec::new())
            .inherit_from(standard.clone())
            .build()
            .unwrap();

        sheet.update_appearance(|a| a.set_popover_width(123.0)).unwrap();

        assert_eq!(sheet.preferred_popover_size().unwrap().width, 123.0);
        assert_eq!(standard.read().popover_width(), 40.0);
    }

    #[test]
    fn test_rejected_appearance_update_is_surfaced_immediately() {
        let mut sheet = sheet(Vec::new());

        let err = sheet
            .update_appearance(|a| a.set_cancel_button_height(-30.0))
            .unwrap_err();

        assert!(matches!(err, SheetError::InvalidConfiguration { .. }));
        assert_eq!(sheet.appearance().cancel_button_height(), 30.0);
    }

    // --- selection --------------------------------------------------------

    #[test]
    fn test_select_action_can_be_replaced() {
        let counter = Rc::new(Cell::new(0));
        let mut sheet = ActionSheet::new(Vec::new(), |_, _| Ok(())).unwrap();
        let seen = counter.clone();
        sheet.set_select_action(move |_, _| {
            seen.set(seen.get() + 1);
            Ok(())
        });

        sheet.select(&Row::item("foo")).unwrap();
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_tap_triggers_select_action_and_dismisses() {
        let presenter = RecordingPresenter::modal();
        let mut harness = SelectionHarness::new();
        let mut sheet = ActionSheet::builder(Vec::new())
            .presenter(presenter.clone())
            .on_select(harness.action())
            .build()
            .unwrap();

        let outcome = sheet.tap_row(&mut Row::item("foo")).unwrap();

        assert_eq!(outcome, TapOutcome::Dismissed);
        assert_eq!(harness.drain_selected().len(), 1);
        assert_eq!(presenter.dismissals(), 1);
    }

    #[test]
    fn test_tap_on_toggle_flips_and_stays_open() {
        let presenter = RecordingPresenter::modal();
        let mut harness = SelectionHarness::new();
        let mut sheet = ActionSheet::builder(vec![Row::toggle("foo", false)])
            .presenter(presenter.clone())
            .on_select(harness.action())
            .build()
            .unwrap();

        let outcome = sheet.tap(RowPosition::item(0)).unwrap();

        assert_eq!(outcome, TapOutcome::Selected);
        assert_eq!(sheet.items()[0].is_toggled(), Some(true));
        let selected = harness.drain_selected();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].is_toggled, Some(true));
        assert_eq!(presenter.dismissals(), 0);
    }

    #[test]
    fn test_tap_out_of_range() {
        let mut sheet = sheet(vec![Row::item("foo")]);
        let err = sheet.tap(RowPosition::button(0)).unwrap_err();
        assert!(matches!(err, SheetError::RowOutOfRange { .. }));
    }

    #[test]
    fn test_select_error_propagates_and_keeps_sheet_open() {
        let presenter = RecordingPresenter::modal();
        let mut sheet = ActionSheet::builder(vec![Row::item("foo")])
            .presenter(presenter.clone())
            .on_select(|_, _| Err("nope".into()))
            .build()
            .unwrap();

        let err = sheet.tap(RowPosition::item(0)).unwrap_err();

        assert!(matches!(err, SheetError::Selection(_)));
        assert!(!sheet.is_dismissed());
        assert_eq!(presenter.dismissals(), 0);
    }

    #[test]
    fn test_select_action_sees_the_sheet() {
        let seen_items = Rc::new(Cell::new(0));
        let seen = seen_items.clone();
        let mut sheet = ActionSheet::new(vec![Row::item("a"), Row::item("b")], move |sheet, _| {
            seen.set(sheet.items().len());
            Ok(())
        })
        .unwrap();

        sheet.tap(RowPosition::item(1)).unwrap();
        assert_eq!(seen_items.get(), 2);
    }

    // --- dismissal --------------------------------------------------------

    #[test]
    fn test_second_dismissal_is_a_noop() {
        let presenter = RecordingPresenter::modal();
        let mut sheet = ActionSheet::builder(Vec::new())
            .presenter(presenter.clone())
            .build()
            .unwrap();
        let completions = Rc::new(Cell::new(0));

        let first = sheet.dismiss_then(|| completions.set(completions.get() + 1));
        let second = sheet.dismiss_then(|| completions.set(completions.get() + 1));

        assert_eq!(first, DismissOutcome::Dismissed);
        assert_eq!(second, DismissOutcome::AlreadyDismissed);
        assert_eq!(completions.get(), 1);
        assert_eq!(presenter.dismissals(), 1);
        assert_eq!(sheet.phase(), PresentationPhase::Idle);
    }

    #[test]
    fn test_taps_after_dismissal_are_ignored() {
        let mut harness = SelectionHarness::new();
        let mut sheet = ActionSheet::builder(vec![Row::item("a"), Row::item("b")])
            .on_select(harness.action())
            .build()
            .unwrap();

        assert_eq!(sheet.tap(RowPosition::item(0)).unwrap(), TapOutcome::Dismissed);
        assert_eq!(sheet.tap(RowPosition::item(1)).unwrap(), TapOutcome::Ignored);
        assert_eq!(harness.drain_selected().len(), 1);
    }

    // --- header -----------------------------------------------------------

    #[test]
    fn test_header_replacement_detaches_before_attaching() {
        let mut sheet = sheet(Vec::new());
        let log = RecordingHeader::log();

        sheet
            .set_header(Some(Box::new(RecordingHeader::new("first", 100.0, &log))))
            .unwrap();
        let previous = sheet
            .set_header(Some(Box::new(RecordingHeader::new("second", 100.0, &log))))
            .unwrap();

        assert!(previous.is_some());
        assert_eq!(
            *log.borrow(),
            vec!["attach first", "detach first", "attach second"]
        );
    }

    #[test]
    fn test_negative_header_is_rejected_and_keeps_previous() {
        let mut sheet = sheet(Vec::new());
        let log = RecordingHeader::log();
        sheet
            .set_header(Some(Box::new(RecordingHeader::new("ok", 3.0, &log))))
            .unwrap();

        let err = sheet
            .set_header(Some(Box::new(RecordingHeader::new("bad", -1.0, &log))))
            .unwrap_err();

        assert!(matches!(err, SheetError::InvalidConfiguration { .. }));
        assert_eq!(sheet.header_height().unwrap(), 3.0);
        assert_eq!(*log.borrow(), vec!["attach ok"]);
    }

    // --- sizing -----------------------------------------------------------

    #[test]
    fn test_buttons_height() {
        let rows = || {
            vec![
                Row::item("foo"),
                Row::item("bar"),
                Row::ok_button("OK"),
                Row::cancel_button("Cancel"),
            ]
        };

        let no_buttons = sheet(vec![Row::item("foo"), Row::item("bar")]);
        assert_eq!(no_buttons.buttons_height().unwrap(), 0.0);
        assert_eq!(no_buttons.buttons_total_height().unwrap(), 0.0);

        let mut with_buttons = sheet(rows());
        with_buttons.prepare_for_presentation().unwrap();
        assert_eq!(with_buttons.buttons_height().unwrap(), 50.0);
        assert_eq!(with_buttons.buttons_total_height().unwrap(), 60.0);
    }

    #[test]
    fn test_items_height() {
        let no_items = sheet(vec![Row::ok_button("OK"), Row::cancel_button("Cancel")]);
        assert_eq!(no_items.items_height().unwrap(), 0.0);
        assert_eq!(no_items.items_total_height().unwrap(), 0.0);

        let mut with_items = sheet(vec![
            Row::item("foo"),
            Row::item("bar"),
            Row::ok_button("OK"),
            Row::cancel_button("Cancel"),
        ]);
        with_items.prepare_for_presentation().unwrap();
        assert_eq!(with_items.items_height().unwrap(), 100.0);
        assert_eq!(with_items.items_total_height().unwrap(), 110.0);
        assert_eq!(with_items.content_height().unwrap(), 170.0);
    }

    #[test]
    fn test_header_height() {
        let mut sheet = sheet(Vec::new());
        sheet.prepare_for_presentation().unwrap();
        assert_eq!(sheet.header_height().unwrap(), 0.0);
        assert_eq!(sheet.header_total_height().unwrap(), 0.0);

        sheet.set_header(Some(Box::new(header(100)))).unwrap();
        assert_eq!(sheet.header_height().unwrap(), 100.0);
        assert_eq!(sheet.header_total_height().unwrap(), 110.0);
    }

    #[test]
    fn test_content_height_scenarios() {
        let rows = |with_button: bool| {
            let mut rows = vec![Row::title("Sheeeeeeeeet!"), Row::item("foo"), Row::item("bar")];
            if with_button {
                rows.push(Row::ok_button("OK"));
            }
            rows
        };

        let mut only_items = sheet(rows(false));
        only_items.prepare_for_presentation().unwrap();
        assert_eq!(only_items.content_height().unwrap(), 160.0);

        let mut with_header = sheet(rows(false));
        with_header.set_header(Some(Box::new(header(100)))).unwrap();
        with_header.prepare_for_presentation().unwrap();
        assert_eq!(with_header.content_height().unwrap(), 270.0);

        let mut with_buttons = sheet(rows(true));
        with_buttons.prepare_for_presentation().unwrap();
        assert_eq!(with_buttons.content_height().unwrap(), 190.0);

        let mut with_both = sheet(rows(true));
        with_both.set_header(Some(Box::new(header(100)))).unwrap();
        with_both.prepare_for_presentation().unwrap();
        assert_eq!(with_both.content_height().unwrap(), 300.0);
    }

    #[test]
    fn test_content_width_uses_preferred_content_size_width() {
        let mut sheet = sheet(Vec::new());
        sheet
            .set_preferred_content_size(Size::new(123.0, 0.0))
            .unwrap();
        assert_eq!(sheet.content_width(), 123.0);
    }

    #[test]
    fn test_preferred_content_size_uses_content_height() {
        let mut sheet = sheet(vec![Row::item("foo"), Row::item("bar")]);
        sheet
            .set_preferred_content_size(Size::new(10.0, 20.0))
            .unwrap();

        let size = sheet.preferred_content_size().unwrap();
        assert_eq!(size, Size::new(10.0, 110.0));
    }

    #[test]
    fn test_preferred_popover_size() {
        let mut sheet = sheet(vec![Row::item("foo"), Row::item("bar")]);
        sheet.update_appearance(|a| a.set_popover_width(123.0)).unwrap();

        let size = sheet.preferred_popover_size().unwrap();
        assert_eq!(size.width, 123.0);
        assert_eq!(size.height, 110.0);
    }

    #[test]
    fn test_sizing_reads_are_idempotent() {
        let sheet = sheet(vec![Row::item("foo"), Row::ok_button("OK")]);
        let first = sheet.layout().unwrap();
        let second = sheet.layout().unwrap();
        assert_eq!(first, second);
        assert_eq!(sheet.content_height().unwrap(), first.content_height);
    }

    #[test]
    fn test_title_rows_use_configured_title_height() {
        let mut sheet = sheet(vec![Row::title("Sheet"), Row::item("foo")]);
        assert_eq!(sheet.items_height().unwrap(), 100.0);

        sheet
            .update_appearance(|a| a.set_title_height(Some(5.0)))
            .unwrap();
        assert_eq!(sheet.items_height().unwrap(), 55.0);
    }

    struct Doubled;

    impl RowHeights for Doubled {
        fn row_height(&self, row: &Row, cx: &HeightContext<'_>) -> f32 {
            cx.appearance.height_for(row.kind()) * 2.0
        }
    }

    /// Reports the width a row is measured at as its height
    struct WidthAsHeight;

    impl RowHeights for WidthAsHeight {
        fn row_height(&self, _row: &Row, cx: &HeightContext<'_>) -> f32 {
            cx.content_width
        }
    }

    #[test]
    fn test_rows_are_measured_at_the_drawn_width() {
        let mut modal = sheet(vec![Row::item("foo")]);
        modal.set_row_heights(WidthAsHeight);
        assert_eq!(modal.items_height().unwrap(), 40.0);
        modal.set_content_width(80.0).unwrap();
        assert_eq!(modal.items_height().unwrap(), 80.0);

        // popovers are drawn popover_width wide whatever the content width
        let mut popover = ActionSheet::builder(vec![Row::item("foo")])
            .inherit_from(standard())
            .presenter(PopoverPresenter::new())
            .row_heights(WidthAsHeight)
            .build()
            .unwrap();
        popover.set_content_width(80.0).unwrap();
        assert_eq!(popover.items_height().unwrap(), 40.0);

        assert_eq!(popover.layout_for_width(12.0).unwrap().items_height, 12.0);
        assert!(popover.layout_for_width(-1.0).is_err());
    }

    #[test]
    fn test_row_heights_source_is_authoritative() {
        let mut sheet = sheet(vec![Row::item("foo"), Row::ok_button("OK")]);
        sheet.set_row_heights(Doubled);

        assert_eq!(sheet.items_height().unwrap(), 100.0);
        assert_eq!(sheet.buttons_height().unwrap(), 40.0);
    }
}

//! Row descriptors shown by an action sheet

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ROW_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a row
///
/// Clones of a row share its id, so a row can be recognised after it has
/// been partitioned into the item or button group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    fn next() -> Self {
        RowId(NEXT_ROW_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value
    pub fn get(self) -> u64 {
        self.0
    }
}

/// The two groups a sheet splits its rows into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowGroup {
    Items,
    Buttons,
}

/// What a row is, and the state that belongs to that kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// Plain selectable item
    Item,
    /// Item with an on/off state that flips on every tap
    Toggle { is_toggled: bool },
    /// Non-interactive title at the top of the items
    Title,
    /// Non-interactive title for a run of items
    SectionTitle,
    /// Blank separator between runs of items
    SectionMargin,
    /// Confirming button
    OkButton,
    /// Cancelling button
    CancelButton,
    /// Any other button
    Button,
}

impl RowKind {
    /// Group the partitioner puts this kind in
    pub fn group(self) -> RowGroup {
        match self {
            RowKind::OkButton | RowKind::CancelButton | RowKind::Button => RowGroup::Buttons,
            _ => RowGroup::Items,
        }
    }

    pub fn is_button(self) -> bool {
        self.group() == RowGroup::Buttons
    }

    /// Whether a tap on this kind closes the sheet unless overridden
    pub fn dismisses_by_default(self) -> bool {
        !matches!(self, RowKind::Toggle { .. })
    }

    /// Whether the user can tap this kind at all
    pub fn is_tappable(self) -> bool {
        !matches!(
            self,
            RowKind::Title | RowKind::SectionTitle | RowKind::SectionMargin
        )
    }

    /// Short lowercase name used in logs
    pub fn name(self) -> &'static str {
        match self {
            RowKind::Item => "item",
            RowKind::Toggle { .. } => "toggle",
            RowKind::Title => "title",
            RowKind::SectionTitle => "section_title",
            RowKind::SectionMargin => "section_margin",
            RowKind::OkButton => "ok_button",
            RowKind::CancelButton => "cancel_button",
            RowKind::Button => "button",
        }
    }
}

/// A single row of an action sheet
///
/// Rows are plain data. The only state that changes after construction is
/// the toggle flag of [`RowKind::Toggle`], flipped when the row is tapped.
///
/// # Example
///
/// ```
/// use tui_sheet_core::row::{Row, RowKind};
///
/// let row = Row::toggle("Wi-Fi", false);
/// assert_eq!(row.kind(), RowKind::Toggle { is_toggled: false });
/// assert!(!row.dismisses_on_select());
///
/// let cancel = Row::cancel_button("Cancel");
/// assert!(cancel.kind().is_button());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: RowId,
    kind: RowKind,
    title: String,
    value: Option<serde_json::Value>,
    dismisses_on_select: bool,
}

impl Row {
    /// Create a row of any kind with that kind's default dismissal behavior
    pub fn new(kind: RowKind, title: impl Into<String>) -> Self {
        Self {
            id: RowId::next(),
            kind,
            title: title.into(),
            value: None,
            dismisses_on_select: kind.dismisses_by_default(),
        }
    }

    pub fn item(title: impl Into<String>) -> Self {
        Self::new(RowKind::Item, title)
    }

    pub fn toggle(title: impl Into<String>, is_toggled: bool) -> Self {
        Self::new(RowKind::Toggle { is_toggled }, title)
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self::new(RowKind::Title, title)
    }

    pub fn section_title(title: impl Into<String>) -> Self {
        Self::new(RowKind::SectionTitle, title)
    }

    pub fn section_margin() -> Self {
        Self::new(RowKind::SectionMargin, "")
    }

    pub fn ok_button(title: impl Into<String>) -> Self {
        Self::new(RowKind::OkButton, title)
    }

    pub fn cancel_button(title: impl Into<String>) -> Self {
        Self::new(RowKind::CancelButton, title)
    }

    pub fn button(title: impl Into<String>) -> Self {
        Self::new(RowKind::Button, title)
    }

    /// Attach a payload that selection callbacks can read back
    pub fn with_value(mut self, value: serde_json::Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Override whether tapping this row closes the sheet
    pub fn dismissing(mut self, dismisses_on_select: bool) -> Self {
        self.dismisses_on_select = dismisses_on_select;
        self
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn kind(&self) -> RowKind {
        self.kind
    }

    pub fn title_text(&self) -> &str {
        &self.title
    }

    pub fn value(&self) -> Option<&serde_json::Value> {
        self.value.as_ref()
    }

    pub fn dismisses_on_select(&self) -> bool {
        self.dismisses_on_select
    }

    /// Toggle state, or `None` for rows that are not toggles
    pub fn is_toggled(&self) -> Option<bool> {
        match self.kind {
            RowKind::Toggle { is_toggled } => Some(is_toggled),
            _ => None,
        }
    }

    /// Flip the toggle state. Returns `false` for rows that are not toggles.
    pub(crate) fn flip_toggle(&mut self) -> bool {
        match &mut self.kind {
            RowKind::Toggle { is_toggled } => {
                *is_toggled = !*is_toggled;
                true
            }
            _ => false,
        }
    }
}

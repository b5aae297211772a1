//! Stable split of a row sequence into items and buttons

use tracing::trace;

use crate::error::{Result, SheetError};
use crate::row::{Row, RowGroup};

/// Rows split into the item group and the button group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub items: Vec<Row>,
    pub buttons: Vec<Row>,
}

impl Partition {
    /// Total number of rows across both groups
    pub fn len(&self) -> usize {
        self.items.len() + self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that no row was lost or duplicated
    pub fn verify(&self, input_len: usize) -> Result<()> {
        if self.len() == input_len {
            Ok(())
        } else {
            Err(SheetError::InvariantViolation {
                input: input_len,
                items: self.items.len(),
                buttons: self.buttons.len(),
            })
        }
    }
}

/// Split rows into items and buttons, keeping input order inside each group
///
/// Ok, cancel and generic buttons go to `buttons`; everything else,
/// titles included, goes to `items`.
///
/// ```
/// use tui_sheet_core::partition::partition;
/// use tui_sheet_core::row::Row;
///
/// let split = partition(vec![
///     Row::item("foo"),
///     Row::ok_button("OK"),
///     Row::item("bar"),
/// ]);
/// assert_eq!(split.items.len(), 2);
/// assert_eq!(split.buttons.len(), 1);
/// assert_eq!(split.items[1].title_text(), "bar");
/// ```
pub fn partition(rows: impl IntoIterator<Item = Row>) -> Partition {
    let mut split = Partition::default();
    for row in rows {
        match row.kind().group() {
            RowGroup::Items => split.items.push(row),
            RowGroup::Buttons => split.buttons.push(row),
        }
    }
    trace!(
        items = split.items.len(),
        buttons = split.buttons.len(),
        "Partitioned rows"
    );
    split
}

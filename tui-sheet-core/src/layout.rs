//! Sheet geometry: per-row heights, group totals and preferred sizes
//!
//! Every group (header, items, buttons) is charged one `content_inset`,
//! but only when the group has a non-zero height, so a sheet without a
//! header or buttons carries no empty margins.

use serde::{Deserialize, Serialize};

use crate::appearance::Appearance;
use crate::error::{Result, SheetError};
use crate::row::Row;

/// Width and height in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Inputs a renderer gets when reporting a row height
#[derive(Debug, Clone, Copy)]
pub struct HeightContext<'a> {
    pub appearance: &'a Appearance,
    /// Width rows are laid out in
    pub content_width: f32,
}

/// Source of per-row heights
///
/// Renderers implement this to report the height they will actually give a
/// row (wrapped titles, reserved checkmark space). The sizing engine treats
/// the reported value as authoritative.
pub trait RowHeights {
    fn row_height(&self, row: &Row, cx: &HeightContext<'_>) -> f32;
}

/// Heights looked up by row kind from the appearance
#[derive(Debug, Clone, Copy, Default)]
pub struct AppearanceHeights;

impl RowHeights for AppearanceHeights {
    fn row_height(&self, row: &Row, cx: &HeightContext<'_>) -> f32 {
        cx.appearance.height_for(row.kind())
    }
}

/// Height of a group plus its inset, or zero for an empty group
pub fn group_total(height: f32, inset: f32) -> f32 {
    if height > 0.0 {
        height + inset
    } else {
        0.0
    }
}

/// Computed geometry of a sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetLayout {
    pub header_height: f32,
    pub header_total_height: f32,
    pub item_heights: Vec<f32>,
    pub items_height: f32,
    pub items_total_height: f32,
    pub button_heights: Vec<f32>,
    pub buttons_height: f32,
    pub buttons_total_height: f32,
    pub content_inset: f32,
    pub content_height: f32,
}

impl SheetLayout {
    /// Compute the layout of a sheet
    ///
    /// Fails with [`SheetError::InvalidConfiguration`] if the header or the
    /// height source reports a negative or non-finite height.
    pub fn compute(
        items: &[Row],
        buttons: &[Row],
        header_height: f32,
        cx: &HeightContext<'_>,
        heights: &dyn RowHeights,
    ) -> Result<Self> {
        let header_height = SheetError::check_length("header height", header_height)?;
        let inset = cx.appearance.content_inset();

        let item_heights = measure(items, cx, heights)?;
        let button_heights = measure(buttons, cx, heights)?;
        let items_height: f32 = item_heights.iter().sum();
        let buttons_height: f32 = button_heights.iter().sum();

        let header_total_height = group_total(header_height, inset);
        let items_total_height = group_total(items_height, inset);
        let buttons_total_height = group_total(buttons_height, inset);

        Ok(Self {
            header_height,
            header_total_height,
            item_heights,
            items_height,
            items_total_height,
            button_heights,
            buttons_height,
            buttons_total_height,
            content_inset: inset,
            content_height: header_total_height + items_total_height + buttons_total_height,
        })
    }
}

fn measure(rows: &[Row], cx: &HeightContext<'_>, heights: &dyn RowHeights) -> Result<Vec<f32>> {
    rows.iter()
        .map(|row| SheetError::check_length("row height", heights.row_height(row, cx)))
        .collect()
}

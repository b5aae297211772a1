//! Appearance configuration: row heights, insets and popover sizing
//!
//! All lengths are terminal cells. Every setter rejects negative or
//! non-finite values with [`SheetError::InvalidConfiguration`] before
//! touching the configuration.
//!
//! # Copy vs share
//!
//! There is one process-wide [`standard`] appearance. An action sheet that is
//! never given an explicit appearance copies the standard values the first
//! time its appearance is read; later changes to the standard do not reach
//! it. A sheet given a [`SharedAppearance`] reads that handle live, so every
//! change made through any clone of the handle shows up in its sizing.

use std::sync::{Arc, LazyLock};

use parking_lot::{RwLock, RwLockReadGuard};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};
use crate::row::RowKind;

/// Heights, insets and popover width used to size an action sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    item_height: f32,
    title_height: Option<f32>,
    section_title_height: f32,
    /// Height of `SectionMargin` rows, not spacing between groups
    section_margin: f32,
    ok_button_height: f32,
    cancel_button_height: f32,
    button_height: f32,
    content_inset: f32,
    popover_width: f32,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            item_height: 1.0,
            title_height: None,
            section_title_height: 1.0,
            section_margin: 1.0,
            ok_button_height: 1.0,
            cancel_button_height: 1.0,
            button_height: 1.0,
            content_inset: 1.0,
            popover_width: 40.0,
        }
    }
}

impl Appearance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an appearance from JSON, filling missing fields with defaults
    ///
    /// ```
    /// use tui_sheet_core::appearance::Appearance;
    ///
    /// let appearance = Appearance::from_json(r#"{ "item_height": 2, "popover_width": 60 }"#).unwrap();
    /// assert_eq!(appearance.item_height(), 2.0);
    /// assert_eq!(appearance.content_inset(), 1.0);
    ///
    /// assert!(Appearance::from_json(r#"{ "content_inset": -1 }"#).is_err());
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let appearance: Appearance = serde_json::from_str(json)?;
        appearance.validate()?;
        Ok(appearance)
    }

    /// Check every field, reporting the first invalid one
    pub fn validate(&self) -> Result<()> {
        SheetError::check_length("item height", self.item_height)?;
        if let Some(height) = self.title_height {
            SheetError::check_length("title height", height)?;
        }
        SheetError::check_length("section title height", self.section_title_height)?;
        SheetError::check_length("section margin", self.section_margin)?;
        SheetError::check_length("ok button height", self.ok_button_height)?;
        SheetError::check_length("cancel button height", self.cancel_button_height)?;
        SheetError::check_length("button height", self.button_height)?;
        SheetError::check_length("content inset", self.content_inset)?;
        SheetError::check_length("popover width", self.popover_width)?;
        Ok(())
    }

    /// Configured height for a row kind
    ///
    /// Titles use `title_height` when set and `item_height` otherwise.
    /// Section margins are as tall as `section_margin`.
    pub fn height_for(&self, kind: RowKind) -> f32 {
        match kind {
            RowKind::Item | RowKind::Toggle { .. } => self.item_height,
            RowKind::Title => self.title_height.unwrap_or(self.item_height),
            RowKind::SectionTitle => self.section_title_height,
            RowKind::SectionMargin => self.section_margin,
            RowKind::OkButton => self.ok_button_height,
            RowKind::CancelButton => self.cancel_button_height,
            RowKind::Button => self.button_height,
        }
    }

    pub fn item_height(&self) -> f32 {
        self.item_height
    }

    pub fn set_item_height(&mut self, height: f32) -> Result<()> {
        self.item_height = SheetError::check_length("item height", height)?;
        Ok(())
    }

    /// Title height, `None` when titles follow `item_height`
    pub fn title_height(&self) -> Option<f32> {
        self.title_height
    }

    pub fn set_title_height(&mut self, height: Option<f32>) -> Result<()> {
        self.title_height = height
            .map(|h| SheetError::check_length("title height", h))
            .transpose()?;
        Ok(())
    }

    pub fn section_title_height(&self) -> f32 {
        self.section_title_height
    }

    pub fn set_section_title_height(&mut self, height: f32) -> Result<()> {
        self.section_title_height = SheetError::check_length("section title height", height)?;
        Ok(())
    }

    /// Height given to [`RowKind::SectionMargin`] separator rows
    ///
    /// Spacing between the header, items and buttons comes from
    /// [`content_inset`](Self::content_inset) instead; this value only sizes
    /// the separator rows placed inside the items.
    pub fn section_margin(&self) -> f32 {
        self.section_margin
    }

    pub fn set_section_margin(&mut self, height: f32) -> Result<()> {
        self.section_margin = SheetError::check_length("section margin", height)?;
        Ok(())
    }

    pub fn ok_button_height(&self) -> f32 {
        self.ok_button_height
    }

    pub fn set_ok_button_height(&mut self, height: f32) -> Result<()> {
        self.ok_button_height = SheetError::check_length("ok button height", height)?;
        Ok(())
    }

    pub fn cancel_button_height(&self) -> f32 {
        self.cancel_button_height
    }

    pub fn set_cancel_button_height(&mut self, height: f32) -> Result<()> {
        self.cancel_button_height = SheetError::check_length("cancel button height", height)?;
        Ok(())
    }

    pub fn button_height(&self) -> f32 {
        self.button_height
    }

    pub fn set_button_height(&mut self, height: f32) -> Result<()> {
        self.button_height = SheetError::check_length("button height", height)?;
        Ok(())
    }

    /// Margin charged once per non-empty group (header, items, buttons)
    pub fn content_inset(&self) -> f32 {
        self.content_inset
    }

    pub fn set_content_inset(&mut self, inset: f32) -> Result<()> {
        self.content_inset = SheetError::check_length("content inset", inset)?;
        Ok(())
    }

    pub fn popover_width(&self) -> f32 {
        self.popover_width
    }

    pub fn set_popover_width(&mut self, width: f32) -> Result<()> {
        self.popover_width = SheetError::check_length("popover width", width)?;
        Ok(())
    }
}

/// Shared, mutable appearance handle
///
/// Clones point at the same configuration. Sheets built with a handle read
/// it on every sizing pass.
#[derive(Debug, Clone, Default)]
pub struct SharedAppearance(Arc<RwLock<Appearance>>);

impl SharedAppearance {
    pub fn new(appearance: Appearance) -> Self {
        Self(Arc::new(RwLock::new(appearance)))
    }

    /// Borrow the current values
    pub fn read(&self) -> RwLockReadGuard<'_, Appearance> {
        self.0.read()
    }

    /// Copy of the current values
    pub fn snapshot(&self) -> Appearance {
        self.0.read().clone()
    }

    /// Mutate the configuration
    ///
    /// The closure runs on a scratch copy that is committed only if it
    /// returns `Ok`, so a rejected setter leaves the handle untouched.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Appearance) -> Result<()>,
    {
        let mut guard = self.0.write();
        let mut scratch = guard.clone();
        f(&mut scratch)?;
        *guard = scratch;
        Ok(())
    }

    /// Whether both handles refer to the same configuration
    pub fn ptr_eq(&self, other: &SharedAppearance) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Appearance> for SharedAppearance {
    fn from(appearance: Appearance) -> Self {
        Self::new(appearance)
    }
}

static STANDARD: LazyLock<SharedAppearance> = LazyLock::new(SharedAppearance::default);

/// The process-wide standard appearance
///
/// Sheets without an explicit appearance copy from this handle unless the
/// builder was told to inherit from a different one.
pub fn standard() -> SharedAppearance {
    STANDARD.clone()
}

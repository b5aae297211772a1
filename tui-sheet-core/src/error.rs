//! Error type shared by every sheet operation

use std::fmt;

use crate::sheet::RowPosition;

/// Boxed error returned by selection callbacks
pub type SelectError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used throughout the crate
pub type Result<T, E = SheetError> = std::result::Result<T, E>;

/// Errors raised by action sheet configuration, sizing and selection
#[derive(Debug)]
pub enum SheetError {
    /// A height, margin or width was negative or not finite
    InvalidConfiguration { field: &'static str, value: f32 },
    /// The partitioner lost or duplicated rows
    InvariantViolation {
        input: usize,
        items: usize,
        buttons: usize,
    },
    /// No row exists at the tapped position
    RowOutOfRange { position: RowPosition },
    /// The selection callback failed
    Selection(SelectError),
    /// Appearance or keymap JSON could not be parsed
    Config(serde_json::Error),
}

impl SheetError {
    /// Validate a configured length, returning it unchanged when usable
    pub(crate) fn check_length(field: &'static str, value: f32) -> Result<f32> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(SheetError::InvalidConfiguration { field, value })
        }
    }
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetError::InvalidConfiguration { field, value } => {
                write!(f, "Invalid {}: {} (expected a finite value >= 0)", field, value)
            }
            SheetError::InvariantViolation {
                input,
                items,
                buttons,
            } => write!(
                f,
                "Partition of {} rows produced {} items and {} buttons",
                input, items, buttons
            ),
            SheetError::RowOutOfRange { position } => {
                write!(f, "No row at {:?} {}", position.group, position.index)
            }
            SheetError::Selection(e) => write!(f, "Selection action failed: {}", e),
            SheetError::Config(e) => write!(f, "Invalid sheet configuration: {}", e),
        }
    }
}

impl std::error::Error for SheetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SheetError::Selection(e) => Some(e.as_ref()),
            SheetError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SheetError {
    fn from(e: serde_json::Error) -> Self {
        SheetError::Config(e)
    }
}

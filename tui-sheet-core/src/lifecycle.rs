//! Presentation lifecycle: preparation passes and one-shot dismissal

use tracing::trace;

/// Where a sheet is in its display cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationPhase {
    /// Not yet laid out, or dismissed
    #[default]
    Idle,
    /// At least one preparation pass has run for the current presentation
    Prepared,
}

/// Tracks preparation passes and dismissal for one sheet
///
/// Every layout notification runs a full preparation pass, even when the
/// sheet is already prepared, so repeated passes always see current state.
/// Dismissal happens once; later requests are reported as repeats.
#[derive(Debug, Clone, Default)]
pub struct PresentationGuard {
    phase: PresentationPhase,
    preparations: usize,
    dismissed: bool,
}

impl PresentationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PresentationPhase {
        self.phase
    }

    /// Number of preparation passes run so far
    pub fn preparations(&self) -> usize {
        self.preparations
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// Record a completed preparation pass
    pub(crate) fn mark_prepared(&mut self) {
        self.preparations += 1;
        if self.phase == PresentationPhase::Idle {
            trace!("Sheet prepared for presentation");
        }
        self.phase = PresentationPhase::Prepared;
    }

    /// Claim the dismissal. Returns `false` if the sheet was already dismissed.
    pub(crate) fn begin_dismissal(&mut self) -> bool {
        if self.dismissed {
            return false;
        }
        self.dismissed = true;
        self.phase = PresentationPhase::Idle;
        true
    }
}

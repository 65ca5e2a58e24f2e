use crate::surface::PresentError;

/// How a drain ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DrainOutcome {
    /// Nothing queued and nothing to re-present.
    Idle,
    /// All queued operations ran and one frame was presented.
    Presented,
    /// The host went to the background; remaining operations stay queued.
    Suspended,
    /// The surface could not take a frame; nothing ran.
    SurfaceNotReady,
    /// All queued operations ran but presenting failed.
    PresentFailed(PresentError),
}

/// Summary of one `drain_and_present` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrainReport {
    pub outcome: DrainOutcome,
    /// Operations taken off the queue, including skipped empty fragments.
    pub executed: usize,
    /// Empty fragments skipped.
    pub skipped_empty: usize,
    /// Operations still queued afterwards.
    pub remaining: usize,
}

impl DrainReport {
    #[inline]
    pub(crate) fn new(outcome: DrainOutcome) -> Self {
        Self {
            outcome,
            executed: 0,
            skipped_empty: 0,
            remaining: 0,
        }
    }

    #[inline]
    pub fn presented(&self) -> bool {
        self.outcome == DrainOutcome::Presented
    }
}

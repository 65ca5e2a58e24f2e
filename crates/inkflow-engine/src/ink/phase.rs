/// Where the in-progress stroke is in its life.
///
/// ```text
/// NotStarted --fragment--> InProgress --final fragment--> Ended
///     ^                                                     |
///     +--------------- commit / discard --------------------+
/// ```
///
/// Only one stroke is in progress at a time; capture sources deliver strokes
/// sequentially, so the buffer only observes the transitions above.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum StrokePhase {
    #[default]
    NotStarted,
    /// Fragments are accumulating in the raster target.
    InProgress,
    /// The final fragment arrived; waiting for the commit operation.
    Ended,
}

impl StrokePhase {
    /// Phase after a non-empty fragment is drawn.
    #[inline]
    pub fn on_fragment(self, is_final: bool) -> StrokePhase {
        if is_final {
            StrokePhase::Ended
        } else {
            StrokePhase::InProgress
        }
    }

    /// Phase after the raster target is committed or discarded.
    #[inline]
    pub fn on_finish(self) -> StrokePhase {
        StrokePhase::NotStarted
    }
}

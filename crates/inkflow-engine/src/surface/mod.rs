//! Display surface contract.
//!
//! The render buffer hands a `Frame` to a `DisplaySurface` once per tick that
//! has work. Surfaces decide how the frame reaches the screen; all of them
//! share `Frame::composite` for the actual pixels. Surfaces that keep the
//! previous frame can repaint only `Frame::damage` with
//! `Frame::composite_damage`.

mod frame;
mod snapshot;

pub use frame::{Damage, Frame, VectorLayer};
pub use snapshot::SnapshotSurface;

/// Why a frame could not be presented.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum PresentError {
    /// Transient; the same frame is presented again next tick.
    #[error("display surface not ready")]
    NotReady,
    /// The surface was lost and reconfigured; present again next tick.
    #[error("display surface lost")]
    Lost,
    /// The surface cannot be used any more.
    #[error("display surface failed: {0}")]
    Fatal(String),
}

impl PresentError {
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, PresentError::Fatal(_))
    }
}

/// Target of presented frames.
pub trait DisplaySurface {
    /// Whether the surface can accept a frame right now.
    fn is_ready(&self) -> bool {
        true
    }

    /// Presents one frame.
    fn present(&mut self, frame: &Frame<'_>) -> Result<(), PresentError>;
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for &mut S {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn present(&mut self, frame: &Frame<'_>) -> Result<(), PresentError> {
        (**self).present(frame)
    }
}

//! Raster target for in-progress ink.
//!
//! Pixels here only ever belong to the stroke currently being drawn; a
//! finished stroke is cleared from the target when its vector layer lands.

mod brush;
mod target;

pub use brush::Brush;
pub use target::{RasterError, RasterTarget};

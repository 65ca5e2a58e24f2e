//! Stroke data model.
//!
//! - `InkPoint`: one sample (position + optional width channel)
//! - `StrokeFragment`: a slice of a stroke as delivered by a capture source
//! - `VectorPath`: the filled outline a finished stroke becomes
//! - `StrokePhase`: per-stroke state tracked by the render buffer

mod fragment;
mod path;
mod phase;
mod point;

pub use fragment::StrokeFragment;
pub use path::VectorPath;
pub use phase::StrokePhase;
pub use point::InkPoint;

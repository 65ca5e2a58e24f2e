//! Stroke render buffer.
//!
//! Accumulates draw operations from capture sources and presents them at the
//! display's refresh cadence:
//! - producers append through `StrokeSink` from any thread
//! - the render loop calls `drain_and_present` once per tick
//! - finished strokes move from the raster target to vector layers

mod config;
mod render_buffer;
mod report;

pub use config::BufferConfig;
pub use render_buffer::RenderBuffer;
pub use report::{DrainOutcome, DrainReport};

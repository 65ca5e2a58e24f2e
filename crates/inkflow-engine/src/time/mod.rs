//! Time subsystem.
//!
//! Refresh tick timing, decoupled from the runtime so it can be tested.
//! Call `tick()` once per display refresh before draining the render buffer.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};

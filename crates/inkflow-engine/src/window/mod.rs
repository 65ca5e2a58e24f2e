//! Window + runtime loop.
//!
//! Owns the `winit` event loop and the window, wires them to the GPU layer,
//! and publishes the host lifecycle.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};

//! Pointer input.
//!
//! Public API does not expose winit types. The runtime feeds raw platform
//! changes into `PointerState`, which emits `PointerEvent`s for the app.

mod pointer;

pub use pointer::{PointerEvent, PointerState};

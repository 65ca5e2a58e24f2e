//! Foreground/background state.
//!
//! A single guard, written by the runtime and consulted by the render buffer
//! before every draw operation.

mod guard;

pub use guard::{AlwaysActive, AppPhase, Lifecycle, SuspendGuard};

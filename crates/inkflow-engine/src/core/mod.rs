//! Core engine-facing contracts.
//!
//! The stable interface between the platform runtime and the application:
//! the `App` callbacks and the per-frame context they receive.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, GpuSurface, WindowCtx};

pub(crate) use ctx::viewport_of;

//! GPU rendering subsystem.
//!
//! The canvas is composited on the CPU (`surface::Frame::composite`); the
//! GPU side only uploads that image and draws it over the swapchain.

mod blit;
mod ctx;

pub use blit::BlitRenderer;
pub use ctx::RenderCtx;

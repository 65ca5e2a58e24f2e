//! Draw operation stream.
//!
//! Responsibilities:
//! - define the deferred operations a capture source can request
//! - carry them from producer threads to the render buffer in arrival order

mod cmd;
mod queue;

pub use cmd::DrawOp;
pub use queue::{op_channel, OpQueue, QueuedOp, StrokeSink};

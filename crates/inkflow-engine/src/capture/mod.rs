//! Ink capture side.
//!
//! - `InkCaptureSource`: start/stop contract for anything that produces ink
//! - `StrokeBuilder`: turns began/moved/ended callbacks into draw operations
//! - `DeviceTransform` / `DeviceKind`: map device sensor space into the view
//! - `ConnectionStatus`: device connection state machine

mod builder;
mod device_kind;
mod source;
mod status;
mod transform;

pub use builder::StrokeBuilder;
pub use device_kind::DeviceKind;
pub use source::InkCaptureSource;
pub use status::{ConnectFailure, ConnectionStatus, PairingPrompt, StatusEvent, TransitionError};
pub use transform::DeviceTransform;

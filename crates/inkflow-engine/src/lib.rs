//! Inkflow engine crate.
//!
//! This crate owns the stroke render buffer and the platform + GPU runtime
//! pieces that present it.

pub mod buffer;
pub mod capture;
pub mod core;
pub mod device;
pub mod ink;
pub mod input;
pub mod lifecycle;
pub mod ops;
pub mod raster;
pub mod render;
pub mod surface;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;

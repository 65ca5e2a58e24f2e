//! Paint model shared by the raster target, compositor and renderers.
//!
//! Colors are premultiplied RGBA. Geometry types remain in `coords`.

pub mod color;

pub use color::Color;

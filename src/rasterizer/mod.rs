//! Software rasterizer
//!
//! Features:
//! - Perspective camera with screen-ray picking
//! - Affine texture mapping for 8x8 tile quads
//! - Depth and stencil buffers (stencil drives the highlight wash)

mod math;
mod types;
mod render;

pub use math::*;
pub use types::*;
pub use render::*;

/// Framebuffer dimensions (NES output doubled)
pub const WIDTH: usize = 512;
pub const HEIGHT: usize = 480;

//! Rendering backend interface
//!
//! The compositor only ever talks to this trait. Mesh drawing, matrix
//! setup and palette upload belong to the implementation.

use crate::rasterizer::{Camera, Color, DepthStencilState};
use crate::scene::Palette;

/// One mesh draw positioned in scene pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshDraw {
    pub mesh: u32,
    pub x: i32,
    pub y: i32,
    pub palette: u8,
    pub mirror_h: bool,
    pub mirror_v: bool,
}

pub trait RenderBackend {
    /// Set up the 3D projection for this frame's camera
    fn begin_scene(&mut self, camera: &Camera);

    fn upload_palette(&mut self, palette: &Palette);

    fn set_depth_stencil(&mut self, state: DepthStencilState);

    fn draw_mesh(&mut self, draw: &MeshDraw);

    /// Switch to a screen-space projection for overlay drawing
    fn set_gui_projection(&mut self);

    /// Output size in screen pixels
    fn viewport_size(&self) -> (f32, f32);

    /// Solid rectangle in screen space (GUI projection)
    fn draw_rectangle(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);

    /// Line between two scene-pixel positions, drawn on the display plane
    fn draw_scene_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color);
}

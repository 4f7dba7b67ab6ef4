//! Software rendering backend
//!
//! Implements `RenderBackend` on top of the rasterizer framebuffer. Each
//! tile is a quad on the display plane, projected through the camera and
//! filled with two affine triangles.

use crate::rasterizer::{
    rasterize_quad, Camera, Color, DepthStencilState, Framebuffer, ScreenVertex, Vec2, Vec3,
};
use crate::scene::{Palette, ScenePlane};
use super::backend::{MeshDraw, RenderBackend};
use super::mesh::{MeshBank, MESH_SIZE};

/// Backend that draws into a borrowed framebuffer
pub struct SoftwareBackend<'a> {
    fb: &'a mut Framebuffer,
    meshes: &'a MeshBank,
    plane: ScenePlane,
    camera: Camera,
    palette: Palette,
    state: DepthStencilState,
    gui: bool,
    /// Meshes that were requested but missing, reported once per frame
    missing: usize,
}

impl<'a> SoftwareBackend<'a> {
    pub fn new(fb: &'a mut Framebuffer, meshes: &'a MeshBank, plane: ScenePlane) -> Self {
        Self {
            fb,
            meshes,
            plane,
            camera: Camera::new(),
            palette: Palette::default(),
            state: DepthStencilState::NORMAL,
            gui: false,
            missing: 0,
        }
    }

    /// Number of draws skipped because their mesh was missing
    pub fn missing_meshes(&self) -> usize {
        self.missing
    }

    fn project(&self, scene_x: f32, scene_y: f32) -> Option<Vec3> {
        let world = self.plane.pixel_to_world(scene_x, scene_y);
        self.camera.project(world, self.fb.width as f32, self.fb.height as f32)
    }
}

impl RenderBackend for SoftwareBackend<'_> {
    fn begin_scene(&mut self, camera: &Camera) {
        self.camera = camera.clone();
        self.gui = false;
    }

    fn upload_palette(&mut self, palette: &Palette) {
        self.palette = palette.clone();
    }

    fn set_depth_stencil(&mut self, state: DepthStencilState) {
        self.state = state;
    }

    fn draw_mesh(&mut self, draw: &MeshDraw) {
        let Some(mesh) = self.meshes.get(draw.mesh) else {
            self.missing += 1;
            return;
        };

        let size = MESH_SIZE as f32;
        let (x0, y0) = (draw.x as f32, draw.y as f32);
        let corners = [
            (x0, y0, 0.0, 0.0),
            (x0 + size, y0, 1.0, 0.0),
            (x0 + size, y0 + size, 1.0, 1.0),
            (x0, y0 + size, 0.0, 1.0),
        ];

        let mut screen = [ScreenVertex { pos: Vec3::ZERO, uv: Vec2::default() }; 4];
        for (out, (sx, sy, u, v)) in screen.iter_mut().zip(corners) {
            // Skip quads that cross the near plane
            let Some(pos) = self.project(sx, sy) else {
                return;
            };
            *out = ScreenVertex { pos, uv: Vec2::new(u, v) };
        }

        let palette = &self.palette;
        let sample = |u: f32, v: f32| {
            let tx = ((u * size) as usize).min(MESH_SIZE - 1);
            let ty = ((v * size) as usize).min(MESH_SIZE - 1);
            match mesh.texel(tx, ty, draw.mirror_h, draw.mirror_v) {
                0 => None,
                idx => Some(palette.color(draw.palette, idx)),
            }
        };

        rasterize_quad(self.fb, screen, self.state, sample);
    }

    fn set_gui_projection(&mut self) {
        self.gui = true;
    }

    fn viewport_size(&self) -> (f32, f32) {
        (self.fb.width as f32, self.fb.height as f32)
    }

    fn draw_rectangle(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        if !self.gui {
            log::warn!("draw_rectangle called without GUI projection");
        }
        self.fb.fill_rect(x, y, w, h, color, self.state.stencil_test);
    }

    fn draw_scene_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color) {
        let (Some(a), Some(b)) = (self.project(from.0, from.1), self.project(to.0, to.1)) else {
            return;
        };
        self.fb.draw_line(a.x as i32, a.y as i32, b.x as i32, b.y as i32, color);
    }
}

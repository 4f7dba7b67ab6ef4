//! Render Compositor - per-frame draw submission
//!
//! Highlighted or selected elements get an extra draw with stencil writes
//! enabled before their normal draw. The closing overlay wash is stencil
//! tested, so it only brightens those elements.

use crate::config::OverlayColors;
use crate::rasterizer::{Camera, DepthStencilState};
use crate::scene::{Highlight, Layer, Palette, SceneStore, SelectionSet};
use super::backend::{MeshDraw, RenderBackend};

/// Everything the compositor reads for one frame
pub struct FrameContext<'a> {
    pub camera: &'a Camera,
    pub palette: &'a Palette,
    pub store: &'a SceneStore,
    pub highlight: &'a Highlight,
    pub selection: &'a SelectionSet,
    pub overlay: &'a OverlayColors,
}

/// Which layers to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderFlags {
    pub background: bool,
    pub oam: bool,
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self { background: true, oam: true }
    }
}

/// Which editing overlays to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayFlags {
    pub nametable_grid: bool,
    pub oam_outlines: bool,
}

/// Draw one element, with the stencil-marking pass first when emphasised
fn draw_element<B: RenderBackend>(backend: &mut B, draw: &MeshDraw, emphasised: bool) {
    if emphasised {
        backend.set_depth_stencil(DepthStencilState::EMPHASIS);
        backend.draw_mesh(draw);
        backend.set_depth_stencil(DepthStencilState::NORMAL);
    }
    backend.draw_mesh(draw);
}

/// Render background, sprites and the highlight wash
pub fn render_frame<B: RenderBackend>(backend: &mut B, frame: &FrameContext, flags: RenderFlags) {
    backend.begin_scene(frame.camera);
    backend.upload_palette(frame.palette);
    backend.set_depth_stencil(DepthStencilState::NORMAL);

    if flags.background {
        let tile_size = frame.store.tile_size() as i32;
        let active_cell = frame.highlight.active_background_cell();

        for (x, y, cell, tile) in frame.store.background() {
            // Only non-empty cells are drawn
            let Some(mesh) = tile.mesh else {
                continue;
            };
            let draw = MeshDraw {
                mesh,
                x: x as i32 * tile_size,
                y: y as i32 * tile_size,
                palette: tile.palette,
                mirror_h: tile.mirror_h,
                mirror_v: tile.mirror_v,
            };
            let emphasised = frame.selection.contains(Layer::Background, cell) || active_cell == Some(cell);
            draw_element(backend, &draw, emphasised);
        }
    }

    if flags.oam {
        let active_sprite = frame.highlight.active_sprite();

        for (i, sprite) in frame.store.sprites().iter().enumerate() {
            let draw = MeshDraw {
                mesh: sprite.mesh,
                x: sprite.x,
                y: sprite.y,
                palette: sprite.palette,
                mirror_h: sprite.mirror_h,
                mirror_v: sprite.mirror_v,
            };
            let emphasised = frame.selection.contains(Layer::Sprite, i) || active_sprite == Some(i);
            if emphasised {
                // The stencil-marking draw doubles as the sprite's visible draw
                backend.set_depth_stencil(DepthStencilState::EMPHASIS);
                backend.draw_mesh(&draw);
                backend.set_depth_stencil(DepthStencilState::NORMAL);
            } else {
                backend.draw_mesh(&draw);
            }
        }
    }

    // Highlight wash over every stenciled pixel
    backend.set_depth_stencil(DepthStencilState::OVERLAY);
    backend.set_gui_projection();
    let (w, h) = backend.viewport_size();
    backend.draw_rectangle(0.0, 0.0, w, h, frame.overlay.highlight_wash);
}

/// Render the nametable grid and sprite outlines on the display plane
pub fn render_overlays<B: RenderBackend>(
    backend: &mut B,
    store: &SceneStore,
    nametable_size: (usize, usize),
    flags: OverlayFlags,
    colors: &OverlayColors,
) {
    backend.set_depth_stencil(DepthStencilState::OVERLAY);

    if flags.nametable_grid {
        let tile = store.tile_size() as f32;
        let (nt_w, nt_h) = nametable_size;

        for ny in (0..store.height()).step_by(nt_h.max(1)) {
            for nx in (0..store.width()).step_by(nt_w.max(1)) {
                let cols = nt_w.min(store.width() - nx);
                let rows = nt_h.min(store.height() - ny);
                let left = nx as f32 * tile;
                let top = ny as f32 * tile;
                let right = left + cols as f32 * tile;
                let bottom = top + rows as f32 * tile;

                for c in 0..=cols {
                    let x = left + c as f32 * tile;
                    backend.draw_scene_line((x, top), (x, bottom), colors.nametable_grid);
                }
                for r in 0..=rows {
                    let y = top + r as f32 * tile;
                    backend.draw_scene_line((left, y), (right, y), colors.nametable_grid);
                }
            }
        }
    }

    if flags.oam_outlines {
        let size = store.sprite_size() as f32;
        for sprite in store.sprites() {
            let (x0, y0) = (sprite.x as f32, sprite.y as f32);
            let (x1, y1) = (x0 + size, y0 + size);
            backend.draw_scene_line((x0, y0), (x1, y0), colors.sprite_outline);
            backend.draw_scene_line((x1, y0), (x1, y1), colors.sprite_outline);
            backend.draw_scene_line((x1, y1), (x0, y1), colors.sprite_outline);
            backend.draw_scene_line((x0, y1), (x0, y0), colors.sprite_outline);
        }
    }

    backend.set_depth_stencil(DepthStencilState::NORMAL);
}

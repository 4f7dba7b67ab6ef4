//! Editor session
//!
//! Owns everything the editor mutates from frame to frame: the camera,
//! the scene, hover and selection state, palettes and view toggles.
//! `main` drives it with one `update` and one `render` per frame.

use crate::compositor::{self, FrameContext, OverlayFlags, RenderBackend, RenderFlags};
use crate::config::SceneConfig;
use crate::rasterizer::Camera;
use crate::scene::{
    map_to_scene_pixel, populate_scene, Highlight, HoverTarget, PaletteBank, PopulateReport,
    ScenePixel, ScenePlane, SceneStore, SelectionSet, Snapshot, Sprite, Tile,
};
use crate::ui::MouseState;

/// Layer and overlay toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewFlags {
    pub render_background: bool,
    pub render_oam: bool,
    pub nametable_grid: bool,
    pub oam_outlines: bool,
    /// Whether sprites take part in hover
    pub hover_sprites: bool,
    /// Whether background cells take part in hover
    pub hover_background: bool,
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self {
            render_background: true,
            render_oam: true,
            nametable_grid: false,
            oam_outlines: false,
            hover_sprites: true,
            hover_background: true,
        }
    }
}

pub struct EditorSession {
    pub config: SceneConfig,
    pub camera: Camera,
    pub plane: ScenePlane,
    pub store: SceneStore,
    pub highlight: Highlight,
    pub selection: SelectionSet,
    pub palettes: PaletteBank,
    pub view: ViewFlags,
    /// Scene pixel under the mouse, None when the view ray misses the plane
    cursor: Option<ScenePixel>,
}

impl EditorSession {
    pub fn new(config: SceneConfig) -> Self {
        let mut camera = Camera::new();
        camera.position = config.camera_start;
        camera.fov_y = config.fov_degrees.to_radians();
        camera.update_basis();

        Self {
            plane: ScenePlane::from_config(&config),
            store: SceneStore::from_config(&config),
            camera,
            config,
            highlight: Highlight::new(),
            selection: SelectionSet::new(),
            palettes: PaletteBank::default(),
            view: ViewFlags::default(),
            cursor: None,
        }
    }

    pub fn cursor(&self) -> Option<ScenePixel> {
        self.cursor
    }

    /// Process one frame of mouse input
    ///
    /// `mouse_available` is false while something else owns the mouse.
    /// Returns true when a left click was consumed by the scene.
    pub fn update(&mut self, input: &MouseState, viewport: (f32, f32), mouse_available: bool) -> bool {
        let (viewport_w, viewport_h) = viewport;

        if mouse_available && input.right_down && input.has_moved() {
            let scale = self.config.rotate_speed.to_radians();
            // Vertical drag pitches, horizontal drag yaws
            self.camera.rotate(-input.dy * scale, input.dx * scale);
        }

        let cursor = map_to_scene_pixel(&self.camera, &self.plane, input.x, input.y, viewport_w, viewport_h);

        if mouse_available && input.has_moved() {
            self.hover_at(cursor);
        } else {
            self.cursor = cursor;
        }

        if mouse_available && input.left_pressed && !input.right_down {
            return self.click(input.shift);
        }
        false
    }

    /// Recompute hover for a scene pixel (None clears it)
    pub fn hover_at(&mut self, pixel: Option<ScenePixel>) {
        let before = self.highlight.active_target();
        self.cursor = pixel;

        match pixel {
            Some(p) => self.highlight.compute_hover(
                &self.store,
                p.x,
                p.y,
                self.view.hover_sprites,
                self.view.hover_background,
            ),
            None => self.highlight.clear(),
        }

        let after = self.highlight.active_target();
        if after != before {
            log::debug!("hover {:?} -> {:?} at {:?}", before, after, pixel);
        }
    }

    /// Apply a left click to the active hover target
    ///
    /// A plain click replaces the selection, a shift click toggles the
    /// target. Clicking empty space clears the selection and is not consumed.
    pub fn click(&mut self, shift: bool) -> bool {
        let target = self.highlight.active_target();

        if target == HoverTarget::None {
            if !shift && !self.selection.is_empty() {
                log::debug!("selection cleared");
                self.selection.clear();
            }
            return false;
        }

        if shift {
            self.selection.toggle_target(target);
        } else {
            self.selection.clear();
            self.selection.select_target(target);
        }
        log::debug!("{:?} clicked, {} selected", target, self.selection.len());
        true
    }

    /// Step the active hover target through overlapping candidates
    pub fn cycle_hover(&mut self) -> HoverTarget {
        self.highlight.cycle_active();
        let target = self.highlight.active_target();
        log::debug!("hover cycled to {:?}", target);
        target
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn select_next_palette(&mut self) -> usize {
        self.palettes.select_next()
    }

    pub fn select_previous_palette(&mut self) -> usize {
        self.palettes.select_previous()
    }

    /// Move the camera along its right and up vectors
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.camera.pan(dx, dy);
    }

    /// Put the camera back at its configured start
    pub fn reset_camera(&mut self) {
        self.camera.position = self.config.camera_start;
        self.camera.rotation_x = 0.0;
        self.camera.rotation_y = 0.0;
        self.camera.update_basis();
    }

    /// Replace the scene with a captured snapshot
    ///
    /// Selection and hover refer to indices in the old scene, so both are reset.
    pub fn load_snapshot<F>(&mut self, snapshot: &Snapshot, mesh_for_tile: F) -> PopulateReport
    where
        F: Fn(u16) -> Option<u32>,
    {
        let report = populate_scene(&mut self.store, snapshot, mesh_for_tile);
        snapshot.apply_palettes(&mut self.palettes);
        self.selection.clear();
        self.highlight.clear();
        report
    }

    /// Fill the scene with a pattern of the available meshes and a few sprites
    pub fn populate_demo(&mut self, mesh_count: u32) {
        self.store.clear();
        self.selection.clear();
        self.highlight.clear();
        if mesh_count == 0 {
            log::warn!("No meshes available, demo scene left empty");
            return;
        }

        let nt_w = self.config.nametable_width.max(1);
        let nt_h = self.config.nametable_height.max(1);
        for y in 0..self.store.height() {
            for x in 0..self.store.width() {
                let mesh = ((x + y) % mesh_count as usize) as u32;
                let palette = ((y / nt_h) * 2 + x / nt_w) as u8 % 4;
                let tile = Tile::new(mesh, palette).mirrored(x % 2 == 1, y % 2 == 1);
                if let Err(e) = self.store.set_background_tile(x, y, tile) {
                    log::warn!("{}", e);
                }
            }
        }

        // Overlapping pair in the middle exercises hover cycling
        let cx = (self.store.pixel_width() / 2) as i32;
        let cy = (self.store.pixel_height() / 2) as i32;
        let sprites = [
            Sprite::new(0, 4, cx - 20, cy - 20),
            Sprite::new(1 % mesh_count, 5, cx - 16, cy - 16),
            Sprite::new(2 % mesh_count, 6, 16, 16),
            Sprite::new(3 % mesh_count, 7, cx + 40, cy + 24).mirrored(true, false),
        ];
        for sprite in sprites {
            self.store.append_sprite(sprite);
        }

        log::info!(
            "Demo scene: {} tiles, {} sprites",
            self.store.filled_cells(),
            self.store.sprite_count()
        );
    }

    /// Draw the scene with highlight and selection emphasis
    pub fn render<B: RenderBackend>(&self, backend: &mut B) {
        let frame = FrameContext {
            camera: &self.camera,
            palette: self.palettes.selected(),
            store: &self.store,
            highlight: &self.highlight,
            selection: &self.selection,
            overlay: &self.config.overlay,
        };
        let flags = RenderFlags {
            background: self.view.render_background,
            oam: self.view.render_oam,
        };
        compositor::render_frame(backend, &frame, flags);
    }

    /// Draw the enabled editing overlays
    pub fn render_overlays<B: RenderBackend>(&self, backend: &mut B) {
        let flags = OverlayFlags {
            nametable_grid: self.view.nametable_grid,
            oam_outlines: self.view.oam_outlines,
        };
        if !flags.nametable_grid && !flags.oam_outlines {
            return;
        }
        compositor::render_overlays(
            backend,
            &self.store,
            (self.config.nametable_width, self.config.nametable_height),
            flags,
            &self.config.overlay,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{MeshBank, SoftwareBackend};
    use crate::rasterizer::{Color, Framebuffer, HEIGHT, WIDTH};
    use crate::scene::Layer;

    const VIEWPORT: (f32, f32) = (WIDTH as f32, HEIGHT as f32);

    fn session() -> EditorSession {
        EditorSession::new(SceneConfig::default())
    }

    fn at_centre(dx: f32, dy: f32) -> MouseState {
        MouseState { x: VIEWPORT.0 / 2.0, y: VIEWPORT.1 / 2.0, dx, dy, ..Default::default() }
    }

    #[test]
    fn test_sprite_hover_end_to_end() {
        let mut s = session();
        s.store.append_sprite(Sprite::new(0, 0, 16, 16));
        s.hover_at(Some(ScenePixel::new(18, 20)));

        assert_eq!(s.highlight.hovered_sprites(), &[0]);
        assert_eq!(s.highlight.active_sprite(), Some(0));
        assert_eq!(s.highlight.active_background_cell(), None);
    }

    #[test]
    fn test_cursor_off_scene_has_no_hover() {
        let mut s = session();
        s.hover_at(Some(ScenePixel::new(600, 10)));

        assert!(s.highlight.hovered_sprites().is_empty());
        assert_eq!(s.highlight.hovered_background_cell(), None);
        assert_eq!(s.highlight.active_target(), HoverTarget::None);
    }

    #[test]
    fn test_update_maps_screen_centre() {
        let mut s = session();
        s.update(&at_centre(1.0, 0.0), VIEWPORT, true);

        assert_eq!(s.cursor(), Some(ScenePixel::new(128, 120)));
        // Cell (16, 15) of a 64-wide grid
        assert_eq!(s.highlight.active_target(), HoverTarget::Background(15 * 64 + 16));
    }

    #[test]
    fn test_still_mouse_keeps_hover() {
        let mut s = session();
        s.update(&at_centre(1.0, 0.0), VIEWPORT, true);
        s.store.append_sprite(Sprite::new(0, 0, 124, 116));

        // Not moved, so the new sprite is not picked up yet
        s.update(&at_centre(0.0, 0.0), VIEWPORT, true);
        assert_eq!(s.highlight.active_sprite(), None);

        s.update(&at_centre(0.5, 0.0), VIEWPORT, true);
        assert_eq!(s.highlight.active_sprite(), Some(0));
    }

    #[test]
    fn test_unavailable_mouse_ignores_input() {
        let mut s = session();
        let mut input = at_centre(3.0, 3.0);
        input.left_pressed = true;
        input.right_down = true;
        let yaw = s.camera.rotation_y;

        assert!(!s.update(&input, VIEWPORT, false));
        assert_eq!(s.camera.rotation_y, yaw);
        assert_eq!(s.highlight.active_target(), HoverTarget::None);
    }

    #[test]
    fn test_right_drag_rotates_by_configured_speed() {
        let mut s = session();
        let mut input = at_centre(30.0, 0.0);
        input.right_down = true;
        s.update(&input, VIEWPORT, true);

        // 30 pixels at a third of a degree each
        assert!((s.camera.rotation_y - 10f32.to_radians()).abs() < 1e-5);
        assert_eq!(s.camera.rotation_x, 0.0);
    }

    #[test]
    fn test_still_right_hold_keeps_cycled_target() {
        let mut s = session();
        s.store.append_sprite(Sprite::new(0, 0, 124, 116));
        s.update(&at_centre(1.0, 0.0), VIEWPORT, true);
        assert_eq!(s.highlight.active_target(), HoverTarget::Sprite(0));

        let cycled = s.cycle_hover();
        assert_eq!(cycled, HoverTarget::Background(15 * 64 + 16));

        let mut hold = at_centre(0.0, 0.0);
        hold.right_down = true;
        s.update(&hold, VIEWPORT, true);
        assert_eq!(s.highlight.active_target(), cycled);
        assert_eq!(s.camera.rotation_y, 0.0);
    }

    #[test]
    fn test_click_selects_and_shift_toggles() {
        let mut s = session();
        s.store.append_sprite(Sprite::new(0, 0, 124, 116));
        let mut input = at_centre(1.0, 0.0);
        input.left_pressed = true;

        assert!(s.update(&input, VIEWPORT, true));
        assert!(s.selection.contains(Layer::Sprite, 0));

        input.shift = true;
        assert!(s.update(&input, VIEWPORT, true));
        assert!(s.selection.is_empty());
    }

    #[test]
    fn test_plain_click_replaces_selection() {
        let mut s = session();
        s.selection.select(Layer::Background, 3);
        s.hover_at(Some(ScenePixel::new(8, 0)));

        assert!(s.click(false));
        assert!(!s.selection.contains(Layer::Background, 3));
        assert!(s.selection.contains(Layer::Background, 1));
    }

    #[test]
    fn test_click_on_nothing_clears() {
        let mut s = session();
        s.selection.select(Layer::Sprite, 2);
        s.hover_at(Some(ScenePixel::new(-5, -5)));

        assert!(!s.click(false));
        assert!(s.selection.is_empty());
    }

    #[test]
    fn test_hover_filters() {
        let mut s = session();
        s.store.append_sprite(Sprite::new(0, 0, 0, 0));
        s.view.hover_sprites = false;
        s.hover_at(Some(ScenePixel::new(2, 2)));
        assert_eq!(s.highlight.active_target(), HoverTarget::Background(0));

        s.view.hover_sprites = true;
        s.view.hover_background = false;
        s.hover_at(Some(ScenePixel::new(2, 2)));
        assert_eq!(s.highlight.active_target(), HoverTarget::Sprite(0));
        assert_eq!(s.highlight.candidate_count(), 1);
    }

    #[test]
    fn test_cycle_hover_wraps_through_candidates() {
        let mut s = session();
        s.store.append_sprite(Sprite::new(0, 0, 0, 0));
        s.store.append_sprite(Sprite::new(0, 0, 4, 4));
        s.hover_at(Some(ScenePixel::new(5, 5)));

        assert_eq!(s.highlight.active_target(), HoverTarget::Sprite(0));
        assert_eq!(s.cycle_hover(), HoverTarget::Sprite(1));
        assert_eq!(s.cycle_hover(), HoverTarget::Background(0));
        assert_eq!(s.cycle_hover(), HoverTarget::Sprite(0));
    }

    #[test]
    fn test_palette_selection_wraps() {
        let mut s = session();
        for _ in 0..8 {
            s.select_next_palette();
        }
        assert_eq!(s.palettes.selected_index(), 0);
        assert_eq!(s.select_previous_palette(), 7);
    }

    #[test]
    fn test_pan_and_reset() {
        let mut s = session();
        s.pan(0.5, -0.25);
        assert!((s.camera.position.x - 0.5).abs() < 1e-5);
        assert!((s.camera.position.y + 0.25).abs() < 1e-5);

        s.reset_camera();
        assert_eq!(s.camera.position, s.config.camera_start);
    }

    #[test]
    fn test_demo_scene_fills_grid() {
        let mut s = session();
        s.populate_demo(4);
        assert_eq!(s.store.filled_cells(), 64 * 60);
        assert_eq!(s.store.sprite_count(), 4);

        s.populate_demo(0);
        assert_eq!(s.store.filled_cells(), 0);
    }

    #[test]
    fn test_hovered_sprite_over_filled_background_is_marked() {
        let mut s = session();
        for y in 0..s.store.height() {
            for x in 0..s.store.width() {
                s.store.set_background_tile(x, y, Tile::new(0, 0)).unwrap();
            }
        }
        s.store.append_sprite(Sprite::new(1, 4, 124, 116));
        s.update(&at_centre(1.0, 0.0), VIEWPORT, true);
        assert_eq!(s.highlight.active_target(), HoverTarget::Sprite(0));

        let meshes = MeshBank::placeholder(2);
        let mut fb = Framebuffer::new(WIDTH, HEIGHT);
        fb.clear(Color::BLACK);
        {
            let mut backend = SoftwareBackend::new(&mut fb, &meshes, s.plane);
            s.render(&mut backend);
        }

        let marked = fb.stencil.iter().filter(|&&m| m != 0).count();
        assert!(marked > 100, "only {} pixels marked", marked);
        assert!(fb.is_stenciled(WIDTH / 2, HEIGHT / 2));
        // The background cell under the sprite is not the active target
        assert!(!fb.is_stenciled(265, 250));
    }

    #[test]
    fn test_render_highlights_hovered_tile() {
        let mut s = session();
        s.populate_demo(4);
        s.view.render_oam = false;
        s.update(&at_centre(1.0, 0.0), VIEWPORT, true);

        let meshes = MeshBank::placeholder(4);
        let mut fb = Framebuffer::new(WIDTH, HEIGHT);
        fb.clear(Color::BLACK);
        {
            let mut backend = SoftwareBackend::new(&mut fb, &meshes, s.plane);
            s.render(&mut backend);
            s.render_overlays(&mut backend);
            assert_eq!(backend.missing_meshes(), 0);
        }

        // Only the hovered cell is marked
        assert!(fb.is_stenciled(WIDTH / 2 + 2, HEIGHT / 2 + 2));
        assert!(!fb.is_stenciled(10, 10));
    }
}

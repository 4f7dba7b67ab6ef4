//! Framebuffer and camera
//! Tile quads are rasterized with affine texture mapping into a
//! color + depth + stencil framebuffer.

use super::math::{barycentric, perspective_transform, Vec2, Vec3};
use super::types::{Color, DepthStencilState};

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>,  // Depth buffer
    pub stencil: Vec<u8>,   // Stencil buffer (non-zero = marked)
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![f32::MAX; width * height],
            stencil: vec![0; width * height],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(f32::MAX);
        self.stencil.fill(0);
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            Color::from_bytes([
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            ])
        } else {
            Color::BLACK
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Blend a (possibly translucent) color over the existing pixel
    pub fn blend_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let dst = self.get_pixel(x, y);
            self.set_pixel(x, y, color.blend_over(dst));
        }
    }

    pub fn is_stenciled(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.stencil[y * self.width + x] != 0
    }

    /// Draw a line from (x0, y0) to (x1, y1) using Bresenham's algorithm
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
                self.blend_pixel(x as usize, y as usize, color);
            }

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Fill a screen-space rectangle, optionally restricted to stenciled pixels
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, stencil_test: bool) {
        let min_x = x.max(0.0) as usize;
        let min_y = y.max(0.0) as usize;
        let max_x = (x + w).clamp(0.0, self.width as f32) as usize;
        let max_y = (y + h).clamp(0.0, self.height as f32) as usize;

        for py in min_y..max_y {
            for px in min_x..max_x {
                if stencil_test && !self.is_stenciled(px, py) {
                    continue;
                }
                self.blend_pixel(px, py, color);
            }
        }
    }
}

/// One corner of a projected quad: screen position (z = view depth) and UV
#[derive(Debug, Clone, Copy)]
pub struct ScreenVertex {
    pub pos: Vec3,
    pub uv: Vec2,
}

/// Rasterize a screen-space quad (corners in winding order) as two affine triangles
///
/// `sample` maps a UV to a texel color; `None` means transparent.
pub fn rasterize_quad<F>(
    fb: &mut Framebuffer,
    corners: [ScreenVertex; 4],
    state: DepthStencilState,
    sample: F,
) where
    F: Fn(f32, f32) -> Option<Color>,
{
    rasterize_triangle(fb, [corners[0], corners[1], corners[2]], state, &sample);
    rasterize_triangle(fb, [corners[0], corners[2], corners[3]], state, &sample);
}

/// Depth slack for layers drawn on the same plane
const DEPTH_EPSILON: f32 = 1e-4;

fn rasterize_triangle<F>(
    fb: &mut Framebuffer,
    tri: [ScreenVertex; 3],
    state: DepthStencilState,
    sample: &F,
) where
    F: Fn(f32, f32) -> Option<Color>,
{
    let [a, b, c] = tri;

    // Bounding box
    let min_x = a.pos.x.min(b.pos.x).min(c.pos.x).max(0.0) as usize;
    let max_x = (a.pos.x.max(b.pos.x).max(c.pos.x) + 1.0).clamp(0.0, fb.width as f32) as usize;
    let min_y = a.pos.y.min(b.pos.y).min(c.pos.y).max(0.0) as usize;
    let max_y = (a.pos.y.max(b.pos.y).max(c.pos.y) + 1.0).clamp(0.0, fb.height as f32) as usize;

    for y in min_y..max_y {
        for x in min_x..max_x {
            let p = Vec3::new(x as f32, y as f32, 0.0);
            let bc = barycentric(p, a.pos, b.pos, c.pos);

            const ERR: f32 = -0.0001;
            if bc.x < ERR || bc.y < ERR || bc.z < ERR {
                continue;
            }

            let z = bc.x * a.pos.z + bc.y * b.pos.z + bc.z * c.pos.z;
            let idx = y * fb.width + x;

            // Coplanar draws tie; the later one wins
            if state.depth_test && z > fb.zbuffer[idx] + DEPTH_EPSILON {
                continue;
            }

            // Affine UV interpolation
            let u = bc.x * a.uv.x + bc.y * b.uv.x + bc.z * c.uv.x;
            let v = bc.x * a.uv.y + bc.y * b.uv.y + bc.z * c.uv.y;

            let Some(color) = sample(u, v) else {
                continue;
            };

            fb.set_pixel(x, y, color);
            if state.depth_test {
                fb.zbuffer[idx] = z;
            }
            if state.stencil_write {
                fb.stencil[idx] = 1;
            }
        }
    }
}

/// Near clip distance in camera space
const NEAR: f32 = 0.01;

/// Camera state
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub rotation_x: f32, // Pitch
    pub rotation_y: f32, // Yaw
    /// Vertical field of view in radians
    pub fov_y: f32,

    // Computed basis vectors
    pub basis_x: Vec3,
    pub basis_y: Vec3,
    pub basis_z: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        let mut cam = Self {
            position: Vec3::ZERO,
            rotation_x: 0.0,
            rotation_y: 0.0,
            fov_y: std::f32::consts::FRAC_PI_3,
            basis_x: Vec3::new(1.0, 0.0, 0.0),
            basis_y: Vec3::new(0.0, 1.0, 0.0),
            basis_z: Vec3::new(0.0, 0.0, 1.0),
        };
        cam.update_basis();
        cam
    }

    pub fn update_basis(&mut self) {
        // Forward vector based on rotation (+Z at rest, +Y is up)
        self.basis_z = Vec3 {
            x: self.rotation_x.cos() * self.rotation_y.sin(),
            y: self.rotation_x.sin(),
            z: self.rotation_x.cos() * self.rotation_y.cos(),
        };

        // Right vector
        self.basis_x = Vec3::UP.cross(self.basis_z).normalize();

        // Up vector
        self.basis_y = self.basis_z.cross(self.basis_x);
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.rotation_y += dy;
        self.rotation_x = (self.rotation_x + dx).clamp(
            -std::f32::consts::FRAC_PI_2 + 0.01,
            std::f32::consts::FRAC_PI_2 - 0.01,
        );
        self.update_basis();
    }

    /// Move along the camera's right/up vectors
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.position = self.position + self.basis_x * dx + self.basis_y * dy;
    }

    fn focal(&self) -> f32 {
        1.0 / (self.fov_y * 0.5).tan()
    }

    /// Project a world-space point to screen coordinates
    /// Returns (x, y, view depth), or None if the point is behind the near plane
    pub fn project(&self, world: Vec3, screen_width: f32, screen_height: f32) -> Option<Vec3> {
        let rel = world - self.position;
        let cam = perspective_transform(rel, self.basis_x, self.basis_y, self.basis_z);
        if cam.z <= NEAR {
            return None;
        }

        let aspect = screen_width / screen_height;
        let focal = self.focal();
        let ndc_x = cam.x * focal / (cam.z * aspect);
        let ndc_y = cam.y * focal / cam.z;

        Some(Vec3::new(
            (ndc_x + 1.0) * 0.5 * screen_width,
            (1.0 - ndc_y) * 0.5 * screen_height,
            cam.z,
        ))
    }

    /// Generate a ray from screen coordinates through the camera
    /// Returns (ray_origin, ray_direction)
    pub fn screen_ray(&self, screen_x: f32, screen_y: f32, screen_width: f32, screen_height: f32) -> (Vec3, Vec3) {
        let aspect = screen_width / screen_height;
        let focal = self.focal();

        let ndc_x = screen_x / screen_width * 2.0 - 1.0;
        let ndc_y = 1.0 - screen_y / screen_height * 2.0;

        // Direction in camera space at unit depth
        let dir_x = ndc_x * aspect / focal;
        let dir_y = ndc_y / focal;

        let world_dir = (self.basis_x * dir_x + self.basis_y * dir_y + self.basis_z).normalize();
        (self.position, world_dir)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_basis_is_identity() {
        let cam = Camera::new();
        assert!((cam.basis_x.x - 1.0).abs() < 1e-5);
        assert!((cam.basis_y.y - 1.0).abs() < 1e-5);
        assert!((cam.basis_z.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_project_then_ray_round_trip() {
        let mut cam = Camera::new();
        cam.position = Vec3::new(0.2, -0.1, -2.0);
        cam.rotate(0.1, -0.2);

        let world = Vec3::new(0.3, 0.4, 0.0);
        let screen = cam.project(world, 640.0, 480.0).expect("point in front of camera");
        let (origin, dir) = cam.screen_ray(screen.x, screen.y, 640.0, 480.0);

        // The ray should pass through the original point
        let t = (world - origin).dot(dir);
        let closest = origin + dir * t;
        assert!((closest - world).len() < 1e-3);
    }

    #[test]
    fn test_point_behind_camera_is_not_projected() {
        let mut cam = Camera::new();
        cam.position = Vec3::new(0.0, 0.0, -2.0);
        assert!(cam.project(Vec3::new(0.0, 0.0, -3.0), 320.0, 240.0).is_none());
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut cam = Camera::new();
        cam.rotate(10.0, 0.0);
        assert!(cam.rotation_x < std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_quad_writes_stencil_only_when_asked() {
        let mut fb = Framebuffer::new(8, 8);
        fb.clear(Color::BLACK);
        let quad = |x0: f32, x1: f32| {
            [
                ScreenVertex { pos: Vec3::new(x0, 0.0, 1.0), uv: Vec2::new(0.0, 0.0) },
                ScreenVertex { pos: Vec3::new(x1, 0.0, 1.0), uv: Vec2::new(1.0, 0.0) },
                ScreenVertex { pos: Vec3::new(x1, 8.0, 1.0), uv: Vec2::new(1.0, 1.0) },
                ScreenVertex { pos: Vec3::new(x0, 8.0, 1.0), uv: Vec2::new(0.0, 1.0) },
            ]
        };

        rasterize_quad(&mut fb, quad(0.0, 3.0), DepthStencilState::NORMAL, |_, _| Some(Color::WHITE));
        assert_eq!(fb.get_pixel(1, 4), Color::WHITE);
        assert!(!fb.is_stenciled(1, 4));

        rasterize_quad(&mut fb, quad(5.0, 7.0), DepthStencilState::EMPHASIS, |_, _| Some(Color::RED));
        assert!(fb.is_stenciled(6, 4));
        assert!(!fb.is_stenciled(1, 4));
    }

    #[test]
    fn test_coplanar_later_draw_wins_but_nearer_still_occludes() {
        let mut fb = Framebuffer::new(8, 8);
        fb.clear(Color::BLACK);
        let quad = |z: f32| {
            [
                ScreenVertex { pos: Vec3::new(0.0, 0.0, z), uv: Vec2::new(0.0, 0.0) },
                ScreenVertex { pos: Vec3::new(8.0, 0.0, z), uv: Vec2::new(1.0, 0.0) },
                ScreenVertex { pos: Vec3::new(8.0, 8.0, z), uv: Vec2::new(1.0, 1.0) },
                ScreenVertex { pos: Vec3::new(0.0, 8.0, z), uv: Vec2::new(0.0, 1.0) },
            ]
        };

        rasterize_quad(&mut fb, quad(2.0), DepthStencilState::NORMAL, |_, _| Some(Color::WHITE));
        rasterize_quad(&mut fb, quad(2.0), DepthStencilState::EMPHASIS, |_, _| Some(Color::RED));
        assert_eq!(fb.get_pixel(4, 4), Color::RED);
        assert!(fb.is_stenciled(4, 4));

        // Farther geometry stays hidden
        rasterize_quad(&mut fb, quad(3.0), DepthStencilState::NORMAL, |_, _| Some(Color::WHITE));
        assert_eq!(fb.get_pixel(4, 4), Color::RED);
    }

    #[test]
    fn test_stencil_tested_fill_only_touches_marked_pixels() {
        let mut fb = Framebuffer::new(4, 4);
        fb.clear(Color::BLACK);
        fb.stencil[0] = 1;
        fb.fill_rect(0.0, 0.0, 4.0, 4.0, Color::WHITE, true);
        assert_eq!(fb.get_pixel(0, 0), Color::WHITE);
        assert_eq!(fb.get_pixel(1, 0), Color::BLACK);
    }
}

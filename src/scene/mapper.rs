//! Coordinate Mapper - camera ray to scene pixel
//!
//! The scene is laid out on the world plane z = 0, facing the camera.
//! Its top-left corner sits at (-1, 1) and it extends towards +X and -Y,
//! so scene row 0 is at the top while world Y grows upward.

use crate::config::SceneConfig;
use crate::rasterizer::{ray_plane_intersect, Camera, Vec3};

/// Integer position in scene pixel space
///
/// Values outside the scene are legal and mean the cursor is off-scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScenePixel {
    pub x: i32,
    pub y: i32,
}

impl ScenePixel {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Placement of the scene on the world display plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePlane {
    /// World units per scene pixel
    pub pixel_size_w: f32,
    pub pixel_size_h: f32,
    /// Scene size in scene pixels
    pub pixel_width: usize,
    pub pixel_height: usize,
}

impl ScenePlane {
    /// World-space point of the scene's top-left corner
    pub const ORIGIN: Vec3 = Vec3 { x: -1.0, y: 1.0, z: 0.0 };
    /// Plane normal, pointing back at the default camera
    pub const NORMAL: Vec3 = Vec3 { x: 0.0, y: 0.0, z: -1.0 };

    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            pixel_size_w: config.pixel_size_w,
            pixel_size_h: config.pixel_size_h,
            pixel_width: config.pixel_width(),
            pixel_height: config.pixel_height(),
        }
    }

    /// Total world-space width of the scene
    pub fn extent_w(&self) -> f32 {
        self.pixel_size_w * self.pixel_width as f32
    }

    /// Total world-space height of the scene
    pub fn extent_h(&self) -> f32 {
        self.pixel_size_h * self.pixel_height as f32
    }

    /// Convert a point on the display plane to a scene pixel
    pub fn world_to_pixel(&self, point: Vec3) -> ScenePixel {
        // Move the scene's top-left corner to the origin
        let x = point.x - Self::ORIGIN.x;
        let y = point.y - Self::ORIGIN.y;

        // Normalize by the full scene extent
        let x = x / self.extent_w();
        let y = y / self.extent_h();

        // Y is flipped: scene rows grow downward
        ScenePixel {
            x: (self.pixel_width as f32 * x).floor() as i32,
            y: (self.pixel_height as f32 * -y).floor() as i32,
        }
    }

    /// World-space position of a (fractional) scene pixel
    pub fn pixel_to_world(&self, x: f32, y: f32) -> Vec3 {
        Vec3::new(
            Self::ORIGIN.x + x * self.pixel_size_w,
            Self::ORIGIN.y - y * self.pixel_size_h,
            Self::ORIGIN.z,
        )
    }

    pub fn contains(&self, pixel: ScenePixel) -> bool {
        pixel.x >= 0
            && pixel.y >= 0
            && (pixel.x as usize) < self.pixel_width
            && (pixel.y as usize) < self.pixel_height
    }
}

/// Map a screen position to the scene pixel under it
///
/// Returns None only when the view ray never reaches the display plane
/// (parallel to it, or the plane is behind the camera).
pub fn map_to_scene_pixel(
    camera: &Camera,
    plane: &ScenePlane,
    screen_x: f32,
    screen_y: f32,
    viewport_w: f32,
    viewport_h: f32,
) -> Option<ScenePixel> {
    let (origin, dir) = camera.screen_ray(screen_x, screen_y, viewport_w, viewport_h);
    let hit = ray_plane_intersect(origin, dir, ScenePlane::ORIGIN, ScenePlane::NORMAL)?;
    Some(plane.world_to_pixel(hit))
}

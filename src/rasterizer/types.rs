//! Core types for the rasterizer

use serde::{Serialize, Deserialize};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from float channels (0.0-1.0), the way overlay colors are specified
    pub fn from_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r: c(r), g: c(g), b: c(b), a: c(a) }
    }

    /// Alpha-blend this color over `dst`, keeping dst's alpha
    pub fn blend_over(self, dst: Color) -> Color {
        if self.a == 255 {
            return self;
        }
        let a = self.a as u32;
        let inv = 255 - a;
        let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
        Color {
            r: mix(self.r, dst.r),
            g: mix(self.g, dst.g),
            b: mix(self.b, dst.b),
            a: dst.a,
        }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self { r: bytes[0], g: bytes[1], b: bytes[2], a: bytes[3] }
    }
}

/// Depth/stencil configuration for subsequent draws
///
/// Emphasised elements are drawn once with `EMPHASIS` so they mark the
/// stencil buffer; the overlay pass then only touches marked pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilState {
    pub depth_test: bool,
    pub stencil_write: bool,
    pub stencil_test: bool,
}

impl DepthStencilState {
    pub const NORMAL: DepthStencilState = DepthStencilState {
        depth_test: true,
        stencil_write: false,
        stencil_test: false,
    };

    pub const EMPHASIS: DepthStencilState = DepthStencilState {
        depth_test: true,
        stencil_write: true,
        stencil_test: false,
    };

    pub const OVERLAY: DepthStencilState = DepthStencilState {
        depth_test: false,
        stencil_write: false,
        stencil_test: true,
    };
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self::NORMAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f32_rounds_channels() {
        let c = Color::from_f32(1.0, 0.0, 0.5, 0.3);
        assert_eq!(c, Color::with_alpha(255, 0, 128, 77));
    }

    #[test]
    fn test_blend_half_white_over_black() {
        let wash = Color::with_alpha(255, 255, 255, 128);
        let out = wash.blend_over(Color::BLACK);
        assert_eq!(out.r, 128);
        assert_eq!(out.a, 255);
    }

    #[test]
    fn test_opaque_blend_replaces() {
        assert_eq!(Color::RED.blend_over(Color::BLACK), Color::RED);
    }
}

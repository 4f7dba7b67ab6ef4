//! Background tiles and OAM sprites
//!
//! Pure data. Mesh indices refer to entries in the renderer's mesh bank;
//! the tile-number to mesh mapping is owned by whoever loads the scene.

/// One background cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tile {
    /// Mesh to draw, None = empty cell
    pub mesh: Option<u32>,
    /// Sub-palette (0-7)
    pub palette: u8,
    pub mirror_h: bool,
    pub mirror_v: bool,
}

impl Tile {
    pub const EMPTY: Tile = Tile {
        mesh: None,
        palette: 0,
        mirror_h: false,
        mirror_v: false,
    };

    pub fn new(mesh: u32, palette: u8) -> Self {
        Self {
            mesh: Some(mesh),
            palette,
            mirror_h: false,
            mirror_v: false,
        }
    }

    pub fn mirrored(mut self, mirror_h: bool, mirror_v: bool) -> Self {
        self.mirror_h = mirror_h;
        self.mirror_v = mirror_v;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.is_none()
    }
}

/// One OAM entry, positioned in scene pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub mesh: u32,
    pub palette: u8,
    pub x: i32,
    pub y: i32,
    pub mirror_h: bool,
    pub mirror_v: bool,
}

impl Sprite {
    pub fn new(mesh: u32, palette: u8, x: i32, y: i32) -> Self {
        Self {
            mesh,
            palette,
            x,
            y,
            mirror_h: false,
            mirror_v: false,
        }
    }

    pub fn mirrored(mut self, mirror_h: bool, mirror_v: bool) -> Self {
        self.mirror_h = mirror_h;
        self.mirror_v = mirror_v;
        self
    }

    /// Check if a scene pixel falls inside this sprite's `size`x`size` box
    pub fn contains(&self, px: i32, py: i32, size: i32) -> bool {
        px >= self.x && px < self.x + size && py >= self.y && py < self.y + size
    }
}

//! Tile meshes
//!
//! A mesh here is an 8x8 grid of 2-bit color indices (0 = transparent).
//! Meshes come from raw NES CHR data, a greyscale PNG sheet, or a
//! generated placeholder set.

use std::path::Path;
use thiserror::Error;

/// Texels per mesh edge
pub const MESH_SIZE: usize = 8;
/// Bytes per tile in NES CHR format (two bitplanes)
pub const CHR_TILE_BYTES: usize = 16;

/// Error type for mesh loading
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load image: {0}")]
    Image(#[from] image::ImageError),
    #[error("sheet {width}x{height} is not a multiple of {MESH_SIZE}x{MESH_SIZE}")]
    SheetSize { width: u32, height: u32 },
    #[error("CHR data length {0} is not a multiple of {CHR_TILE_BYTES}")]
    ChrLength(usize),
}

/// One 8x8 tile of color indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMesh {
    pub texels: [u8; MESH_SIZE * MESH_SIZE],
}

impl TileMesh {
    /// Color index at (x, y), honoring mirroring
    pub fn texel(&self, x: usize, y: usize, mirror_h: bool, mirror_v: bool) -> u8 {
        let x = if mirror_h { MESH_SIZE - 1 - x } else { x };
        let y = if mirror_v { MESH_SIZE - 1 - y } else { y };
        self.texels[y * MESH_SIZE + x]
    }

    /// Decode one tile of NES CHR data (low bitplane first)
    pub fn from_chr(bytes: &[u8; CHR_TILE_BYTES]) -> Self {
        let mut texels = [0u8; MESH_SIZE * MESH_SIZE];
        for row in 0..MESH_SIZE {
            let lo = bytes[row];
            let hi = bytes[row + MESH_SIZE];
            for col in 0..MESH_SIZE {
                let bit = 7 - col;
                texels[row * MESH_SIZE + col] = ((lo >> bit) & 1) | (((hi >> bit) & 1) << 1);
            }
        }
        Self { texels }
    }
}

/// All meshes available to the renderer, indexed by mesh number
#[derive(Debug, Clone, Default)]
pub struct MeshBank {
    meshes: Vec<TileMesh>,
}

impl MeshBank {
    pub fn get(&self, index: u32) -> Option<&TileMesh> {
        self.meshes.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Decode raw CHR ROM/RAM contents
    pub fn from_chr(data: &[u8]) -> Result<Self, MeshError> {
        if data.len() % CHR_TILE_BYTES != 0 {
            return Err(MeshError::ChrLength(data.len()));
        }
        let meshes = data
            .chunks_exact(CHR_TILE_BYTES)
            .map(|chunk| {
                let mut tile = [0u8; CHR_TILE_BYTES];
                tile.copy_from_slice(chunk);
                TileMesh::from_chr(&tile)
            })
            .collect();
        Ok(Self { meshes })
    }

    /// Read a CHR dump from disk
    pub fn load_chr<P: AsRef<Path>>(path: P) -> Result<Self, MeshError> {
        let bytes = std::fs::read(path)?;
        Self::from_chr(&bytes)
    }

    /// Load a greyscale sheet of 8x8 tiles, read left-to-right, top-to-bottom
    ///
    /// Luminance is quantised to four levels; fully transparent pixels map to 0.
    pub fn from_png<P: AsRef<Path>>(path: P) -> Result<Self, MeshError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        if width as usize % MESH_SIZE != 0 || height as usize % MESH_SIZE != 0 {
            return Err(MeshError::SheetSize { width, height });
        }

        let cols = width as usize / MESH_SIZE;
        let rows = height as usize / MESH_SIZE;
        let mut meshes = Vec::with_capacity(cols * rows);

        for ty in 0..rows {
            for tx in 0..cols {
                let mut texels = [0u8; MESH_SIZE * MESH_SIZE];
                for y in 0..MESH_SIZE {
                    for x in 0..MESH_SIZE {
                        let p = img.get_pixel((tx * MESH_SIZE + x) as u32, (ty * MESH_SIZE + y) as u32);
                        texels[y * MESH_SIZE + x] = if p[3] < 128 {
                            0
                        } else {
                            let luma = (p[0] as u32 * 299 + p[1] as u32 * 587 + p[2] as u32 * 114) / 1000;
                            (luma / 64) as u8
                        };
                    }
                }
                meshes.push(TileMesh { texels });
            }
        }

        Ok(Self { meshes })
    }

    /// Placeholder meshes: bordered tiles with a per-index diagonal stripe
    pub fn placeholder(count: usize) -> Self {
        let meshes = (0..count)
            .map(|i| {
                let mut texels = [0u8; MESH_SIZE * MESH_SIZE];
                for y in 0..MESH_SIZE {
                    for x in 0..MESH_SIZE {
                        let border = x == 0 || y == 0 || x == MESH_SIZE - 1 || y == MESH_SIZE - 1;
                        let stripe = (x + y + i) % 4 == 0;
                        texels[y * MESH_SIZE + x] = if border {
                            3
                        } else if stripe {
                            2
                        } else {
                            1
                        };
                    }
                }
                TileMesh { texels }
            })
            .collect();
        Self { meshes }
    }
}

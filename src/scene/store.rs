//! Scene Store - background grid plus OAM sprite list
//!
//! The background is a fixed row-major array sized once at creation;
//! sprites are an appendable sequence whose identity is their position.

use thiserror::Error;
use crate::config::SceneConfig;
use super::tile::{Sprite, Tile};

/// Error type for scene edits
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} background grid")]
    CellOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// Background grid and sprite list
#[derive(Debug, Clone)]
pub struct SceneStore {
    width: usize,
    height: usize,
    tile_size: usize,
    sprite_size: usize,
    background: Box<[Tile]>,
    sprites: Vec<Sprite>,
}

impl SceneStore {
    /// Create a store with every background cell empty
    pub fn new(width: usize, height: usize, tile_size: usize, sprite_size: usize) -> Self {
        Self {
            width,
            height,
            tile_size,
            sprite_size,
            background: vec![Tile::EMPTY; width * height].into_boxed_slice(),
            sprites: Vec::new(),
        }
    }

    pub fn from_config(config: &SceneConfig) -> Self {
        Self::new(config.grid_width, config.grid_height, config.tile_size, config.sprite_size)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    pub fn sprite_size(&self) -> usize {
        self.sprite_size
    }

    /// Scene width in scene pixels
    pub fn pixel_width(&self) -> usize {
        self.width * self.tile_size
    }

    /// Scene height in scene pixels
    pub fn pixel_height(&self) -> usize {
        self.height * self.tile_size
    }

    /// Linear cell index for grid coordinates (row-major)
    pub fn cell_index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Overwrite one background cell
    pub fn set_background_tile(&mut self, x: usize, y: usize, tile: Tile) -> Result<(), SceneError> {
        let idx = self.cell_index(x, y).ok_or(SceneError::CellOutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        self.background[idx] = tile;
        Ok(())
    }

    /// Append a sprite, returning its index
    pub fn append_sprite(&mut self, sprite: Sprite) -> usize {
        self.sprites.push(sprite);
        self.sprites.len() - 1
    }

    pub fn tile_at(&self, x: usize, y: usize) -> Option<&Tile> {
        self.cell_index(x, y).map(|idx| &self.background[idx])
    }

    pub fn tile_by_index(&self, cell: usize) -> Option<&Tile> {
        self.background.get(cell)
    }

    pub fn sprite_at(&self, index: usize) -> Option<&Sprite> {
        self.sprites.get(index)
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Iterate over all cells as (x, y, cell_index, tile), row by row
    pub fn background(&self) -> impl Iterator<Item = (usize, usize, usize, &Tile)> {
        let width = self.width;
        self.background
            .iter()
            .enumerate()
            .map(move |(i, tile)| (i % width, i / width, i, tile))
    }

    /// Number of non-empty background cells
    pub fn filled_cells(&self) -> usize {
        self.background.iter().filter(|t| !t.is_empty()).count()
    }

    /// Reset every cell to empty and drop all sprites
    pub fn clear(&mut self) {
        self.background.fill(Tile::EMPTY);
        self.sprites.clear();
    }
}

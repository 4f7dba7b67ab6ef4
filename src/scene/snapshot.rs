//! PPU snapshots and scene population
//!
//! A snapshot captures the four nametables, OAM and palettes at one
//! instant. Populating a scene converts tile numbers to mesh indices
//! through a caller-supplied lookup, since which mesh represents which
//! CHR tile is decided by the asset pipeline, not the scene.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use super::palette::{Palette, PaletteBank};
use super::store::SceneStore;
use super::tile::{Sprite, Tile};

/// Nametable size in tiles
pub const NAMETABLE_WIDTH: usize = 32;
pub const NAMETABLE_HEIGHT: usize = 30;
pub const NAMETABLE_COUNT: usize = 4;

/// Error type for snapshot loading
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("expected {NAMETABLE_COUNT} nametables, found {0}")]
    NametableCount(usize),
    #[error("nametable {index} has {len} tiles, expected {expected}")]
    NametableSize { index: usize, len: usize, expected: usize },
}

/// One nametable entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NametableTile {
    pub tile: u16,
    pub palette: u8,
}

/// One OAM entry as captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OamEntry {
    pub tile: u16,
    pub palette: u8,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub mirror_h: bool,
    #[serde(default)]
    pub mirror_v: bool,
}

/// Captured PPU state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Four nametables, each 32x30 tiles row-major
    pub nametables: Vec<Vec<NametableTile>>,
    #[serde(default)]
    pub oam: Vec<OamEntry>,
    /// Up to eight palettes, loaded into the bank in order
    #[serde(default)]
    pub palettes: Vec<Palette>,
}

impl Snapshot {
    /// Load and validate a snapshot from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    pub fn from_ron(s: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = ron::from_str(s)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.nametables.len() != NAMETABLE_COUNT {
            return Err(SnapshotError::NametableCount(self.nametables.len()));
        }
        let expected = NAMETABLE_WIDTH * NAMETABLE_HEIGHT;
        for (index, nt) in self.nametables.iter().enumerate() {
            if nt.len() != expected {
                return Err(SnapshotError::NametableSize { index, len: nt.len(), expected });
            }
        }
        Ok(())
    }

    /// Nametable entry for a global grid position (the 2x2 nametable layout)
    pub fn tile(&self, x: usize, y: usize) -> Option<NametableTile> {
        let nametable = (y / NAMETABLE_HEIGHT) * 2 + x / NAMETABLE_WIDTH;
        let local = (y % NAMETABLE_HEIGHT) * NAMETABLE_WIDTH + x % NAMETABLE_WIDTH;
        self.nametables.get(nametable)?.get(local).copied()
    }

    /// Copy the captured palettes into a bank
    pub fn apply_palettes(&self, bank: &mut PaletteBank) {
        for (i, palette) in self.palettes.iter().enumerate() {
            bank.set(i, palette.clone());
        }
    }
}

/// Counts from a populate pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopulateReport {
    pub tiles: usize,
    pub sprites: usize,
    /// Entries skipped because no mesh exists for their tile number
    pub skipped: usize,
}

/// Rebuild a scene from a snapshot
pub fn populate_scene<F>(store: &mut SceneStore, snapshot: &Snapshot, mesh_for_tile: F) -> PopulateReport
where
    F: Fn(u16) -> Option<u32>,
{
    let mut report = PopulateReport::default();
    store.clear();

    for y in 0..store.height() {
        for x in 0..store.width() {
            let Some(entry) = snapshot.tile(x, y) else {
                continue;
            };
            match mesh_for_tile(entry.tile) {
                Some(mesh) => {
                    // In range by construction of the loops
                    if store.set_background_tile(x, y, Tile::new(mesh, entry.palette)).is_ok() {
                        report.tiles += 1;
                    }
                }
                None => report.skipped += 1,
            }
        }
    }

    for entry in &snapshot.oam {
        match mesh_for_tile(entry.tile) {
            Some(mesh) => {
                let sprite = Sprite::new(mesh, entry.palette, entry.x, entry.y)
                    .mirrored(entry.mirror_h, entry.mirror_v);
                store.append_sprite(sprite);
                report.sprites += 1;
            }
            None => report.skipped += 1,
        }
    }

    if report.skipped > 0 {
        log::warn!("{} snapshot entries had no mesh and were skipped", report.skipped);
    }
    log::info!(
        "Populated scene: {} tiles, {} sprites",
        report.tiles,
        report.sprites
    );

    report
}

//! Highlight Engine - per-frame hover resolution
//!
//! Hover is recomputed from scratch every time the cursor moves. All hit
//! candidates share one index space: sprite hits first (in sequence order),
//! then the background cell. A single selector into that space picks the
//! active element, so sprites win over the background and earlier sprites
//! win over later ones.

use super::store::SceneStore;

/// The single resolved hover target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverTarget {
    #[default]
    None,
    /// Index into the sprite sequence
    Sprite(usize),
    /// Linear background cell index
    Background(usize),
}

/// Hover state for one frame
#[derive(Debug, Clone, Default)]
pub struct Highlight {
    sprite_hits: Vec<usize>,
    background_cell: Option<usize>,
    active: Option<usize>,
}

impl Highlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every hover candidate and the active selector
    pub fn clear(&mut self) {
        self.sprite_hits.clear();
        self.background_cell = None;
        self.active = None;
    }

    /// Recompute hover for a scene pixel
    pub fn compute_hover(
        &mut self,
        store: &SceneStore,
        x: i32,
        y: i32,
        include_sprites: bool,
        include_background: bool,
    ) {
        self.clear();

        if include_sprites {
            let size = store.sprite_size() as i32;
            self.sprite_hits.extend(
                store
                    .sprites()
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.contains(x, y, size))
                    .map(|(i, _)| i),
            );
        }

        if include_background
            && x >= 0
            && y >= 0
            && (x as usize) < store.pixel_width()
            && (y as usize) < store.pixel_height()
        {
            let tile = store.tile_size();
            self.background_cell = store.cell_index(x as usize / tile, y as usize / tile);
        }

        if self.candidate_count() > 0 {
            self.active = Some(0);
        }
    }

    /// Sprite indices under the cursor, in sequence order
    pub fn hovered_sprites(&self) -> &[usize] {
        &self.sprite_hits
    }

    pub fn hovered_background_cell(&self) -> Option<usize> {
        self.background_cell
    }

    /// Raw selector into [sprite hits..., background cell]
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn candidate_count(&self) -> usize {
        self.sprite_hits.len() + usize::from(self.background_cell.is_some())
    }

    /// Active sprite, if the selector falls inside the sprite hits
    pub fn active_sprite(&self) -> Option<usize> {
        self.active.and_then(|i| self.sprite_hits.get(i).copied())
    }

    /// Active background cell, if the selector falls through past every sprite hit
    pub fn active_background_cell(&self) -> Option<usize> {
        match self.active {
            Some(i) if i == self.sprite_hits.len() => self.background_cell,
            _ => None,
        }
    }

    pub fn active_target(&self) -> HoverTarget {
        if let Some(sprite) = self.active_sprite() {
            HoverTarget::Sprite(sprite)
        } else if let Some(cell) = self.active_background_cell() {
            HoverTarget::Background(cell)
        } else {
            HoverTarget::None
        }
    }

    /// Every candidate in selector order
    pub fn candidates(&self) -> impl Iterator<Item = HoverTarget> + '_ {
        self.sprite_hits
            .iter()
            .map(|&i| HoverTarget::Sprite(i))
            .chain(self.background_cell.map(HoverTarget::Background))
    }

    /// Advance the selector to the next candidate, wrapping around
    pub fn cycle_active(&mut self) {
        let count = self.candidate_count();
        if count == 0 {
            self.active = None;
            return;
        }
        self.active = Some(self.active.map_or(0, |i| (i + 1) % count));
    }
}

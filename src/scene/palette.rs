//! Palettes
//!
//! A palette holds eight 4-color sub-palettes (four background, four
//! sprite), mirroring NES palette RAM. The scene keeps a bank of eight
//! palettes and one of them is active for rendering.

use serde::{Serialize, Deserialize};
use crate::rasterizer::Color;

/// Number of palettes in a bank
pub const PALETTE_COUNT: usize = 8;
/// Sub-palettes per palette
pub const SUB_PALETTES: usize = 8;

/// Eight sub-palettes of four colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub colors: [[Color; 4]; SUB_PALETTES],
}

impl Palette {
    /// Resolve a 2-bit texel through a sub-palette
    pub fn color(&self, sub_palette: u8, entry: u8) -> Color {
        self.colors[sub_palette as usize % SUB_PALETTES][entry as usize & 3]
    }

    /// A palette whose sub-palettes are ramps of a base tint
    pub fn tinted(base: Color) -> Self {
        let mut colors = [[Color::BLACK; 4]; SUB_PALETTES];
        for (i, sub) in colors.iter_mut().enumerate() {
            // Rotate channels per sub-palette so neighbours are distinguishable
            let (r, g, b) = match i % 3 {
                0 => (base.r, base.g, base.b),
                1 => (base.g, base.b, base.r),
                _ => (base.b, base.r, base.g),
            };
            for (level, c) in sub.iter_mut().enumerate() {
                let k = level as u32;
                let ramp = |v: u8| ((v as u32 * k + 255 * k) / 6).min(255) as u8;
                *c = Color::new(ramp(r), ramp(g), ramp(b));
            }
        }
        Self { colors }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::tinted(Color::new(200, 120, 60))
    }
}

/// The bank of palettes plus the selected one
#[derive(Debug, Clone)]
pub struct PaletteBank {
    palettes: [Palette; PALETTE_COUNT],
    selected: usize,
}

impl PaletteBank {
    pub fn new(palettes: [Palette; PALETTE_COUNT]) -> Self {
        Self { palettes, selected: 0 }
    }

    pub fn selected(&self) -> &Palette {
        &self.palettes[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn get(&self, index: usize) -> Option<&Palette> {
        self.palettes.get(index)
    }

    /// Replace one palette; out-of-range indices are ignored
    pub fn set(&mut self, index: usize, palette: Palette) {
        if let Some(slot) = self.palettes.get_mut(index) {
            *slot = palette;
        }
    }

    pub fn select_next(&mut self) -> usize {
        self.selected = (self.selected + 1) % PALETTE_COUNT;
        self.selected
    }

    pub fn select_previous(&mut self) -> usize {
        self.selected = (self.selected + PALETTE_COUNT - 1) % PALETTE_COUNT;
        self.selected
    }
}

impl Default for PaletteBank {
    fn default() -> Self {
        const TINTS: [Color; PALETTE_COUNT] = [
            Color::new(200, 120, 60),
            Color::new(60, 160, 220),
            Color::new(120, 200, 80),
            Color::new(220, 80, 160),
            Color::new(230, 210, 90),
            Color::new(150, 110, 220),
            Color::new(90, 200, 190),
            Color::new(180, 180, 180),
        ];
        Self::new(TINTS.map(Palette::tinted))
    }
}

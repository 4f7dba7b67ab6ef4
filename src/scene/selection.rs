//! Selection Set - persistent, user-confirmed picks on both layers

use std::collections::HashSet;
use super::highlight::HoverTarget;

/// Which addressable layer an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Sprite,
}

/// Selected background cells and sprites
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    background: HashSet<usize>,
    sprites: HashSet<usize>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn layer(&self, layer: Layer) -> &HashSet<usize> {
        match layer {
            Layer::Background => &self.background,
            Layer::Sprite => &self.sprites,
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut HashSet<usize> {
        match layer {
            Layer::Background => &mut self.background,
            Layer::Sprite => &mut self.sprites,
        }
    }

    pub fn select(&mut self, layer: Layer, index: usize) {
        self.layer_mut(layer).insert(index);
    }

    pub fn deselect(&mut self, layer: Layer, index: usize) {
        self.layer_mut(layer).remove(&index);
    }

    /// Flip membership, returning whether the index is now selected
    pub fn toggle(&mut self, layer: Layer, index: usize) -> bool {
        let set = self.layer_mut(layer);
        if set.remove(&index) {
            false
        } else {
            set.insert(index);
            true
        }
    }

    pub fn contains(&self, layer: Layer, index: usize) -> bool {
        self.layer(layer).contains(&index)
    }

    pub fn clear(&mut self) {
        self.background.clear();
        self.sprites.clear();
    }

    /// Selected indices of one layer (unordered)
    pub fn selected(&self, layer: Layer) -> impl Iterator<Item = usize> + '_ {
        self.layer(layer).iter().copied()
    }

    pub fn len(&self) -> usize {
        self.background.len() + self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_empty() && self.sprites.is_empty()
    }

    /// Add a hover target to the selection; returns false for HoverTarget::None
    pub fn select_target(&mut self, target: HoverTarget) -> bool {
        match target {
            HoverTarget::Sprite(i) => self.select(Layer::Sprite, i),
            HoverTarget::Background(cell) => self.select(Layer::Background, cell),
            HoverTarget::None => return false,
        }
        true
    }

    /// Toggle a hover target; returns false for HoverTarget::None
    pub fn toggle_target(&mut self, target: HoverTarget) -> bool {
        match target {
            HoverTarget::Sprite(i) => self.toggle(Layer::Sprite, i),
            HoverTarget::Background(cell) => self.toggle(Layer::Background, cell),
            HoverTarget::None => return false,
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_are_independent() {
        let mut sel = SelectionSet::new();
        sel.select(Layer::Background, 5);
        assert!(sel.contains(Layer::Background, 5));
        assert!(!sel.contains(Layer::Sprite, 5));
    }

    #[test]
    fn test_select_deselect_clear() {
        let mut sel = SelectionSet::new();
        sel.select(Layer::Sprite, 1);
        sel.select(Layer::Sprite, 1);
        sel.select(Layer::Background, 2);
        assert_eq!(sel.len(), 2);

        sel.deselect(Layer::Sprite, 1);
        assert!(!sel.contains(Layer::Sprite, 1));
        sel.deselect(Layer::Sprite, 99);

        sel.clear();
        assert!(sel.is_empty());
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut sel = SelectionSet::new();
        assert!(sel.toggle(Layer::Background, 3));
        assert!(!sel.toggle(Layer::Background, 3));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_targets() {
        let mut sel = SelectionSet::new();
        assert!(sel.select_target(HoverTarget::Sprite(4)));
        assert!(sel.select_target(HoverTarget::Background(130)));
        assert!(!sel.select_target(HoverTarget::None));
        let mut cells: Vec<_> = sel.selected(Layer::Background).collect();
        cells.sort();
        assert_eq!(cells, vec![130]);

        assert!(sel.toggle_target(HoverTarget::Sprite(4)));
        assert!(!sel.contains(Layer::Sprite, 4));
    }
}

//! Object layer pair table: which layers collide with which.

use cubefall_core::types::CollisionLayer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerTable {
    layer_count: usize,
    pairs: Vec<bool>,
}

impl LayerTable {
    /// A table of `layer_count` layers with every pair disabled.
    pub fn new(layer_count: usize) -> Self {
        Self {
            layer_count,
            pairs: vec![false; layer_count * layer_count],
        }
    }

    /// Enable collision between `a` and `b` (symmetric). Unknown layers are ignored.
    pub fn enable_collision(&mut self, a: CollisionLayer, b: CollisionLayer) {
        let (a, b) = (a.0 as usize, b.0 as usize);
        if a >= self.layer_count || b >= self.layer_count {
            return;
        }
        self.pairs[a * self.layer_count + b] = true;
        self.pairs[b * self.layer_count + a] = true;
    }

    pub fn collides(&self, a: CollisionLayer, b: CollisionLayer) -> bool {
        let (a, b) = (a.0 as usize, b.0 as usize);
        a < self.layer_count && b < self.layer_count && self.pairs[a * self.layer_count + b]
    }

    pub fn contains(&self, layer: CollisionLayer) -> bool {
        (layer.0 as usize) < self.layer_count
    }

    pub fn layer_count(&self) -> usize {
        self.layer_count
    }
}

impl Default for LayerTable {
    /// One layer that collides with itself.
    fn default() -> Self {
        let mut table = Self::new(1);
        table.enable_collision(CollisionLayer::DEFAULT, CollisionLayer::DEFAULT);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_single_layer_self_collides() {
        let table = LayerTable::default();
        assert_eq!(table.layer_count(), 1);
        assert!(table.collides(CollisionLayer(0), CollisionLayer(0)));
        assert!(!table.collides(CollisionLayer(0), CollisionLayer(1)));
    }

    #[test]
    fn test_enable_is_symmetric() {
        let mut table = LayerTable::new(3);
        table.enable_collision(CollisionLayer(0), CollisionLayer(2));
        assert!(table.collides(CollisionLayer(2), CollisionLayer(0)));
        assert!(!table.collides(CollisionLayer(1), CollisionLayer(1)));
    }
}

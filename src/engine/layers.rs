//! Ordered layers: painter's algorithm by layer position, then by position
//! within the layer.

use super::sprite::SpriteHandle;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer {
    sprites: Vec<SpriteHandle>,
}

impl Layer {
    pub fn new(sprites: Vec<SpriteHandle>) -> Self {
        Layer { sprites }
    }

    pub fn push(&mut self, sprite: SpriteHandle) {
        self.sprites.push(sprite);
    }

    pub fn sprites(&self) -> &[SpriteHandle] {
        &self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new layer at `index`, moving the layer there (and every one
    /// after it) one step up. An index past the end appends.
    pub fn add_layer(&mut self, sprites: Vec<SpriteHandle>, index: usize) {
        let index = index.min(self.layers.len());
        self.layers.insert(index, Layer::new(sprites));
    }

    /// Append a layer drawn above all existing ones.
    pub fn push_layer(&mut self, sprites: Vec<SpriteHandle>) {
        self.layers.push(Layer::new(sprites));
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Back-to-front draw order across all layers.
    pub fn draw_order(&self) -> impl Iterator<Item = SpriteHandle> + '_ {
        self.layers.iter().flat_map(|l| l.sprites.iter().copied())
    }
}

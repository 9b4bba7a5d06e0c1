//! The z-ordered layer stack
//!
//! Index 0 is the locked background fill, index 1 the border outline; both are
//! protected from tools and from removal. User layers follow in creation order,
//! the last one being topmost for both rendering and hit-testing.

use crate::address::{GridAddress, GridGeometry};
use crate::cell::Shape;
use crate::error::EditorError;
use crate::layer::Layer;
use crate::palette::{ColorIndex, Palette};
use crate::render::TileSurface;
use serde::{Deserialize, Serialize};

pub const BACKGROUND: usize = 0;
pub const BORDER: usize = 1;

/// Indices that tools and removal must never target.
pub const PROTECTED: [usize; 2] = [BACKGROUND, BORDER];

pub const BACKGROUND_NAME: &str = "background";
pub const BORDER_NAME: &str = "border";

/// Ordered layers, bottom first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Layer>", into = "Vec<Layer>")]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl TryFrom<Vec<Layer>> for LayerStack {
    type Error = EditorError;

    fn try_from(layers: Vec<Layer>) -> Result<Self, Self::Error> {
        if layers.len() < PROTECTED.len() {
            return Err(EditorError::MissingBaseLayers(layers.len()));
        }
        Ok(Self { layers })
    }
}

impl From<LayerStack> for Vec<Layer> {
    fn from(stack: LayerStack) -> Self {
        stack.layers
    }
}

impl LayerStack {
    /// A stack holding only the background and border of `grid`.
    pub fn new(
        grid: &GridGeometry,
        background_color: ColorIndex,
        border_color: ColorIndex,
        border_width: u32,
    ) -> Self {
        let mut background =
            Layer::filled(BACKGROUND_NAME, grid.addresses(), background_color, Shape::Square);
        background.set_locked(true);
        let border = Layer::filled(
            BORDER_NAME,
            grid.perimeter(border_width),
            border_color,
            Shape::Square,
        );
        Self { layers: vec![background, border] }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false: the base layers are never removed.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of layers above the protected base.
    pub fn user_len(&self) -> usize {
        self.layers.len().saturating_sub(PROTECTED.len())
    }

    pub fn is_protected(index: usize) -> bool {
        PROTECTED.contains(&index)
    }

    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layers bottom to top, the order they are drawn in.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Index of the topmost user layer, if there is one.
    pub fn topmost_user_index(&self) -> Option<usize> {
        let top = self.layers.len().checked_sub(1)?;
        (!Self::is_protected(top)).then_some(top)
    }

    /// Append a layer as the new topmost and return its index.
    pub fn add(&mut self, layer: Layer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    /// Remove and return the layer at `index`. Protected indices are refused.
    pub fn remove_at(&mut self, index: usize) -> Result<Layer, EditorError> {
        if Self::is_protected(index) {
            return Err(EditorError::ProtectedLayer(index));
        }
        if index >= self.layers.len() {
            return Err(EditorError::LayerOutOfRange { index, len: self.layers.len() });
        }
        Ok(self.layers.remove(index))
    }

    /// Drop the topmost user layer, if any.
    pub fn pop_user_layer(&mut self) -> Option<Layer> {
        let top = self.topmost_user_index()?;
        Some(self.layers.remove(top))
    }

    /// Topmost visible layer holding `address`.
    pub fn topmost_hit_at(&self, address: GridAddress) -> Option<usize> {
        self.layers.iter().rposition(|layer| layer.is_visible() && layer.has(address))
    }

    /// Whether tools may change the layer at `index`: not protected and not locked.
    pub fn is_editable(&self, index: usize) -> bool {
        !Self::is_protected(index) && self.layers.get(index).is_some_and(|l| !l.is_locked())
    }

    /// Like [`LayerStack::topmost_hit_at`], but a hit on a protected or locked layer counts
    /// as a miss.
    pub fn editable_hit_at(&self, address: GridAddress) -> Option<usize> {
        self.topmost_hit_at(address).filter(|&index| self.is_editable(index))
    }

    /// Draw every visible layer, bottom first.
    pub fn draw<S: TileSurface + ?Sized>(&self, palette: &Palette, surface: &mut S) {
        for layer in self.layers.iter().filter(|l| l.is_visible()) {
            layer.draw(palette, surface);
        }
    }
}

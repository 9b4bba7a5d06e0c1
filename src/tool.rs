//! Editor state and the pointer-driven tool state machine
//!
//! All mutable editor state lives in one [`EditorState`] value. A UI
//! collaborator feeds it pointer events in canvas pixels
//! ([`EditorState::on_pointer_down`], [`EditorState::on_pointer_move`],
//! [`EditorState::on_pointer_up`]) and text submissions
//! ([`EditorState::on_submit_text`]); a renderer reads
//! [`EditorState::draw_order`] once per frame.
//!
//! # Modes
//!
//! | Mode | drag | release |
//! |------|------|---------|
//! | Draw | stamp a cell into the working layer | commit the working layer |
//! | Fill | - | recolor the layer under the pointer |
//! | Move | stage an offset on the grabbed layer | commit the offset |
//! | Copy | as Move, on a fresh duplicate | commit the offset |
//! | Pull | remove the cell under the pointer | remove the cell under the pointer |
//!
//! Background and border never take part: hits on them count as misses.

use crate::address::{GridAddress, GridGeometry, GridOffset};
use crate::cell::{Cell, Shape};
use crate::codec;
use crate::document::Document;
use crate::error::EditorError;
use crate::glyph::Font;
use crate::layer::Layer;
use crate::palette::{ColorIndex, Palette};
use crate::render::{self, TileSurface};
use crate::stack::LayerStack;
use image::{Rgba, RgbaImage};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Interaction performed by pointer drags and releases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Draw,
    Fill,
    Move,
    Copy,
    Pull,
}

impl Mode {
    pub const ALL: [Mode; 5] = [Mode::Draw, Mode::Fill, Mode::Move, Mode::Copy, Mode::Pull];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Draw => "draw",
            Mode::Fill => "fill",
            Mode::Move => "move",
            Mode::Copy => "copy",
            Mode::Pull => "pull",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown mode '{}', expected draw, fill, move, copy or pull", s))
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The layer being dragged and the pixel where the drag started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drag {
    pub target: usize,
    pub anchor: (i32, i32),
}

/// Complete editor state threaded through every command.
#[derive(Debug, Clone)]
pub struct EditorState {
    grid: GridGeometry,
    palette: Palette,
    stack: LayerStack,
    working: Layer,
    mode: Mode,
    tool: Shape,
    color: ColorIndex,
    extend: bool,
    drag: Option<Drag>,
    pointer_held: bool,
    next_layer: usize,
}

impl EditorState {
    /// Editor over an existing stack, in Draw mode with the pen.
    pub fn new(grid: GridGeometry, palette: Palette, stack: LayerStack) -> Self {
        let color = ColorIndex::new(if palette.len() > 1 { 1 } else { 0 });
        let numbered = stack
            .iter()
            .filter_map(|l| l.name().strip_prefix("layer-")?.parse::<usize>().ok())
            .max()
            .unwrap_or(0);
        let next_layer = stack.user_len().max(numbered) + 1;
        Self {
            grid,
            palette,
            stack,
            working: Layer::new(""),
            mode: Mode::Draw,
            tool: Shape::Pen,
            color,
            extend: false,
            drag: None,
            pointer_held: false,
            next_layer,
        }
    }

    /// Editor over a fresh background and border.
    pub fn blank(
        grid: GridGeometry,
        palette: Palette,
        background: ColorIndex,
        border: ColorIndex,
        border_width: u32,
    ) -> Result<Self, EditorError> {
        grid.validate()?;
        palette.check(background.index())?;
        palette.check(border.index())?;
        let stack = LayerStack::new(&grid, background, border, border_width);
        Ok(Self::new(grid, palette, stack))
    }

    /// Editor over a validated document.
    pub fn from_document(document: Document) -> Result<Self, EditorError> {
        document.validate()?;
        Ok(Self::new(document.grid, document.palette, document.layers))
    }

    /// Committed state as a document. The working layer is not included.
    pub fn document(&self) -> Document {
        Document::new(self.grid, self.palette.clone(), self.stack.clone())
    }

    pub fn grid(&self) -> &GridGeometry {
        &self.grid
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn stack(&self) -> &LayerStack {
        &self.stack
    }

    pub fn working_layer(&self) -> &Layer {
        &self.working
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn tool(&self) -> Shape {
        self.tool
    }

    pub fn color(&self) -> ColorIndex {
        self.color
    }

    pub fn drag(&self) -> Option<Drag> {
        self.drag
    }

    pub fn extend_modifier(&self) -> bool {
        self.extend
    }

    /// Switch modes. A drag still in flight is committed first.
    pub fn set_mode(&mut self, mode: Mode) {
        self.commit_drag();
        debug!("mode {} -> {}", self.mode, mode);
        self.mode = mode;
    }

    pub fn set_tool(&mut self, tool: Shape) {
        self.tool = tool;
    }

    /// Select the draw/fill color. Indices outside the palette are rejected.
    pub fn set_color(&mut self, index: usize) -> Result<(), EditorError> {
        self.color = self.palette.check(index)?;
        Ok(())
    }

    /// Held-key state: draw into the topmost layer instead of a new one.
    pub fn set_extend_modifier(&mut self, held: bool) {
        self.extend = held;
    }

    pub fn on_pointer_down(&mut self, x: i32, y: i32) {
        trace!("pointer down at ({}, {})", x, y);
        self.pointer_held = true;
    }

    /// One drag tick. Moves without a held pointer are hover and do nothing.
    pub fn on_pointer_move(&mut self, x: i32, y: i32) {
        if !self.pointer_held {
            return;
        }
        match self.mode {
            Mode::Draw => self.stamp(self.grid.address_at(x, y)),
            Mode::Fill => {}
            Mode::Move => self.drag_tick(x, y, false),
            Mode::Copy => self.drag_tick(x, y, true),
            Mode::Pull => self.pull_at(self.grid.address_at(x, y)),
        }
    }

    /// Release. Any drag is committed and cleared before the mode handles it.
    pub fn on_pointer_up(&mut self, x: i32, y: i32) {
        self.pointer_held = false;
        self.commit_drag();

        let address = self.grid.address_at(x, y);
        match self.mode {
            Mode::Draw => self.finish_stroke(address),
            Mode::Fill => self.fill_at(address),
            Mode::Move | Mode::Copy => {}
            Mode::Pull => self.pull_at(address),
        }
    }

    /// Typeset `text` centered on the grid, one layer per glyph plane, in the
    /// current color. Returns the number of layers added.
    pub fn on_submit_text(&mut self, font: &Font, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        let layout = codec::layout_text(font, text);
        let origin = layout.centered_origin(&self.grid);
        let layers = codec::typeset(&layout, origin, self.color, &self.palette);
        let added = layers.len();
        for layer in layers {
            self.stack.add(layer);
        }
        debug!("text {:?} added {} layer(s) at {}", text, added, origin);
        added
    }

    /// Drop the topmost user layer.
    pub fn pop_layer(&mut self) -> Option<Layer> {
        self.commit_drag();
        let popped = self.stack.pop_user_layer();
        if let Some(layer) = &popped {
            debug!("popped layer '{}'", layer.name());
        }
        popped
    }

    /// Show or hide a layer. Locked layers stay visible.
    pub fn set_layer_visible(&mut self, index: usize, visible: bool) -> Result<(), EditorError> {
        let len = self.stack.len();
        let layer = self
            .stack
            .get_mut(index)
            .ok_or(EditorError::LayerOutOfRange { index, len })?;
        layer.set_visible(visible);
        Ok(())
    }

    pub fn remove_layer(&mut self, index: usize) -> Result<Layer, EditorError> {
        self.commit_drag();
        self.stack.remove_at(index)
    }

    /// Layers in render order: the stack bottom first, then the working layer.
    pub fn draw_order(&self) -> impl Iterator<Item = &Layer> {
        self.stack.iter().chain(std::iter::once(&self.working))
    }

    /// Hand every visible tile, in render order, to a surface.
    pub fn draw<S: TileSurface + ?Sized>(&self, surface: &mut S) {
        for layer in self.draw_order().filter(|l| l.is_visible()) {
            layer.draw(&self.palette, surface);
        }
    }

    /// Rasterize the current frame.
    pub fn render(&self, canvas: Rgba<u8>) -> RgbaImage {
        render::render_layers(self.draw_order(), &self.palette, &self.grid, canvas)
    }

    fn next_layer_name(&mut self) -> String {
        let name = format!("layer-{}", self.next_layer);
        self.next_layer += 1;
        name
    }

    /// Place a cell of the current tool and color. Off-grid stamps are dropped.
    fn stamp(&mut self, address: GridAddress) {
        if !self.grid.contains(address) {
            trace!("stamp at {} is off the grid", address);
            return;
        }
        let cell = Cell::new(address, self.color, self.tool);
        if self.extend {
            let target = self.stack.topmost_user_index().filter(|&i| self.stack.is_editable(i));
            if let Some(layer) = target.and_then(|i| self.stack.get_mut(i)) {
                layer.push(cell, self.tool.smooths());
                return;
            }
        }
        self.working.push(cell, false);
    }

    fn finish_stroke(&mut self, address: GridAddress) {
        if self.working.is_empty() && self.grid.contains(address) {
            self.stamp(address);
        }
        if self.working.is_empty() {
            return;
        }
        let mut layer = std::mem::replace(&mut self.working, Layer::new(""));
        if self.tool.smooths() {
            layer.smooth();
        }
        layer.set_name(self.next_layer_name());
        let index = self.stack.add(layer);
        debug!("committed stroke as layer {}", index);
    }

    fn drag_tick(&mut self, x: i32, y: i32, copy: bool) {
        match self.drag {
            Some(drag) => {
                let delta = GridOffset::between_pixels(drag.anchor, (x, y), self.grid.zoom);
                if let Some(layer) = self.stack.get_mut(drag.target) {
                    trace!("staging ({}, {}) on layer {}", delta.dx, delta.dy, drag.target);
                    layer.offset(delta.dx, delta.dy);
                }
            }
            None => {
                let Some(hit) = self.stack.editable_hit_at(self.grid.address_at(x, y)) else {
                    return;
                };
                let target = if copy {
                    let Some(clone) = self.stack.get(hit).map(Layer::duplicate) else {
                        return;
                    };
                    self.stack.add(clone)
                } else {
                    hit
                };
                debug!("drag started on layer {} (copy: {})", target, copy);
                self.drag = Some(Drag { target, anchor: (x, y) });
            }
        }
    }

    fn commit_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            if let Some(layer) = self.stack.get_mut(drag.target) {
                layer.finalize();
                debug!("drag committed on layer {}", drag.target);
            }
        }
    }

    fn fill_at(&mut self, address: GridAddress) {
        let color = self.color;
        if let Some(layer) = self.stack.editable_hit_at(address).and_then(|i| self.stack.get_mut(i)) {
            layer.fill(color);
        }
    }

    fn pull_at(&mut self, address: GridAddress) {
        if let Some(layer) = self.stack.editable_hit_at(address).and_then(|i| self.stack.get_mut(i)) {
            layer.remove(address);
        }
    }
}

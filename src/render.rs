//! Tile rasterization to image buffers
//!
//! The editor core only decides where a tile goes, what shape it has and which
//! color it uses; a [`TileSurface`] turns that into pixels. [`ImageSurface`] is
//! the `image`-backed surface used for previews and CLI output.

use crate::address::{GridAddress, GridGeometry};
use crate::cell::Shape;
use crate::layer::Layer;
use crate::palette::Palette;
use image::{Rgba, RgbaImage};

/// Magenta used for colors missing from the palette
pub const MAGENTA: Rgba<u8> = Rgba([255, 0, 255, 255]);

/// Dark grey shown where no tile covers the canvas
pub const CANVAS: Rgba<u8> = Rgba([0x3f, 0x3f, 0x3e, 255]);

/// Something tiles can be drawn onto.
pub trait TileSurface {
    /// Draw one tile. `color` is `None` when the cell's index is not in the palette.
    fn draw_tile(&mut self, address: GridAddress, shape: Shape, color: Option<Rgba<u8>>);
}

/// A surface backed by an RGBA image, `zoom` pixels per tile.
#[derive(Debug, Clone)]
pub struct ImageSurface {
    image: RgbaImage,
    zoom: u32,
}

impl ImageSurface {
    /// A canvas covering `grid`, filled with `background`.
    pub fn new(grid: &GridGeometry, background: Rgba<u8>) -> Self {
        let (w, h) = grid.pixel_size();
        Self { image: RgbaImage::from_pixel(w, h, background), zoom: grid.zoom.max(1) }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl TileSurface for ImageSurface {
    fn draw_tile(&mut self, address: GridAddress, shape: Shape, color: Option<Rgba<u8>>) {
        let color = color.unwrap_or(MAGENTA);
        let size = self.zoom as i64;
        let origin_x = address.gx as i64 * size;
        let origin_y = address.gy as i64 * size;

        for v in 0..size {
            let py = origin_y + v;
            if py < 0 || py >= self.image.height() as i64 {
                continue;
            }
            for u in 0..size {
                let px = origin_x + u;
                if px < 0 || px >= self.image.width() as i64 {
                    continue;
                }
                if covers(shape, u, v, size) {
                    self.image.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }
}

/// Whether tile-local pixel `(u, v)` is inside `shape` on a `size`-pixel tile.
///
/// Corners are quarter discs of radius `size` centered on the tile corner
/// opposite the rounded one; `CornerNE` is centered bottom-left, and so on.
pub fn covers(shape: Shape, u: i64, v: i64, size: i64) -> bool {
    // pixel centers, doubled to stay in integers
    let x = 2 * u + 1;
    let y = 2 * v + 1;
    let s = 2 * size;
    let within = |cx: i64, cy: i64, r: i64| (x - cx).pow(2) + (y - cy).pow(2) <= r * r;

    match shape {
        Shape::Square | Shape::Pen => true,
        Shape::Circle => within(size, size, size),
        Shape::CornerNe => within(0, s, s),
        Shape::CornerSe => within(0, 0, s),
        Shape::CornerSw => within(s, 0, s),
        Shape::CornerNw => within(s, s, s),
    }
}

/// Paint the canvas, then every visible layer bottom first.
pub fn render_layers<'a>(
    layers: impl IntoIterator<Item = &'a Layer>,
    palette: &Palette,
    grid: &GridGeometry,
    canvas: Rgba<u8>,
) -> RgbaImage {
    let mut surface = ImageSurface::new(grid, canvas);
    for layer in layers.into_iter().filter(|l| l.is_visible()) {
        layer.draw(palette, &mut surface);
    }
    surface.into_image()
}

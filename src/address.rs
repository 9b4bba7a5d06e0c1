//! Grid addressing for the tile lattice
//!
//! A [`GridAddress`] names one tile position by integer column and row. It is a
//! plain value: equality, hashing and ordering are structural, so it can key the
//! address index of a layer directly.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};
use thiserror::Error;

/// Most tiles a panel may have.
pub const MAX_TILES: u64 = 1 << 16;

/// Most pixels a rendered panel may have.
pub const MAX_PIXELS: u64 = 1 << 24;

/// Integer `(column, row)` coordinate on the tile grid.
///
/// `(0, 0)` is the top-left tile, `gx` grows to the east and `gy` to the south.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridAddress {
    pub gx: i32,
    pub gy: i32,
}

impl GridAddress {
    pub const fn new(gx: i32, gy: i32) -> Self {
        Self { gx, gy }
    }

    /// Map a pixel position to the tile containing it.
    ///
    /// Uses floor division, so pixels left of or above the origin land on
    /// negative addresses instead of collapsing onto column/row zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use marquee::address::GridAddress;
    ///
    /// assert_eq!(GridAddress::from_pixel(50, 23, 24), GridAddress::new(2, 0));
    /// assert_eq!(GridAddress::from_pixel(-1, 0, 24), GridAddress::new(-1, 0));
    /// ```
    pub fn from_pixel(x: i32, y: i32, zoom: u32) -> Self {
        let zoom = zoom.max(1) as i32;
        Self { gx: x.div_euclid(zoom), gy: y.div_euclid(zoom) }
    }

    /// Address translated by a grid offset.
    pub fn translate(self, offset: GridOffset) -> Self {
        Self { gx: self.gx + offset.dx, gy: self.gy + offset.dy }
    }

    pub fn north(self) -> Self {
        Self::new(self.gx, self.gy - 1)
    }

    pub fn east(self) -> Self {
        Self::new(self.gx + 1, self.gy)
    }

    pub fn south(self) -> Self {
        Self::new(self.gx, self.gy + 1)
    }

    pub fn west(self) -> Self {
        Self::new(self.gx - 1, self.gy)
    }
}

impl From<(i32, i32)> for GridAddress {
    fn from((gx, gy): (i32, i32)) -> Self {
        Self::new(gx, gy)
    }
}

impl std::fmt::Display for GridAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.gx, self.gy)
    }
}

/// A translation measured in whole grid steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GridOffset {
    pub dx: i32,
    pub dy: i32,
}

impl GridOffset {
    pub const ZERO: GridOffset = GridOffset { dx: 0, dy: 0 };

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Whole-tile delta between two pixel positions, floored per axis.
    pub fn between_pixels(from: (i32, i32), to: (i32, i32), zoom: u32) -> Self {
        let zoom = zoom.max(1) as i32;
        Self { dx: (to.0 - from.0).div_euclid(zoom), dy: (to.1 - from.1).div_euclid(zoom) }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

impl Add<GridOffset> for GridAddress {
    type Output = GridAddress;

    fn add(self, rhs: GridOffset) -> GridAddress {
        self.translate(rhs)
    }
}

impl Sub for GridAddress {
    type Output = GridOffset;

    fn sub(self, rhs: GridAddress) -> GridOffset {
        GridOffset::new(self.gx - rhs.gx, self.gy - rhs.gy)
    }
}

/// A grid that cannot be edited or rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid {width}x{height} at zoom {zoom} has a zero dimension")]
    ZeroSize { width: u32, height: u32, zoom: u32 },
    #[error("grid {width}x{height} exceeds {} tiles", MAX_TILES)]
    TooManyTiles { width: u32, height: u32 },
    #[error("grid {width}x{height} at zoom {zoom} exceeds {} pixels", MAX_PIXELS)]
    TooManyPixels { width: u32, height: u32, zoom: u32 },
}

/// Tile dimensions of the panel and the pixel size of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub width: u32,
    pub height: u32,
    pub zoom: u32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self { width: 64, height: 16, zoom: 24 }
    }
}

impl GridGeometry {
    pub fn new(width: u32, height: u32, zoom: u32) -> Self {
        Self { width, height, zoom }
    }

    /// Whether an address lies on the panel.
    pub fn contains(&self, address: GridAddress) -> bool {
        address.gx >= 0
            && address.gy >= 0
            && (address.gx as i64) < self.width as i64
            && (address.gy as i64) < self.height as i64
    }

    /// Whether a pixel position lies on the panel.
    pub fn contains_pixel(&self, x: i32, y: i32) -> bool {
        self.contains(self.address_at(x, y))
    }

    pub fn address_at(&self, x: i32, y: i32) -> GridAddress {
        GridAddress::from_pixel(x, y, self.zoom)
    }

    /// Check that the grid is non-empty and small enough to hold and render.
    pub fn validate(&self) -> Result<(), GridError> {
        let Self { width, height, zoom } = *self;
        if width == 0 || height == 0 || zoom == 0 {
            return Err(GridError::ZeroSize { width, height, zoom });
        }
        let tiles = u64::from(width) * u64::from(height);
        if tiles > MAX_TILES {
            return Err(GridError::TooManyTiles { width, height });
        }
        let zoom_sq = u64::from(zoom) * u64::from(zoom);
        if tiles.checked_mul(zoom_sq).map_or(true, |pixels| pixels > MAX_PIXELS) {
            return Err(GridError::TooManyPixels { width, height, zoom });
        }
        Ok(())
    }

    /// Pixel size of the whole panel, saturating for grids that fail [`GridGeometry::validate`].
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.saturating_mul(self.zoom), self.height.saturating_mul(self.zoom))
    }

    /// Every address on the panel in column-major order.
    pub fn addresses(&self) -> impl Iterator<Item = GridAddress> + '_ {
        (0..self.width as i32)
            .flat_map(move |gx| (0..self.height as i32).map(move |gy| GridAddress::new(gx, gy)))
    }

    /// Addresses along the panel edge, `thickness` tiles deep.
    pub fn perimeter(&self, thickness: u32) -> Vec<GridAddress> {
        let t = thickness as i32;
        let (w, h) = (self.width as i32, self.height as i32);
        self.addresses()
            .filter(|a| a.gx < t || a.gy < t || a.gx >= w - t || a.gy >= h - t)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_address_equality_is_structural() {
        let mut set = HashSet::new();
        set.insert(GridAddress::new(3, 4));
        assert!(set.contains(&GridAddress::new(3, 4)));
        assert!(!set.contains(&GridAddress::new(4, 3)));
    }

    #[test]
    fn test_from_pixel_floors() {
        assert_eq!(GridAddress::from_pixel(0, 0, 24), GridAddress::new(0, 0));
        assert_eq!(GridAddress::from_pixel(23, 24, 24), GridAddress::new(0, 1));
        assert_eq!(GridAddress::from_pixel(-25, -1, 24), GridAddress::new(-2, -1));
    }

    #[test]
    fn test_offset_between_pixels() {
        assert_eq!(GridOffset::between_pixels((10, 10), (58, 10), 24), GridOffset::new(2, 0));
        assert_eq!(GridOffset::between_pixels((10, 10), (9, 10), 24), GridOffset::new(-1, 0));
        assert!(GridOffset::between_pixels((10, 10), (20, 20), 24).is_zero());
    }

    #[test]
    fn test_add_and_sub() {
        let a = GridAddress::new(2, 2);
        assert_eq!(a + GridOffset::new(1, -2), GridAddress::new(3, 0));
        assert_eq!(GridAddress::new(5, 1) - a, GridOffset::new(3, -1));
    }

    #[test]
    fn test_geometry_contains() {
        let g = GridGeometry::new(4, 3, 10);
        assert!(g.contains(GridAddress::new(0, 0)));
        assert!(g.contains(GridAddress::new(3, 2)));
        assert!(!g.contains(GridAddress::new(4, 0)));
        assert!(!g.contains(GridAddress::new(0, -1)));
        assert!(g.contains_pixel(39, 29));
        assert!(!g.contains_pixel(40, 0));
    }

    #[test]
    fn test_validate_grid_limits() {
        assert_eq!(GridGeometry::default().validate(), Ok(()));
        assert_eq!(GridGeometry::new(256, 256, 16).validate(), Ok(()));
        assert!(matches!(GridGeometry::new(0, 4, 10).validate(), Err(GridError::ZeroSize { .. })));
        assert!(matches!(GridGeometry::new(4, 4, 0).validate(), Err(GridError::ZeroSize { .. })));
        assert!(matches!(
            GridGeometry::new(257, 256, 1).validate(),
            Err(GridError::TooManyTiles { .. })
        ));
        // width * zoom alone overflows u32
        let huge = GridGeometry::new(200_000, 1, 30_000);
        assert!(matches!(huge.validate(), Err(GridError::TooManyTiles { .. })));
        assert!(matches!(
            GridGeometry::new(1, 1, u32::MAX).validate(),
            Err(GridError::TooManyPixels { .. })
        ));
        assert_eq!(huge.pixel_size(), (u32::MAX, 30_000));
    }

    #[test]
    fn test_perimeter_has_no_duplicates() {
        let g = GridGeometry::new(5, 4, 1);
        let edge = g.perimeter(1);
        let unique: HashSet<_> = edge.iter().copied().collect();
        assert_eq!(edge.len(), unique.len());
        // 5*4 grid minus 3*2 interior
        assert_eq!(edge.len(), 14);
        assert!(!unique.contains(&GridAddress::new(2, 2)));
    }
}

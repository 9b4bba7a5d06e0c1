//! Corner smoothing ("auto-tile")
//!
//! Looks at the four orthogonal neighbors of a tile and rounds it off when it
//! sits on the outside of an L-bend. The neighbor bitmask is:
//!
//! | bit | neighbor | address     |
//! |-----|----------|-------------|
//! | 1   | north    | `(gx, gy-1)`|
//! | 2   | east     | `(gx+1, gy)`|
//! | 4   | south    | `(gx, gy+1)`|
//! | 8   | west     | `(gx-1, gy)`|
//!
//! Only the four two-neighbor diagonal configurations become corners; isolated
//! tiles, straight runs, T-junctions and crosses stay square.

use crate::address::GridAddress;
use crate::cell::Shape;

pub const NORTH: u8 = 1;
pub const EAST: u8 = 2;
pub const SOUTH: u8 = 4;
pub const WEST: u8 = 8;

/// Neighbor bitmask of `address` under the given occupancy test.
pub fn neighbor_mask<F>(address: GridAddress, is_occupied: F) -> u8
where
    F: Fn(GridAddress) -> bool,
{
    let mut mask = 0;
    if is_occupied(address.north()) {
        mask |= NORTH;
    }
    if is_occupied(address.east()) {
        mask |= EAST;
    }
    if is_occupied(address.south()) {
        mask |= SOUTH;
    }
    if is_occupied(address.west()) {
        mask |= WEST;
    }
    mask
}

/// Shape for a neighbor bitmask.
pub fn shape_for_mask(mask: u8) -> Shape {
    match mask {
        m if m == NORTH | EAST => Shape::CornerSw,
        m if m == EAST | SOUTH => Shape::CornerNw,
        m if m == NORTH | WEST => Shape::CornerSe,
        m if m == SOUTH | WEST => Shape::CornerNe,
        _ => Shape::Square,
    }
}

/// Classify one tile against an occupancy test.
///
/// Depends only on which addresses are occupied, never on current shapes, so
/// re-running it over an already smoothed layer changes nothing.
///
/// # Examples
///
/// ```
/// use marquee::address::GridAddress;
/// use marquee::autotile::classify;
/// use marquee::cell::Shape;
/// use std::collections::HashSet;
///
/// let occupied: HashSet<_> =
///     [(2, 2), (3, 2), (2, 3)].into_iter().map(GridAddress::from).collect();
/// let shape = classify(GridAddress::new(2, 2), |a| occupied.contains(&a));
/// assert_eq!(shape, Shape::CornerNw);
/// ```
pub fn classify<F>(address: GridAddress, is_occupied: F) -> Shape
where
    F: Fn(GridAddress) -> bool,
{
    shape_for_mask(neighbor_mask(address, is_occupied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn set(points: &[(i32, i32)]) -> HashSet<GridAddress> {
        points.iter().copied().map(GridAddress::from).collect()
    }

    #[test]
    fn test_mask_bit_order() {
        let all = set(&[(5, 4), (6, 5), (5, 6), (4, 5)]);
        let at = GridAddress::new(5, 5);
        assert_eq!(neighbor_mask(at, |a| all.contains(&a)), 15);
        assert_eq!(neighbor_mask(at, |a| a == GridAddress::new(5, 4)), NORTH);
        assert_eq!(neighbor_mask(at, |a| a == GridAddress::new(6, 5)), EAST);
        assert_eq!(neighbor_mask(at, |a| a == GridAddress::new(5, 6)), SOUTH);
        assert_eq!(neighbor_mask(at, |a| a == GridAddress::new(4, 5)), WEST);
    }

    #[test]
    fn test_corner_table() {
        assert_eq!(shape_for_mask(3), Shape::CornerSw);
        assert_eq!(shape_for_mask(6), Shape::CornerNw);
        assert_eq!(shape_for_mask(9), Shape::CornerSe);
        assert_eq!(shape_for_mask(12), Shape::CornerNe);
    }

    #[test]
    fn test_everything_else_is_square() {
        for mask in 0..16u8 {
            if matches!(mask, 3 | 6 | 9 | 12) {
                continue;
            }
            assert_eq!(shape_for_mask(mask), Shape::Square, "mask {}", mask);
        }
    }

    #[test]
    fn test_l_shape_classification() {
        let occupied = set(&[(2, 2), (3, 2), (2, 3)]);
        let is_occupied = |a: GridAddress| occupied.contains(&a);

        assert_eq!(neighbor_mask(GridAddress::new(2, 2), is_occupied), 6);
        assert_eq!(classify(GridAddress::new(2, 2), is_occupied), Shape::CornerNw);

        assert_eq!(neighbor_mask(GridAddress::new(3, 2), is_occupied), 8);
        assert_eq!(classify(GridAddress::new(3, 2), is_occupied), Shape::Square);

        assert_eq!(neighbor_mask(GridAddress::new(2, 3), is_occupied), 1);
        assert_eq!(classify(GridAddress::new(2, 3), is_occupied), Shape::Square);
    }

    #[test]
    fn test_straight_run_and_junctions_stay_square() {
        let run = set(&[(0, 0), (1, 0), (2, 0)]);
        assert_eq!(classify(GridAddress::new(1, 0), |a| run.contains(&a)), Shape::Square);

        let tee = set(&[(0, 0), (1, 0), (2, 0), (1, 1)]);
        assert_eq!(classify(GridAddress::new(1, 0), |a| tee.contains(&a)), Shape::Square);
    }
}

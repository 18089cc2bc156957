use crate::infra::Position;
use crate::state::{CellKind, Grid};

pub const MAX_HUMIDITY: u32 = 6;

/// Humidity of a cell: 2 for a swamp cell itself plus 1 per swampy neighbor.
/// Off-map positions are dry, and off-map neighbors count as meadow.
pub fn humidity(grid: &Grid, pos: Position) -> u32 {
    let Some(kind) = grid.get(pos) else {
        return 0;
    };

    let base = if kind == CellKind::Swamp { 2 } else { 0 };
    let wet_neighbors = grid
        .neighbors(pos)
        .iter()
        .map(|neighbor| neighbor.and_then(|p| grid.get(p)).unwrap_or(CellKind::Meadow))
        .filter(|kind| *kind == CellKind::Swamp)
        .count() as u32;

    base + wet_neighbors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::arb_grid;
    use proptest::prelude::*;

    #[test]
    fn test_dry_meadow() {
        let grid = Grid::parse("MMM\nMMM\nMMM").unwrap();
        assert_eq!(humidity(&grid, Position::new(1, 1)), 0);
    }

    #[test]
    fn test_swamp_surrounded_by_swamp_is_maximal() {
        let grid = Grid::parse("MSM\nSSS\nMSM").unwrap();
        assert_eq!(humidity(&grid, Position::new(1, 1)), MAX_HUMIDITY);
    }

    #[test]
    fn test_edge_neighbors_count_as_meadow() {
        let grid = Grid::parse("SS\nMM").unwrap();
        assert_eq!(humidity(&grid, Position::new(0, 0)), 3);
        assert_eq!(humidity(&grid, Position::new(1, 0)), 1);
        assert_eq!(humidity(&grid, Position::new(1, 1)), 1);
    }

    #[test]
    fn test_diagonal_swamps_are_ignored() {
        let grid = Grid::parse("SMS\nMCM\nSMS").unwrap();
        assert_eq!(humidity(&grid, Position::new(1, 1)), 0);
    }

    #[test]
    fn test_out_of_bounds_is_zero() {
        let grid = Grid::parse("SS\nSS").unwrap();
        assert_eq!(humidity(&grid, Position::new(-1, 0)), 0);
        assert_eq!(humidity(&grid, Position::new(0, 2)), 0);
    }

    proptest! {
        #[test]
        fn test_humidity_in_range(grid in arb_grid(), row in -2i32..8, col in -2i32..8) {
            prop_assert!(humidity(&grid, Position::new(row, col)) <= MAX_HUMIDITY);
        }

        #[test]
        fn test_humidity_is_local(grid in arb_grid(), row in 0i32..6, col in 0i32..6) {
            let pos = Position::new(row, col);
            prop_assume!(grid.contains(pos));

            // Rewriting every cell farther than one step away must not change the value.
            let text = grid
                .positions()
                .map(|p| {
                    let glyph = if p.distance(&pos) <= 1 {
                        grid.get(p).unwrap().glyph()
                    } else {
                        'S'
                    };
                    (p, glyph)
                })
                .fold(String::new(), |mut acc, (p, glyph)| {
                    if p.col == 0 && p.row > 0 {
                        acc.push('\n');
                    }
                    acc.push(glyph);
                    acc
                });
            let rewritten = Grid::parse(&text).unwrap();
            prop_assert_eq!(humidity(&grid, pos), humidity(&rewritten, pos));
        }
    }
}

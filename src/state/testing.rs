//! Shared generators for property tests.

use proptest::prelude::*;

use crate::state::Grid;

pub fn glyph() -> impl Strategy<Value = char> {
    prop_oneof![Just('M'), Just('S'), Just('W'), Just('C'), Just('B')]
}

pub fn grid_text(rows: usize, cols: usize, glyphs: &[char]) -> String {
    glyphs
        .chunks(cols)
        .take(rows)
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Random grids up to 5x5 over every glyph.
pub fn arb_grid() -> impl Strategy<Value = Grid> {
    (1usize..6, 1usize..6).prop_flat_map(|(rows, cols)| {
        proptest::collection::vec(glyph(), rows * cols).prop_map(move |glyphs| {
            Grid::parse(&grid_text(rows, cols, &glyphs)).expect("generated grid is rectangular")
        })
    })
}

/// Random grids that contain at least one `C` marker.
pub fn arb_grid_with_marker() -> impl Strategy<Value = Grid> {
    (arb_grid(), any::<prop::sample::Index>()).prop_map(|(grid, index)| {
        let mut glyphs: Vec<char> = grid.to_string().chars().filter(|c| *c != '\n').collect();
        let at = index.index(glyphs.len());
        glyphs[at] = 'C';
        Grid::parse(&grid_text(grid.rows, grid.cols, &glyphs)).expect("generated grid is rectangular")
    })
}

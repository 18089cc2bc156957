use std::fmt;

use crate::infra::{Direction, Position, WumpusError, WumpusResult};

/// Terrain or marker of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Meadow,
    Swamp,
    Goal,
    CurrentMarkerC,
    CurrentMarkerB,
}

impl CellKind {
    pub fn from_glyph(glyph: char) -> Option<CellKind> {
        match glyph {
            'M' => Some(CellKind::Meadow),
            'S' => Some(CellKind::Swamp),
            'W' => Some(CellKind::Goal),
            'C' => Some(CellKind::CurrentMarkerC),
            'B' => Some(CellKind::CurrentMarkerB),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            CellKind::Meadow => 'M',
            CellKind::Swamp => 'S',
            CellKind::Goal => 'W',
            CellKind::CurrentMarkerC => 'C',
            CellKind::CurrentMarkerB => 'B',
        }
    }

    /// The agent cannot tell the two current-position markers apart by sight.
    pub fn is_ambiguous_marker(self) -> bool {
        matches!(self, CellKind::CurrentMarkerC | CellKind::CurrentMarkerB)
    }

    /// Parses a single-glyph observation such as `"C"`.
    pub fn parse_observation(text: &str) -> WumpusResult<CellKind> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(glyph), None) => {
                CellKind::from_glyph(glyph).ok_or_else(|| WumpusError::UnknownGlyph(text.to_string()))
            }
            _ => Err(WumpusError::UnknownGlyph(text.to_string())),
        }
    }
}

/// In-bounds neighbor of each cardinal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    pub north: Option<Position>,
    pub east: Option<Position>,
    pub south: Option<Position>,
    pub west: Option<Position>,
}

impl Neighbors {
    pub fn iter(&self) -> impl Iterator<Item = Option<Position>> {
        [self.north, self.east, self.south, self.west].into_iter()
    }
}

/// Immutable rectangular map of cell kinds, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    cells: Vec<CellKind>,
}

impl Grid {
    pub fn parse(text: &str) -> WumpusResult<Grid> {
        let text = text.strip_suffix('\n').unwrap_or(text);
        let mut cells = Vec::new();
        let mut cols = None;
        let mut rows = 0;

        for (row, line) in text.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let mut width = 0;
            for (col, glyph) in line.chars().enumerate() {
                let kind = CellKind::from_glyph(glyph).ok_or_else(|| {
                    WumpusError::MalformedMap(format!(
                        "unknown glyph {:?} at row {}, column {}",
                        glyph, row, col
                    ))
                })?;
                cells.push(kind);
                width += 1;
            }

            match cols {
                None => cols = Some(width),
                Some(expected) if expected != width => {
                    return Err(WumpusError::MalformedMap(format!(
                        "row {} has {} cells, expected {}",
                        row, width, expected
                    )));
                }
                Some(_) => {}
            }
            rows += 1;
        }

        let cols = cols.unwrap_or(0);
        if cols == 0 {
            return Err(WumpusError::MalformedMap("map is empty".to_string()));
        }

        Ok(Grid { rows, cols, cells })
    }

    /// Total bounds check; `None` is never in bounds.
    pub fn in_bounds(&self, pos: Option<Position>) -> bool {
        match pos {
            Some(pos) => {
                pos.row >= 0
                    && (pos.row as usize) < self.rows
                    && pos.col >= 0
                    && (pos.col as usize) < self.cols
            }
            None => false,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.in_bounds(Some(pos))
    }

    /// Bounds-safe lookup.
    pub fn get(&self, pos: Position) -> Option<CellKind> {
        if self.contains(pos) {
            Some(self.cells[pos.row as usize * self.cols + pos.col as usize])
        } else {
            None
        }
    }

    pub fn kind_at(&self, pos: Position) -> WumpusResult<CellKind> {
        self.get(pos).ok_or(WumpusError::OutOfBounds {
            position: pos,
            rows: self.rows,
            cols: self.cols,
        })
    }

    pub fn is_kind(&self, pos: Position, kind: CellKind) -> bool {
        self.get(pos) == Some(kind)
    }

    pub fn neighbors(&self, pos: Position) -> Neighbors {
        let resolve = |direction: Direction| Some(pos.step(direction)).filter(|p| self.contains(*p));
        Neighbors {
            north: resolve(Direction::North),
            east: resolve(Direction::East),
            south: resolve(Direction::South),
            west: resolve(Direction::West),
        }
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols).map(move |col| Position::new(row as i32, col as i32))
        })
    }

    pub fn positions_where<F>(&self, mut predicate: F) -> Vec<Position>
    where
        F: FnMut(CellKind) -> bool,
    {
        self.positions()
            .filter(|pos| self.get(*pos).is_some_and(&mut predicate))
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, line) in self.cells.chunks(self.cols).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for kind in line {
                write!(f, "{}", kind.glyph())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rectangular_map() {
        let grid = Grid::parse("MSW\nCBM").unwrap();
        assert_eq!(grid.rows, 2);
        assert_eq!(grid.cols, 3);
        assert_eq!(grid.kind_at(Position::new(0, 1)), Ok(CellKind::Swamp));
        assert_eq!(grid.kind_at(Position::new(0, 2)), Ok(CellKind::Goal));
        assert_eq!(grid.kind_at(Position::new(1, 0)), Ok(CellKind::CurrentMarkerC));
        assert_eq!(grid.kind_at(Position::new(1, 1)), Ok(CellKind::CurrentMarkerB));
    }

    #[test]
    fn test_parse_tolerates_trailing_newline_and_crlf() {
        let grid = Grid::parse("MM\r\nSW\r\n").unwrap();
        assert_eq!((grid.rows, grid.cols), (2, 2));
        assert_eq!(grid.to_string(), "MM\nSW");
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        let err = Grid::parse("MMM\nMM").unwrap_err();
        assert!(matches!(err, WumpusError::MalformedMap(_)));
    }

    #[test]
    fn test_parse_rejects_unknown_glyph() {
        let err = Grid::parse("MMM\nMXM").unwrap_err();
        match err {
            WumpusError::MalformedMap(message) => assert!(message.contains("'X'")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_empty_map() {
        assert!(matches!(Grid::parse(""), Err(WumpusError::MalformedMap(_))));
        assert!(matches!(Grid::parse("\n"), Err(WumpusError::MalformedMap(_))));
    }

    #[test]
    fn test_in_bounds_uses_rows_and_columns_separately() {
        let grid = Grid::parse("MMMM\nMMMM").unwrap();
        assert!(grid.in_bounds(Some(Position::new(1, 3))));
        assert!(!grid.in_bounds(Some(Position::new(2, 0))));
        assert!(!grid.in_bounds(Some(Position::new(0, 4))));
        assert!(!grid.in_bounds(Some(Position::new(-1, 0))));
        assert!(!grid.in_bounds(None));
    }

    #[test]
    fn test_kind_at_out_of_bounds() {
        let grid = Grid::parse("MM\nMM").unwrap();
        let err = grid.kind_at(Position::new(0, -1)).unwrap_err();
        assert_eq!(
            err,
            WumpusError::OutOfBounds {
                position: Position::new(0, -1),
                rows: 2,
                cols: 2
            }
        );
    }

    #[test]
    fn test_neighbors_at_corner() {
        let grid = Grid::parse("MMM\nMMM\nMMM").unwrap();
        let corner = grid.neighbors(Position::new(0, 0));
        assert_eq!(corner.north, None);
        assert_eq!(corner.west, None);
        assert_eq!(corner.east, Some(Position::new(0, 1)));
        assert_eq!(corner.south, Some(Position::new(1, 0)));

        let center = grid.neighbors(Position::new(1, 1));
        assert_eq!(center.iter().flatten().count(), 4);
    }

    #[test]
    fn test_positions_where_is_row_major() {
        let grid = Grid::parse("CMB\nMCM").unwrap();
        let markers = grid.positions_where(CellKind::is_ambiguous_marker);
        assert_eq!(
            markers,
            vec![Position::new(0, 0), Position::new(0, 2), Position::new(1, 1)]
        );
    }

    #[test]
    fn test_parse_observation() {
        assert_eq!(CellKind::parse_observation("B"), Ok(CellKind::CurrentMarkerB));
        assert!(CellKind::parse_observation("").is_err());
        assert!(CellKind::parse_observation("CB").is_err());
        assert!(CellKind::parse_observation("Z").is_err());
    }
}

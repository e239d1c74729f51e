/// Grid: the authoritative width×height tile matrix.
///
/// Stored row-major (`cells[y][x]`). Out-of-bounds queries return `None`
/// rather than faulting, so a stale or bad proposal degrades to a blocked
/// move instead of a panic.

use std::fmt;

use crate::domain::direction::{Direction, SCAN_ORDER};
use crate::domain::tile::Tile;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    cells: Vec<Vec<Tile>>,
}

impl Grid {
    #[cfg(test)]
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Grid { width, height, cells: vec![vec![tile; width]; height] }
    }

    /// Build from rows. All rows must share the first row's width.
    pub fn from_rows(cells: Vec<Vec<Tile>>) -> Self {
        let height = cells.len();
        let width = cells.first().map_or(0, |r| r.len());
        Grid { width, height, cells }
    }

    #[inline]
    pub fn tile(&self, x: usize, y: usize) -> Option<Tile> {
        self.cells.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Write a cell. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, tile: Tile) {
        if let Some(cell) = self.cells.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = tile;
        }
    }

    /// Coordinates one step from (x, y), if still on the grid.
    pub fn neighbor(&self, x: usize, y: usize, dir: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = dir.offset();
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        if nx < 0 || ny < 0 || nx >= self.width as i64 || ny >= self.height as i64 {
            return None;
        }
        Some((nx as usize, ny as usize))
    }

    /// Directions out of (x, y) whose destination is not a wall,
    /// reported in `SCAN_ORDER` (Up, Right, Down, Left).
    pub fn passable_directions(&self, x: usize, y: usize) -> Vec<Direction> {
        SCAN_ORDER
            .iter()
            .copied()
            .filter(|&d| {
                self.neighbor(x, y, d)
                    .and_then(|(nx, ny)| self.tile(nx, ny))
                    .map_or(false, Tile::is_passable)
            })
            .collect()
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.cells.iter().flatten().filter(|&&t| t == tile).count()
    }

    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.cells
    }
}

/// One line per row, in maze file glyphs.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row.iter().map(|t| t.glyph()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&str]) -> Grid {
        Grid::from_rows(
            rows.iter()
                .map(|r| r.chars().map(|c| Tile::from_glyph(c).unwrap_or(Tile::Floor)).collect())
                .collect(),
        )
    }

    #[test]
    fn passable_directions_follow_scan_order() {
        let g = grid_from(&[
            "#.#",
            ". .",
            "#.#",
        ]);
        assert_eq!(
            g.passable_directions(1, 1),
            vec![Direction::Up, Direction::Right, Direction::Down, Direction::Left],
        );
    }

    #[test]
    fn walls_and_edges_are_excluded() {
        let g = grid_from(&[
            "###",
            "#  ",
            "# #",
        ]);
        assert_eq!(g.passable_directions(1, 1), vec![Direction::Right, Direction::Down]);
        // (2,1) sits on the right edge: Right would leave the grid.
        assert_eq!(g.passable_directions(2, 1), vec![Direction::Left]);
    }

    #[test]
    fn out_of_bounds_is_none_and_writes_are_dropped() {
        let mut g = Grid::filled(2, 2, Tile::Floor);
        assert_eq!(g.tile(2, 0), None);
        assert_eq!(g.neighbor(0, 0, Direction::Left), None);
        let before = g.clone();
        g.set(5, 5, Tile::Wall);
        assert_eq!(g, before);
    }

    #[test]
    fn display_uses_maze_glyphs() {
        let g = grid_from(&["#P.", "G *"]);
        assert_eq!(g.to_string(), "#P.\nG *\n");
    }

    #[test]
    fn count_tiles() {
        let g = grid_from(&["..*", "P G"]);
        assert_eq!(g.count(Tile::Bean), 2);
        assert_eq!(g.count(Tile::Heart), 1);
        assert_eq!(g.count(Tile::Player), 1);
        assert_eq!(g.count(Tile::Ghost), 1);
    }
}

/// The tile grid: a fixed-size, row-major field of `Tile`s.
///
/// Coordinates are signed so callers can probe neighbours without
/// bounds-checking first. Reads outside the field report `Tile::Empty`,
/// writes outside it are dropped.
///
/// ## Starting layout
/// ```text
///   row 0-1   open surface (Empty)
///   row 2     Tunnel in columns 5..=14, Dirt elsewhere
///   row 5     a single Rock at column 10
///   rest      Dirt
/// ```

use super::tile::Tile;

pub const GRID_WIDTH: usize = 20;
pub const GRID_HEIGHT: usize = 15;

const SURFACE_ROWS: i32 = 2;
const TUNNEL_ROW: i32 = 2;
const TUNNEL_COLS: std::ops::RangeInclusive<i32> = 5..=14;
const ROCK_CELL: (i32, i32) = (5, 10); // (row, col)

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    tiles: [[Tile; GRID_WIDTH]; GRID_HEIGHT],
}

impl Grid {
    /// A grid populated with the starting layout.
    pub fn new() -> Self {
        let mut grid = Grid { tiles: [[Tile::Empty; GRID_WIDTH]; GRID_HEIGHT] };
        grid.init();
        grid
    }

    /// Reset every cell to the starting layout.
    pub fn init(&mut self) {
        for row in 0..GRID_HEIGHT as i32 {
            for col in 0..GRID_WIDTH as i32 {
                self.tiles[row as usize][col as usize] = starting_tile(row, col);
            }
        }
    }

    #[inline]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < GRID_HEIGHT && (col as usize) < GRID_WIDTH
    }

    /// Tile at (row, col), or `Tile::Empty` outside the grid.
    #[inline]
    pub fn get(&self, row: i32, col: i32) -> Tile {
        if self.in_bounds(row, col) {
            self.tiles[row as usize][col as usize]
        } else {
            Tile::Empty
        }
    }

    /// Write a tile. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, row: i32, col: i32, tile: Tile) {
        if self.in_bounds(row, col) {
            self.tiles[row as usize][col as usize] = tile;
        }
    }

    /// Row slices, top to bottom (for rendering).
    pub fn rows(&self) -> impl Iterator<Item = &[Tile; GRID_WIDTH]> {
        self.tiles.iter()
    }

    /// Number of cells holding `tile`.
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().flatten().filter(|&&t| t == tile).count()
    }

    /// Build a grid from a string diagram. Rows shorter than the grid are
    /// padded with Dirt, missing rows are Dirt.
    /// Legend:  ' '=Empty  '#'=Dirt  '.'=Tunnel  'O'=Rock
    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut grid = Grid { tiles: [[Tile::Dirt; GRID_WIDTH]; GRID_HEIGHT] };
        for (r, line) in rows.iter().enumerate().take(GRID_HEIGHT) {
            for (c, ch) in line.chars().enumerate().take(GRID_WIDTH) {
                grid.tiles[r][c] = match ch {
                    ' ' => Tile::Empty,
                    '.' => Tile::Tunnel,
                    'O' => Tile::Rock,
                    _ => Tile::Dirt,
                };
            }
        }
        grid
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new()
    }
}

fn starting_tile(row: i32, col: i32) -> Tile {
    if row < SURFACE_ROWS {
        Tile::Empty
    } else if row == TUNNEL_ROW {
        if TUNNEL_COLS.contains(&col) { Tile::Tunnel } else { Tile::Dirt }
    } else if (row, col) == ROCK_CELL {
        Tile::Rock
    } else {
        Tile::Dirt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_layout() {
        let g = Grid::new();
        for col in 0..GRID_WIDTH as i32 {
            assert_eq!(g.get(0, col), Tile::Empty);
            assert_eq!(g.get(1, col), Tile::Empty);
        }
        assert_eq!(g.get(2, 4), Tile::Dirt);
        assert_eq!(g.get(2, 5), Tile::Tunnel);
        assert_eq!(g.get(2, 14), Tile::Tunnel);
        assert_eq!(g.get(2, 15), Tile::Dirt);
        assert_eq!(g.get(5, 10), Tile::Rock);
        assert_eq!(g.get(3, 10), Tile::Dirt);
        assert_eq!(g.get(14, 19), Tile::Dirt);

        assert_eq!(g.count(Tile::Rock), 1);
        assert_eq!(g.count(Tile::Tunnel), 10);
        assert_eq!(g.count(Tile::Empty), 2 * GRID_WIDTH);
        assert_eq!(
            g.count(Tile::Dirt),
            GRID_WIDTH * GRID_HEIGHT - 2 * GRID_WIDTH - 10 - 1,
        );
    }

    #[test]
    fn init_restores_layout() {
        let mut g = Grid::new();
        g.set(7, 7, Tile::Tunnel);
        g.set(0, 0, Tile::Rock);
        g.init();
        assert_eq!(g, Grid::new());
    }

    #[test]
    fn out_of_bounds_reads_are_empty() {
        let g = Grid::new();
        let probes = [
            (-1, 0), (0, -1), (-1, -1),
            (GRID_HEIGHT as i32, 0), (0, GRID_WIDTH as i32),
            (i32::MAX, i32::MAX), (i32::MIN, 3),
        ];
        for (row, col) in probes {
            assert!(!g.in_bounds(row, col));
            assert_eq!(g.get(row, col), Tile::Empty, "({row}, {col})");
        }
    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut g = Grid::new();
        let before = g.clone();
        g.set(-1, 5, Tile::Rock);
        g.set(5, -1, Tile::Rock);
        g.set(GRID_HEIGHT as i32, 5, Tile::Rock);
        g.set(5, GRID_WIDTH as i32, Tile::Rock);
        assert_eq!(g, before);
    }

    #[test]
    fn in_bounds_write() {
        let mut g = Grid::new();
        g.set(14, 19, Tile::Tunnel);
        assert_eq!(g.get(14, 19), Tile::Tunnel);
        g.set(0, 0, Tile::Dirt);
        assert_eq!(g.get(0, 0), Tile::Dirt);
    }

    #[test]
    fn diagram_helper() {
        let g = Grid::from_rows(&[
            "  .O#",
        ]);
        assert_eq!(g.get(0, 0), Tile::Empty);
        assert_eq!(g.get(0, 2), Tile::Tunnel);
        assert_eq!(g.get(0, 3), Tile::Rock);
        assert_eq!(g.get(0, 4), Tile::Dirt);
        assert_eq!(g.get(0, 10), Tile::Dirt); // padding
        assert_eq!(g.get(9, 9), Tile::Dirt);
    }
}

//! Occupancy grid built from static world geometry.
//!
//! The world is divided into square cells. A cell is blocked when any
//! obstacle rectangle touches it; carve-out rectangles (seat openings in
//! front of tables) are freed afterwards. The grid never changes after
//! construction and is shared read-only by every path query.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Integer grid coordinate. May lie outside the grid when produced by
/// neighbour arithmetic; such cells always report blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn manhattan(&self, other: &Cell) -> u32 {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }

    /// The four orthogonal neighbours (right, left, down, up).
    pub fn neighbors4(&self) -> [Cell; 4] {
        [
            Cell::new(self.col + 1, self.row),
            Cell::new(self.col - 1, self.row),
            Cell::new(self.col, self.row + 1),
            Cell::new(self.col, self.row - 1),
        ]
    }
}

/// Immutable blocked/free map over the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyGrid {
    cell_size: u32,
    cols: usize,
    rows: usize,
    blocked: Vec<bool>,
}

impl OccupancyGrid {
    /// Rasterize obstacles over a `width`×`height` world.
    ///
    /// Every cell in `floor(x/cell) ..= floor((x+w)/cell)` on each axis is
    /// marked, clipped to the grid; `openings` are then cleared the same way.
    /// A fractional `cell_size` is rounded to the nearest whole unit before
    /// the grid is sized.
    pub fn build(width: f32, height: f32, cell_size: f32, obstacles: &[Rect], openings: &[Rect]) -> Self {
        let cell = cell_size.round().max(1.0) as u32;
        let size = cell as f32;
        let cols = (width / size).ceil().max(1.0) as usize;
        let rows = (height / size).ceil().max(1.0) as usize;
        let mut grid = Self {
            cell_size: cell,
            cols,
            rows,
            blocked: vec![false; cols * rows],
        };
        for rect in obstacles {
            grid.fill_rect(rect, true);
        }
        for rect in openings {
            grid.fill_rect(rect, false);
        }
        grid
    }

    /// Grid from an explicit row-major blocked mask.
    /// Returns `None` when the mask length does not match `cols * rows`.
    pub fn from_mask(cols: usize, rows: usize, cell_size: u32, blocked: Vec<bool>) -> Option<Self> {
        if cols == 0 || rows == 0 || blocked.len() != cols * rows {
            return None;
        }
        Some(Self {
            cell_size: cell_size.max(1),
            cols,
            rows,
            blocked,
        })
    }

    /// Parse a text map where `#` is blocked and anything else is free.
    /// Rows shorter than the first are padded as free.
    pub fn from_ascii(cell_size: u32, lines: &[&str]) -> Option<Self> {
        let cols = lines.first()?.chars().count();
        let rows = lines.len();
        let mut blocked = vec![false; cols * rows];
        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().take(cols).enumerate() {
                blocked[row * cols + col] = ch == '#';
            }
        }
        Self::from_mask(cols, rows, cell_size, blocked)
    }

    fn fill_rect(&mut self, rect: &Rect, value: bool) {
        let cell = self.cell_size as f32;
        let max_col = self.cols as i64 - 1;
        let max_row = self.rows as i64 - 1;
        let c0 = ((rect.x / cell).floor() as i64).max(0);
        let r0 = ((rect.y / cell).floor() as i64).max(0);
        let c1 = ((rect.right() / cell).floor() as i64).min(max_col);
        let r1 = ((rect.bottom() / cell).floor() as i64).min(max_row);
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.blocked[row as usize * self.cols + col as usize] = value;
            }
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    /// Row-major index of an in-bounds cell.
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if cell.col < 0 || cell.row < 0 {
            return None;
        }
        let (col, row) = (cell.col as usize, cell.row as usize);
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(row * self.cols + col)
    }

    pub fn cell_at(&self, index: usize) -> Cell {
        Cell::new((index % self.cols) as i32, (index / self.cols) as i32)
    }

    /// Blocked test; anything outside the grid is blocked.
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.index(cell).map_or(true, |i| self.blocked[i])
    }

    pub fn is_free(&self, cell: Cell) -> bool {
        !self.is_blocked(cell)
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.iter().filter(|b| **b).count()
    }

    /// Cell containing a world point, clamped into the grid.
    pub fn world_to_cell(&self, p: Point) -> Cell {
        let cell = self.cell_size as f32;
        let col = ((p.x / cell).floor() as i64).clamp(0, self.cols as i64 - 1);
        let row = ((p.y / cell).floor() as i64).clamp(0, self.rows as i64 - 1);
        Cell::new(col as i32, row as i32)
    }

    /// World position of a cell's centre.
    pub fn cell_center(&self, cell: Cell) -> Point {
        let size = self.cell_size as f32;
        Point::new(
            cell.col as f32 * size + size / 2.0,
            cell.row as f32 * size + size / 2.0,
        )
    }

    /// Free orthogonal neighbours of a cell.
    pub fn free_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        cell.neighbors4().into_iter().filter(move |n| self.is_free(*n))
    }

    /// Render as text (`#` blocked, `.` free), one line per row.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                out.push(if self.blocked[row * self.cols + col] { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_round_up() {
        let grid = OccupancyGrid::build(100.0, 33.0, 16.0, &[], &[]);
        assert_eq!(grid.cols(), 7);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.blocked_count(), 0);
    }

    #[test]
    fn test_partial_overlap_blocks_cell() {
        // 4-unit sliver inside cell (1, 1)
        let grid = OccupancyGrid::build(64.0, 64.0, 16.0, &[Rect::new(18.0, 20.0, 4.0, 4.0)], &[]);
        assert!(grid.is_blocked(Cell::new(1, 1)));
        assert_eq!(grid.blocked_count(), 1);
    }

    #[test]
    fn test_right_edge_on_boundary_is_inclusive() {
        // x + w lands exactly on the col 1 boundary, so col 1 is touched
        let grid = OccupancyGrid::build(64.0, 16.0, 16.0, &[Rect::new(0.0, 0.0, 16.0, 8.0)], &[]);
        assert!(grid.is_blocked(Cell::new(0, 0)));
        assert!(grid.is_blocked(Cell::new(1, 0)));
        assert!(grid.is_free(Cell::new(2, 0)));
    }

    #[test]
    fn test_rects_outside_are_clipped() {
        let grid = OccupancyGrid::build(
            64.0,
            64.0,
            16.0,
            &[Rect::new(-40.0, -40.0, 30.0, 30.0), Rect::new(200.0, 0.0, 10.0, 10.0)],
            &[],
        );
        assert_eq!(grid.blocked_count(), 0);
        let grid = OccupancyGrid::build(64.0, 64.0, 16.0, &[Rect::new(-40.0, 0.0, 50.0, 4.0)], &[]);
        assert!(grid.is_blocked(Cell::new(0, 0)));
        assert_eq!(grid.blocked_count(), 1);
    }

    #[test]
    fn test_opening_clears_after_obstacles() {
        let grid = OccupancyGrid::build(
            64.0,
            64.0,
            16.0,
            &[Rect::new(0.0, 0.0, 63.0, 63.0)],
            &[Rect::new(20.0, 20.0, 4.0, 4.0)],
        );
        assert!(grid.is_free(Cell::new(1, 1)));
        assert_eq!(grid.blocked_count(), 15);
    }

    #[test]
    fn test_out_of_bounds_is_blocked() {
        let grid = OccupancyGrid::build(32.0, 32.0, 16.0, &[], &[]);
        assert!(grid.is_blocked(Cell::new(-1, 0)));
        assert!(grid.is_blocked(Cell::new(0, 2)));
        assert!(grid.is_free(Cell::new(1, 1)));
    }

    #[test]
    fn test_world_to_cell_clamps() {
        let grid = OccupancyGrid::build(64.0, 64.0, 16.0, &[], &[]);
        assert_eq!(grid.world_to_cell(Point::new(-5.0, 500.0)), Cell::new(0, 3));
        assert_eq!(grid.world_to_cell(Point::new(17.0, 31.9)), Cell::new(1, 1));
        assert_eq!(grid.cell_center(Cell::new(1, 2)), Point::new(24.0, 40.0));
    }

    #[test]
    fn test_build_is_deterministic() {
        let obstacles = [Rect::new(5.0, 5.0, 30.0, 12.0), Rect::new(40.0, 40.0, 8.0, 20.0)];
        let a = OccupancyGrid::build(96.0, 96.0, 16.0, &obstacles, &[]);
        let b = OccupancyGrid::build(96.0, 96.0, 16.0, &obstacles, &[]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_ascii_roundtrip() {
        let grid = OccupancyGrid::from_ascii(16, &["..#", "#..", "..."]).unwrap();
        assert_eq!(grid.to_ascii(), "..#\n#..\n...\n");
        assert_eq!(grid.free_neighbors(Cell::new(1, 0)).count(), 2);
    }

    #[test]
    fn test_fractional_cell_size_still_covers_world() {
        // 16.5 rounds to 17: 960/17 -> 57 cols, 640/17 -> 38 rows
        let walls = [Rect::new(950.0, 0.0, 10.0, 640.0), Rect::new(0.0, 630.0, 960.0, 10.0)];
        let grid = OccupancyGrid::build(960.0, 640.0, 16.5, &walls, &[]);
        assert_eq!(grid.cell_size(), 17);
        assert_eq!((grid.cols(), grid.rows()), (57, 38));
        assert!(grid.is_blocked(grid.world_to_cell(Point::new(956.0, 300.0))));
        assert!(grid.is_blocked(grid.world_to_cell(Point::new(300.0, 636.0))));
        assert!(grid.is_free(grid.world_to_cell(Point::new(300.0, 300.0))));
    }

    #[test]
    fn test_mask_length_mismatch() {
        assert!(OccupancyGrid::from_mask(3, 3, 16, vec![false; 8]).is_none());
    }
}

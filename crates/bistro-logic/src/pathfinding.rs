//! Grid pathfinding for customers walking from the door to their seat.
//!
//! A* over the 4-connected free cells of an [`OccupancyGrid`] with unit
//! step cost and a Manhattan heuristic, driven by the `pathfinding` crate.
//! Ties between equal-cost routes are broken arbitrarily.

use ::pathfinding::prelude::astar;

use crate::geometry::Point;
use crate::grid::{Cell, OccupancyGrid};

/// Find a walkable route from `start` to `goal` (world coordinates).
///
/// Returns the cell-centre waypoints from the first step after the start
/// cell through the goal cell inclusive; an empty list when both points
/// fall in the same cell. Returns `None` if the goal cell is blocked or
/// not connected to the start. The start cell itself may be blocked: the
/// walker is already standing there.
pub fn find_path(grid: &OccupancyGrid, start: Point, goal: Point) -> Option<Vec<Point>> {
    let start_cell = grid.world_to_cell(start);
    let goal_cell = grid.world_to_cell(goal);
    let cells = find_cell_path(grid, start_cell, goal_cell)?;
    Some(cells.into_iter().map(|c| grid.cell_center(c)).collect())
}

/// Cell-level A*. Same contract as [`find_path`], in grid coordinates.
pub fn find_cell_path(grid: &OccupancyGrid, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
    if grid.is_blocked(goal) {
        return None;
    }
    grid.index(start)?;
    if start == goal {
        return Some(vec![]);
    }

    let (path, _cost) = astar(
        &start,
        |cell| grid.free_neighbors(*cell).map(|n| (n, 1u32)),
        |cell| cell.manhattan(&goal),
        |cell| *cell == goal,
    )?;
    // astar includes the start cell
    Some(path.into_iter().skip(1).collect())
}

/// Total walking distance of a waypoint list starting from `from`.
pub fn path_length(from: Point, path: &[Point]) -> f32 {
    let mut prev = from;
    let mut total = 0.0;
    for p in path {
        total += prev.distance(p);
        prev = *p;
    }
    total
}

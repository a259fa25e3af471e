//! Integration tests for the navigation pipeline.
//!
//! Exercises: RestaurantLayout → OccupancyGrid → find_path → Motion
//!
//! A* results are checked against a plain BFS oracle on random small grids.

use std::collections::VecDeque;

use bistro_logic::grid::{Cell, OccupancyGrid};
use bistro_logic::layout::RestaurantLayout;
use bistro_logic::motion::Motion;
use bistro_logic::pathfinding::{find_cell_path, find_path};
use proptest::prelude::*;

// ── Helpers ────────────────────────────────────────────────────────────

/// Shortest 4-connected distance by breadth-first search.
fn bfs_distance(grid: &OccupancyGrid, start: Cell, goal: Cell) -> Option<usize> {
    if grid.is_blocked(goal) {
        return None;
    }
    let mut dist = vec![usize::MAX; grid.len()];
    let start_idx = grid.index(start)?;
    dist[start_idx] = 0;
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        let d = dist[grid.index(cell)?];
        if cell == goal {
            return Some(d);
        }
        for next in grid.free_neighbors(cell) {
            let Some(i) = grid.index(next) else { continue };
            if dist[i] == usize::MAX {
                dist[i] = d + 1;
                queue.push_back(next);
            }
        }
    }
    None
}

fn grid_strategy() -> impl Strategy<Value = OccupancyGrid> {
    (2usize..12, 2usize..12).prop_flat_map(|(cols, rows)| {
        proptest::collection::vec(proptest::bool::weighted(0.3), cols * rows)
            .prop_map(move |mask| OccupancyGrid::from_mask(cols, rows, 16, mask).unwrap())
    })
}

fn assert_valid_walk(grid: &OccupancyGrid, start: Cell, path: &[Cell]) {
    let mut prev = start;
    for cell in path {
        assert_eq!(prev.manhattan(cell), 1, "non-adjacent step {:?} -> {:?}", prev, cell);
        assert!(grid.is_free(*cell), "stepped onto blocked {:?}", cell);
        prev = *cell;
    }
}

// ── Oracle properties ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn astar_matches_bfs(
        grid in grid_strategy(),
        s in (0usize..144, 0usize..144),
        g in (0usize..144, 0usize..144),
    ) {
        let start = grid.cell_at((s.0 * grid.cols() + s.1) % grid.len());
        let goal = grid.cell_at((g.0 * grid.cols() + g.1) % grid.len());
        let expected = bfs_distance(&grid, start, goal);
        let found = find_cell_path(&grid, start, goal);
        match (expected, found) {
            (None, None) => {}
            (Some(d), Some(path)) => {
                prop_assert_eq!(path.len(), d);
                assert_valid_walk(&grid, start, &path);
                if d > 0 {
                    prop_assert_eq!(path.last().copied(), Some(goal));
                }
            }
            (e, f) => prop_assert!(false, "bfs {:?} vs astar {:?}", e, f),
        }
    }

    #[test]
    fn blocked_goal_is_none(grid in grid_strategy(), s in 0usize..144, g in 0usize..144) {
        let start = grid.cell_at(s % grid.len());
        let goal = grid.cell_at(g % grid.len());
        if grid.is_blocked(goal) {
            prop_assert_eq!(find_cell_path(&grid, start, goal), None);
        }
    }
}

// ── Restaurant routes ──────────────────────────────────────────────────

#[test]
fn every_seat_reachable_from_door() {
    let layout = RestaurantLayout::default();
    let grid = layout.build_grid(16.0);
    for i in 0..layout.table_count() {
        let seat = layout.seat(i).unwrap();
        let path = find_path(&grid, layout.spawn, seat)
            .unwrap_or_else(|| panic!("no route to seat {}", i));
        assert!(!path.is_empty());
        let end = *path.last().unwrap();
        assert_eq!(grid.world_to_cell(end), grid.world_to_cell(seat));
        let cells: Vec<Cell> = path.iter().map(|p| grid.world_to_cell(*p)).collect();
        assert_valid_walk(&grid, grid.world_to_cell(layout.spawn), &cells);
        let expected = bfs_distance(&grid, grid.world_to_cell(layout.spawn), grid.world_to_cell(seat));
        assert_eq!(Some(cells.len()), expected);
    }
}

#[test]
fn table_centre_is_unreachable() {
    let layout = RestaurantLayout::default();
    let grid = layout.build_grid(16.0);
    assert_eq!(find_path(&grid, layout.spawn, layout.tables[0]), None);
}

#[test]
fn walking_to_seat_ends_on_seat_cell() {
    let layout = RestaurantLayout::default();
    let grid = layout.build_grid(16.0);
    let seat = layout.seat(3).unwrap();
    let path = find_path(&grid, layout.spawn, seat).unwrap();
    let mut motion = Motion::new(layout.spawn, &path, 80.0);
    let mut arrivals = 0;
    let mut frames = 0;
    while !motion.is_finished() && frames < 10_000 {
        if motion.advance(16.0).arrived {
            arrivals += 1;
        }
        frames += 1;
    }
    assert_eq!(arrivals, 1);
    assert_eq!(motion.position(), *path.last().unwrap());
    assert_eq!(grid.world_to_cell(motion.position()), grid.world_to_cell(seat));
    // every step after the first is one 16-unit cell, 200 ms at 80 u/s
    for seg in &motion.segments()[1..] {
        assert!((seg.duration_ms - 200.0).abs() < 0.01);
    }
}

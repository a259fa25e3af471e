//! Restaurant floor plan.
//!
//! Dining room on top, kitchen below a dividing wall, one door in the top
//! wall where customers enter. The layout is the world geometry source for
//! both the navigation grid and player collision. Table positions are
//! authored for a 960×640 world and scale with the world size.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::grid::OccupancyGrid;

const WALL_THICKNESS: f32 = 8.0;
const TOP_DOOR_WIDTH: f32 = 50.0;
const TOP_DOOR_THICKNESS: f32 = 12.0;
const DIVIDER_RATIO: f32 = 0.65;
const DIVIDER_DOOR_WIDTH: f32 = 100.0;

const TABLE_SPOTS: [(f32, f32); 5] = [
    (300.0, 150.0),
    (500.0, 200.0),
    (700.0, 140.0),
    (350.0, 350.0),
    (600.0, 360.0),
];
const REFERENCE_SIZE: (f32, f32) = (960.0, 640.0);

/// Customers sit this far above the table centre.
const SEAT_OFFSET: f32 = 30.0;
/// Navigation footprint of a table (wider than the sprite for chairs).
const TABLE_FOOTPRINT: (f32, f32) = (90.0, 40.0);
const TABLE_PAD: f32 = 12.0;
/// Appliance sprite size and navigation padding.
const APPLIANCE_SIZE: f32 = 32.0;
const APPLIANCE_PAD: f32 = 8.0;
/// Appliances sit this far above the bottom wall; fridge/trash flank the oven.
const APPLIANCE_INSET: f32 = 80.0;
const APPLIANCE_SPACING: f32 = 100.0;

/// Spawn point sits this far below the top edge, inside the door gap.
const SPAWN_Y: f32 = 16.0;

/// Static geometry of one restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantLayout {
    pub width: f32,
    pub height: f32,
    pub tables: Vec<Point>,
    pub oven: Point,
    pub fridge: Point,
    pub trash: Point,
    /// Swinging door filling the top wall gap while closed.
    pub top_door: Rect,
    pub door_zone: Rect,
    pub fridge_zone: Rect,
    pub trash_zone: Rect,
    pub kitchen_zone: Rect,
    pub spawn: Point,
    pub player_start: Point,
    pub divider_y: f32,
}

impl RestaurantLayout {
    pub fn new(width: f32, height: f32) -> Self {
        let sx = width / REFERENCE_SIZE.0;
        let sy = height / REFERENCE_SIZE.1;
        let tables: Vec<Point> = TABLE_SPOTS
            .iter()
            .map(|&(x, y)| Point::new(x * sx, y * sy))
            .collect();

        let center_x = tables.iter().map(|p| p.x).sum::<f32>() / tables.len() as f32;
        let appliance_y = height - APPLIANCE_INSET;
        let zone_y = height - 140.0;

        let door_x = width / 2.0 - TOP_DOOR_WIDTH / 2.0;

        Self {
            width,
            height,
            oven: Point::new(center_x, appliance_y),
            fridge: Point::new(center_x - APPLIANCE_SPACING, appliance_y),
            trash: Point::new(center_x + APPLIANCE_SPACING, appliance_y),
            top_door: Rect::new(door_x, 0.0, TOP_DOOR_WIDTH, TOP_DOOR_THICKNESS),
            door_zone: Rect::new(door_x, 20.0, TOP_DOOR_WIDTH, 36.0),
            kitchen_zone: Rect::new(center_x - 80.0, zone_y, 160.0, 80.0),
            fridge_zone: Rect::new(center_x - 150.0, zone_y, 120.0, 80.0),
            trash_zone: Rect::new(center_x + 50.0, zone_y, 120.0, 80.0),
            spawn: Point::new(door_x + TOP_DOOR_WIDTH / 2.0, SPAWN_Y),
            player_start: Point::new(120.0 * sx, height / 2.0),
            divider_y: height * DIVIDER_RATIO,
            tables,
        }
    }

    /// Where the customer of table `index` sits.
    pub fn seat(&self, index: usize) -> Option<Point> {
        self.tables
            .get(index)
            .map(|t| Point::new(t.x, t.y - SEAT_OFFSET))
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Solid walls: perimeter minus the top door gap, divider minus its gap.
    pub fn walls(&self) -> Vec<Rect> {
        let (w, h, t) = (self.width, self.height, WALL_THICKNESS);
        let door = &self.top_door;
        let divider_left = w / 2.0 - DIVIDER_DOOR_WIDTH / 2.0;
        let divider_right = w / 2.0 + DIVIDER_DOOR_WIDTH / 2.0;
        vec![
            Rect::new(0.0, 0.0, door.x, t),
            Rect::new(door.right(), 0.0, w - door.right(), t),
            Rect::new(0.0, h - t, w, t),
            Rect::new(0.0, 0.0, t, h),
            Rect::new(w - t, 0.0, t, h),
            Rect::new(0.0, self.divider_y - t / 2.0, divider_left, t),
            Rect::new(divider_right, self.divider_y - t / 2.0, w - divider_right, t),
        ]
    }

    /// Everything customers must walk around.
    pub fn nav_obstacles(&self) -> Vec<Rect> {
        let mut rects = self.walls();
        for table in &self.tables {
            rects.push(Rect::centered(*table, TABLE_FOOTPRINT.0, TABLE_FOOTPRINT.1).padded(TABLE_PAD));
        }
        for appliance in [self.oven, self.fridge, self.trash] {
            rects.push(Rect::centered(appliance, APPLIANCE_SIZE, APPLIANCE_SIZE).padded(APPLIANCE_PAD));
        }
        rects
    }

    /// Seat openings carved out of the table footprints.
    pub fn nav_openings(&self) -> Vec<Rect> {
        self.tables
            .iter()
            .map(|t| Rect::new(t.x - 10.0, t.y - 40.0, 20.0, 20.0))
            .collect()
    }

    /// Navigation grid for this layout.
    pub fn build_grid(&self, cell_size: f32) -> OccupancyGrid {
        OccupancyGrid::build(
            self.width,
            self.height,
            cell_size,
            &self.nav_obstacles(),
            &self.nav_openings(),
        )
    }
}

impl Default for RestaurantLayout {
    fn default() -> Self {
        Self::new(REFERENCE_SIZE.0, REFERENCE_SIZE.1)
    }
}

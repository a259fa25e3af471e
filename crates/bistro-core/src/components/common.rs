//! Spatial components shared by every walker.

use bistro_logic::geometry::Point;
use bistro_logic::motion::Motion;
use serde::{Deserialize, Serialize};

/// World position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Point);

/// Sprite heading in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Facing(pub f32);

/// An active walk toward `goal`. Removed on arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Walking {
    pub motion: Motion,
    pub goal: Point,
}

impl Walking {
    pub fn new(from: Point, path: &[Point], speed: f32, goal: Point) -> Self {
        Self {
            motion: Motion::new(from, path, speed),
            goal,
        }
    }
}

//! Timed linear motion along a waypoint list.
//!
//! A [`Motion`] starts from the walker's current position (no teleport),
//! walks each segment at constant speed and turns to face the segment's
//! direction just before walking it. Completion is reported exactly once.

use serde::{Deserialize, Serialize};

use crate::constants::timing::MIN_SEGMENT_MS;
use crate::geometry::Point;

/// Facing (degrees) for a sprite walking from `from` to `to`.
/// Sprites are drawn facing down, so the raw heading is offset by +90°.
pub fn facing_degrees(from: Point, to: Point) -> f32 {
    let heading = (to.y - from.y).atan2(to.x - from.x).to_degrees();
    heading - 90.0 + 180.0
}

/// One straight leg of a walk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub duration_ms: f32,
    pub facing: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum Phase {
    Walking,
    Done,
}

/// Result of advancing a motion by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionUpdate {
    pub position: Point,
    pub facing: Option<f32>,
    /// True on exactly one update: the one that reached the last waypoint.
    pub arrived: bool,
}

/// An in-progress walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    segments: Vec<Segment>,
    current: usize,
    elapsed_ms: f32,
    position: Point,
    facing: Option<f32>,
    phase: Phase,
}

impl Motion {
    /// Plan a walk from `from` through every point of `path` at `speed`
    /// units per second. Each segment lasts at least `MIN_SEGMENT_MS`.
    pub fn new(from: Point, path: &[Point], speed: f32) -> Self {
        let speed = speed.max(f32::MIN_POSITIVE);
        let mut segments = Vec::with_capacity(path.len());
        let mut prev = from;
        for &to in path {
            let duration_ms = (prev.distance(&to) / speed * 1000.0).max(MIN_SEGMENT_MS);
            segments.push(Segment {
                from: prev,
                to,
                duration_ms,
                facing: facing_degrees(prev, to),
            });
            prev = to;
        }
        let facing = segments.first().map(|s| s.facing);
        Self {
            segments,
            current: 0,
            elapsed_ms: 0.0,
            position: from,
            facing,
            phase: Phase::Walking,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn facing(&self) -> Option<f32> {
        self.facing
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn total_duration_ms(&self) -> f32 {
        self.segments.iter().map(|s| s.duration_ms).sum()
    }

    /// Advance by `dt_ms`. An empty walk arrives on its first update.
    pub fn advance(&mut self, dt_ms: f32) -> MotionUpdate {
        if self.phase == Phase::Done {
            return MotionUpdate {
                position: self.position,
                facing: self.facing,
                arrived: false,
            };
        }

        let mut remaining = dt_ms.max(0.0);
        while let Some(seg) = self.segments.get(self.current) {
            let left = seg.duration_ms - self.elapsed_ms;
            if remaining >= left {
                remaining -= left;
                self.position = seg.to;
                self.current += 1;
                self.elapsed_ms = 0.0;
                if let Some(next) = self.segments.get(self.current) {
                    self.facing = Some(next.facing);
                }
            } else {
                self.elapsed_ms += remaining;
                self.position = seg.from.lerp(&seg.to, self.elapsed_ms / seg.duration_ms);
                break;
            }
        }

        let arrived = self.current >= self.segments.len();
        if arrived {
            self.phase = Phase::Done;
        }
        MotionUpdate {
            position: self.position,
            facing: self.facing,
            arrived,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path_arrives_immediately() {
        let mut motion = Motion::new(Point::new(5.0, 5.0), &[], 80.0);
        let update = motion.advance(0.0);
        assert!(update.arrived);
        assert_eq!(update.position, Point::new(5.0, 5.0));
        assert_eq!(update.facing, None);
        assert!(!motion.advance(16.0).arrived);
    }

    #[test]
    fn test_segment_durations_follow_speed() {
        let motion = Motion::new(
            Point::new(0.0, 0.0),
            &[Point::new(80.0, 0.0), Point::new(80.0, 40.0)],
            80.0,
        );
        let d: Vec<f32> = motion.segments().iter().map(|s| s.duration_ms).collect();
        assert!((d[0] - 1000.0).abs() < 0.01);
        assert!((d[1] - 500.0).abs() < 0.01);
    }

    #[test]
    fn test_minimum_segment_duration() {
        let motion = Motion::new(Point::new(0.0, 0.0), &[Point::new(0.0, 0.0)], 80.0);
        assert!((motion.total_duration_ms() - MIN_SEGMENT_MS).abs() < 0.01);
    }

    #[test]
    fn test_interpolates_mid_segment() {
        let mut motion = Motion::new(Point::new(0.0, 0.0), &[Point::new(80.0, 0.0)], 80.0);
        let update = motion.advance(250.0);
        assert!(!update.arrived);
        assert!((update.position.x - 20.0).abs() < 0.01);
    }

    #[test]
    fn test_facing_set_before_each_segment() {
        let mut motion = Motion::new(
            Point::new(0.0, 0.0),
            &[Point::new(16.0, 0.0), Point::new(16.0, 16.0)],
            80.0,
        );
        // walking right: heading 0° → 90°
        assert!((motion.facing().unwrap() - 90.0).abs() < 1e-3);
        // first segment takes 200 ms; 210 ms puts us on the downward leg
        let update = motion.advance(210.0);
        assert!((update.facing.unwrap() - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_arrives_exactly_once() {
        let mut motion = Motion::new(
            Point::new(0.0, 0.0),
            &[Point::new(8.0, 0.0), Point::new(16.0, 0.0)],
            80.0,
        );
        let mut arrivals = 0;
        for _ in 0..40 {
            if motion.advance(16.0).arrived {
                arrivals += 1;
            }
        }
        assert_eq!(arrivals, 1);
        assert!(motion.is_finished());
        assert_eq!(motion.position(), Point::new(16.0, 0.0));
    }

    #[test]
    fn test_large_step_crosses_segments() {
        let mut motion = Motion::new(
            Point::new(0.0, 0.0),
            &[Point::new(40.0, 0.0), Point::new(40.0, 40.0), Point::new(0.0, 40.0)],
            80.0,
        );
        let update = motion.advance(10_000.0);
        assert!(update.arrived);
        assert_eq!(update.position, Point::new(0.0, 40.0));
    }
}

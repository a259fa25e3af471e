//! Which thing an interact press applies to.
//!
//! Zones are checked in a fixed order and the first hit wins: door,
//! fridge, trash, kitchen, then the nearest table within reach. One press
//! triggers at most one action.

use crate::geometry::Point;
use crate::layout::RestaurantLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractTarget {
    Door,
    Fridge,
    Trash,
    Kitchen,
    Table(usize),
}

/// Resolve an interact press at `player`.
pub fn resolve_target(layout: &RestaurantLayout, player: Point, radius: f32) -> Option<InteractTarget> {
    if layout.door_zone.contains(player) {
        return Some(InteractTarget::Door);
    }
    if layout.fridge_zone.contains(player) {
        return Some(InteractTarget::Fridge);
    }
    if layout.trash_zone.contains(player) {
        return Some(InteractTarget::Trash);
    }
    if layout.kitchen_zone.contains(player) {
        return Some(InteractTarget::Kitchen);
    }
    nearest_table(&layout.tables, player, radius).map(InteractTarget::Table)
}

/// Index of the closest table within `radius`, if any.
pub fn nearest_table(tables: &[Point], player: Point, radius: f32) -> Option<usize> {
    let limit = radius * radius;
    tables
        .iter()
        .enumerate()
        .map(|(i, t)| (i, t.distance_squared(&player)))
        .filter(|(_, d)| *d <= limit)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fridge_beats_kitchen_overlap() {
        let layout = RestaurantLayout::default();
        // fridge zone (340..460) and kitchen zone (410..570) overlap at x=430
        let p = Point::new(430.0, 540.0);
        assert!(layout.kitchen_zone.contains(p));
        assert_eq!(resolve_target(&layout, p, 48.0), Some(InteractTarget::Fridge));
    }

    #[test]
    fn test_trash_beats_kitchen_overlap() {
        let layout = RestaurantLayout::default();
        let p = Point::new(550.0, 540.0);
        assert_eq!(resolve_target(&layout, p, 48.0), Some(InteractTarget::Trash));
    }

    #[test]
    fn test_kitchen_only() {
        let layout = RestaurantLayout::default();
        let p = Point::new(490.0, 540.0);
        assert_eq!(resolve_target(&layout, p, 48.0), Some(InteractTarget::Kitchen));
    }

    #[test]
    fn test_door_zone() {
        let layout = RestaurantLayout::default();
        assert_eq!(
            resolve_target(&layout, Point::new(480.0, 30.0), 48.0),
            Some(InteractTarget::Door)
        );
    }

    #[test]
    fn test_table_radius() {
        let layout = RestaurantLayout::default();
        assert_eq!(
            resolve_target(&layout, Point::new(300.0, 110.0), 48.0),
            Some(InteractTarget::Table(0))
        );
        assert_eq!(resolve_target(&layout, Point::new(300.0, 90.0), 48.0), None);
    }

    #[test]
    fn test_nearest_wins() {
        let tables = [Point::new(0.0, 0.0), Point::new(40.0, 0.0)];
        assert_eq!(nearest_table(&tables, Point::new(25.0, 0.0), 48.0), Some(1));
        assert_eq!(nearest_table(&tables, Point::new(15.0, 0.0), 48.0), Some(0));
    }
}

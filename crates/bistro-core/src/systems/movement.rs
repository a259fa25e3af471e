//! Customer movement - advances every active walk and seats arrivals

use hecs::{Entity, World};

use crate::components::{Customer, Facing, Position, Walking};

/// Advance customers with a [`Walking`] component by `delta_ms`.
///
/// Arrivals snap to their goal, become waiting and lose the `Walking`
/// component. Returns the tables whose customer sat down this frame.
pub fn customer_movement_system(world: &mut World, delta_ms: f32) -> Vec<usize> {
    let mut arrived: Vec<(Entity, usize)> = Vec::new();

    for (entity, (customer, pos, facing, walking)) in
        world.query_mut::<(&mut Customer, &mut Position, &mut Facing, &mut Walking)>()
    {
        let update = walking.motion.advance(delta_ms);
        pos.0 = update.position;
        if let Some(deg) = update.facing {
            facing.0 = deg;
        }
        if update.arrived {
            pos.0 = walking.goal;
            customer.waiting = true;
            arrived.push((entity, customer.table));
        }
    }

    for (entity, _) in &arrived {
        let _ = world.remove_one::<Walking>(*entity);
    }

    arrived.into_iter().map(|(_, table)| table).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_logic::geometry::Point;

    fn spawn_walker(world: &mut World, path: &[Point], goal: Point) -> Entity {
        let mut customer = Customer::new(0);
        customer.visible = true;
        world.spawn((
            customer,
            Position(Point::ZERO),
            Facing(0.0),
            Walking::new(Point::ZERO, path, 80.0, goal),
        ))
    }

    #[test]
    fn test_walker_arrives_once_and_sits() {
        let mut world = World::new();
        let goal = Point::new(16.0, 0.0);
        let e = spawn_walker(&mut world, &[goal], goal);

        assert!(customer_movement_system(&mut world, 100.0).is_empty());
        assert!(!world.get::<&Customer>(e).unwrap().waiting);

        assert_eq!(customer_movement_system(&mut world, 150.0), vec![0]);
        assert!(world.get::<&Customer>(e).unwrap().waiting);
        assert!(world.get::<&Walking>(e).is_err());
        assert_eq!(world.get::<&Position>(e).unwrap().0, goal);

        assert!(customer_movement_system(&mut world, 100.0).is_empty());
    }

    #[test]
    fn test_facing_follows_segment() {
        let mut world = World::new();
        let e = spawn_walker(
            &mut world,
            &[Point::new(0.0, 16.0)],
            Point::new(0.0, 16.0),
        );
        customer_movement_system(&mut world, 10.0);
        // heading straight down: atan2 = 90°, - 90 + 180 = 180°
        let facing = world.get::<&Facing>(e).unwrap().0;
        assert!((facing - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_seated_customers_untouched() {
        let mut world = World::new();
        let mut customer = Customer::new(1);
        customer.visible = true;
        customer.waiting = true;
        let e = world.spawn((customer, Position(Point::new(5.0, 5.0)), Facing(0.0)));
        assert!(customer_movement_system(&mut world, 1_000.0).is_empty());
        assert_eq!(world.get::<&Position>(e).unwrap().0, Point::new(5.0, 5.0));
    }
}

//! Order generation - seated customers decide whether to order

use bistro_logic::orders::{Dish, OrderRoll};
use hecs::{Entity, World};
use rand::Rng;

use crate::components::{Customer, Table};

/// One order-generation pass. Every table whose customer is seated and has
/// no order rolls once. Returns the orders posted.
pub fn order_generation_system<R: Rng + ?Sized>(
    world: &World,
    seating: &[Entity],
    tables: &mut [Table],
    roll: &OrderRoll,
    rng: &mut R,
) -> Vec<(usize, Dish)> {
    let mut posted = Vec::new();
    for (table, &entity) in tables.iter_mut().zip(seating) {
        let seated = world
            .get::<&Customer>(entity)
            .map(|c| c.is_seated())
            .unwrap_or(false);
        if !seated || table.order.order().is_some() {
            continue;
        }
        if let Some((dish, patience_ms)) = roll.roll(rng) {
            if table.order.post(dish, patience_ms).is_ok() {
                posted.push((table.index, dish));
            }
        }
    }
    posted
}

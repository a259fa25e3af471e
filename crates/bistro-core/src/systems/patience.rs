//! Patience countdown for every table with an active order

use bistro_logic::orders::{Dish, PatienceTick};

use crate::components::Table;

/// An order that ran out of patience this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub table: usize,
    pub dish: Dish,
    pub was_taken: bool,
}

/// Count every active order down by `delta_ms`. Expired orders are already
/// cleared when this returns; the caller runs the leave flow.
pub fn patience_system(tables: &mut [Table], delta_ms: u64) -> Vec<Expiry> {
    let mut expired = Vec::new();
    for table in tables.iter_mut() {
        if let PatienceTick::Expired { dish, was_taken } = table.order.tick(delta_ms) {
            expired.push(Expiry {
                table: table.index,
                dish,
                was_taken,
            });
        }
    }
    expired
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_logic::geometry::Point;

    #[test]
    fn test_only_active_orders_expire() {
        let mut tables: Vec<Table> = (0..3)
            .map(|i| Table::new(i, Point::ZERO, Point::ZERO))
            .collect();
        tables[0].order.post(Dish::Soup, 1_000).unwrap();
        tables[2].order.post(Dish::Pizza, 5_000).unwrap();
        tables[2].order.take().unwrap();

        assert!(patience_system(&mut tables, 999).is_empty());
        let expired = patience_system(&mut tables, 1);
        assert_eq!(
            expired,
            vec![Expiry {
                table: 0,
                dish: Dish::Soup,
                was_taken: false
            }]
        );
        assert_eq!(tables[2].order.patience_remaining_ms(), 4_000);

        let expired = patience_system(&mut tables, 10_000);
        assert_eq!(expired.len(), 1);
        assert!(expired[0].was_taken);
        assert!(patience_system(&mut tables, 10_000).is_empty());
    }
}

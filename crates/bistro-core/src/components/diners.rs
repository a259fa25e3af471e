//! Customers and the tables they sit at.

use bistro_logic::geometry::Point;
use bistro_logic::orders::TableOrder;
use serde::{Deserialize, Serialize};

/// Lightest and darkest customer skin tones.
const TINT_LIGHT: u32 = 0xfaa95c;
const TINT_DARK: u32 = 0x4a321b;

/// A customer bound to one table for the whole session.
///
/// Customers are never despawned: leaving hides them and a respawn shows
/// them again at the door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub table: usize,
    /// Seated and able to order.
    pub waiting: bool,
    pub visible: bool,
    /// Token of the respawn currently scheduled, if any.
    pub pending_respawn: Option<u64>,
}

impl Customer {
    /// A hidden customer that has not arrived yet.
    pub fn new(table: usize) -> Self {
        Self {
            table,
            waiting: false,
            visible: false,
            pending_respawn: None,
        }
    }

    /// Visible, seated, and ready to order.
    pub fn is_seated(&self) -> bool {
        self.visible && self.waiting
    }
}

/// Sprite tint as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tint(pub u32);

impl Tint {
    /// Colour `t` (0..=1) of the way from the lightest to the darkest tone.
    pub fn between(t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let channel = |shift: u32| {
            let a = ((TINT_LIGHT >> shift) & 0xff) as f32;
            let b = ((TINT_DARK >> shift) & 0xff) as f32;
            ((a + (b - a) * t).round() as u32) << shift
        };
        Self(channel(16) | channel(8) | channel(0))
    }
}

/// One table and its order state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub index: usize,
    pub position: Point,
    pub seat: Point,
    pub order: TableOrder,
}

impl Table {
    pub fn new(index: usize, position: Point, seat: Point) -> Self {
        Self {
            index,
            position,
            seat,
            order: TableOrder::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tint_endpoints() {
        assert_eq!(Tint::between(0.0), Tint(0xfaa95c));
        assert_eq!(Tint::between(1.0), Tint(0x4a321b));
        assert_eq!(Tint::between(7.0), Tint(0x4a321b));
    }

    #[test]
    fn test_tint_midpoint() {
        // channels 162, 109.5 and 59.5 round half away from zero
        assert_eq!(Tint::between(0.5), Tint(0xa26e3c));
    }

    #[test]
    fn test_new_customer_is_hidden() {
        let c = Customer::new(3);
        assert!(!c.visible);
        assert!(!c.is_seated());
        assert_eq!(c.pending_respawn, None);
    }
}

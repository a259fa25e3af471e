//! The player and the kitchen appliances they work.

use bistro_logic::economy::player_speed_for;
use bistro_logic::geometry::Point;
use bistro_logic::orders::{Dish, Holding, OrderTicket};
use serde::{Deserialize, Serialize};

/// Held-key state for one frame. `interact` is an edge: true only on the
/// frame the key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub interact: bool,
}

impl FrameInput {
    pub fn interact() -> Self {
        Self {
            interact: true,
            ..Default::default()
        }
    }

    /// Velocity direction. `left` beats `right`, `up` beats `down`.
    pub fn direction(&self) -> (f32, f32) {
        let dx = if self.left {
            -1.0
        } else if self.right {
            1.0
        } else {
            0.0
        };
        let dy = if self.up {
            -1.0
        } else if self.down {
            1.0
        } else {
            0.0
        };
        (dx, dy)
    }
}

/// The waiter: position, carry slot and order ticket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Point,
    /// Units per second.
    pub speed: f32,
    /// Heading in degrees, from the last non-zero movement.
    pub facing: f32,
    pub holding: Holding,
    pub ticket: Option<OrderTicket>,
}

impl Player {
    pub fn new(position: Point, speed_level: u32) -> Self {
        Self {
            position,
            speed: player_speed_for(speed_level),
            facing: 180.0,
            holding: Holding::Empty,
            ticket: None,
        }
    }

    /// Drop the ticket if it belongs to `table`.
    pub fn invalidate_ticket(&mut self, table: usize) -> bool {
        match self.ticket {
            Some(t) if t.table == table => {
                self.ticket = None;
                true
            }
            _ => false,
        }
    }

    /// HUD line, e.g. `Holding: Burger (food) | Ticket: Burger (T3)`.
    pub fn order_line(&self) -> String {
        let mut line = format!("Holding: {}", self.holding.describe());
        if let Some(ticket) = self.ticket {
            line.push_str(&format!(" | Ticket: {} (T{})", ticket.dish, ticket.table + 1));
        }
        line
    }
}

/// The oven cooks one dish at a time; finished dishes wait on its counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oven {
    pub cooking: Option<Dish>,
    pub counter: Vec<Dish>,
}

impl Oven {
    pub fn is_busy(&self) -> bool {
        self.cooking.is_some()
    }

    /// Move the dish in the oven onto the counter.
    pub fn finish(&mut self) -> Option<Dish> {
        let dish = self.cooking.take()?;
        self.counter.push(dish);
        Some(dish)
    }

    /// Take the oldest dish off the counter.
    pub fn take_from_counter(&mut self) -> Option<Dish> {
        if self.counter.is_empty() {
            None
        } else {
            Some(self.counter.remove(0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_beats_right_up_beats_down() {
        let input = FrameInput {
            up: true,
            down: true,
            left: true,
            right: true,
            interact: false,
        };
        assert_eq!(input.direction(), (-1.0, -1.0));
        let input = FrameInput {
            down: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), (1.0, 1.0));
    }

    #[test]
    fn test_order_line() {
        let mut player = Player::new(Point::ZERO, 0);
        assert_eq!(player.order_line(), "Holding: -");
        player.holding = Holding::Food(Dish::Burger);
        player.ticket = Some(OrderTicket {
            dish: Dish::Burger,
            table: 2,
        });
        assert_eq!(player.order_line(), "Holding: Burger (food) | Ticket: Burger (T3)");
    }

    #[test]
    fn test_invalidate_ticket_only_for_its_table() {
        let mut player = Player::new(Point::ZERO, 0);
        player.ticket = Some(OrderTicket {
            dish: Dish::Soup,
            table: 1,
        });
        assert!(!player.invalidate_ticket(0));
        assert!(player.ticket.is_some());
        assert!(player.invalidate_ticket(1));
        assert!(player.ticket.is_none());
    }

    #[test]
    fn test_oven_counter_is_fifo() {
        let mut oven = Oven::default();
        assert_eq!(oven.finish(), None);
        oven.cooking = Some(Dish::Pizza);
        assert!(oven.is_busy());
        assert_eq!(oven.finish(), Some(Dish::Pizza));
        oven.cooking = Some(Dish::Salad);
        oven.finish();
        assert_eq!(oven.take_from_counter(), Some(Dish::Pizza));
        assert_eq!(oven.take_from_counter(), Some(Dish::Salad));
        assert_eq!(oven.take_from_counter(), None);
    }
}

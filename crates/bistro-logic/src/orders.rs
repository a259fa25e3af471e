//! Per-table order lifecycle: Empty → Posted → Taken → (fulfilled | expired).
//!
//! [`TableOrder`] is the state machine for one table. It knows nothing about
//! customers or the player; the engine decides when to post, take, serve
//! and expire, and applies the side effects (money, tickets, leave flow).

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dish {
    Burger,
    Salad,
    Soup,
    Pizza,
}

impl Dish {
    pub const ALL: [Dish; 4] = [Dish::Burger, Dish::Salad, Dish::Soup, Dish::Pizza];

    pub fn name(self) -> &'static str {
        match self {
            Dish::Burger => "Burger",
            Dish::Salad => "Salad",
            Dish::Soup => "Soup",
            Dish::Pizza => "Pizza",
        }
    }

    /// Name of the uncooked ingredient.
    pub fn raw_name(self) -> &'static str {
        match self {
            Dish::Burger => "RawBurger",
            Dish::Salad => "RawSalad",
            Dish::Soup => "RawSoup",
            Dish::Pizza => "RawPizza",
        }
    }
}

impl std::fmt::Display for Dish {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The player's single carry slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Holding {
    #[default]
    Empty,
    RawIngredient(Dish),
    Food(Dish),
}

impl Holding {
    pub fn is_empty(&self) -> bool {
        matches!(self, Holding::Empty)
    }

    /// Display name of the held item.
    pub fn item_name(&self) -> Option<&'static str> {
        match self {
            Holding::Empty => None,
            Holding::RawIngredient(dish) => Some(dish.raw_name()),
            Holding::Food(dish) => Some(dish.name()),
        }
    }

    /// HUD text, e.g. `Burger (food)` or `-`.
    pub fn describe(&self) -> String {
        match self {
            Holding::Empty => "-".to_string(),
            Holding::RawIngredient(dish) => format!("{} (rawIngredient)", dish.raw_name()),
            Holding::Food(dish) => format!("{} (food)", dish.name()),
        }
    }
}

/// Claim letting the player deliver `dish` to table `table`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTicket {
    pub dish: Dish,
    pub table: usize,
}

/// Observable lifecycle state of a table's order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPhase {
    Empty,
    Posted,
    Taken,
}

/// Rejected order transitions. These are user mistakes, not faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderError {
    /// The table has no order.
    NoOrder,
    /// The table already has an order.
    AlreadyPosted,
    /// The order was already taken.
    AlreadyTaken,
    /// Tried to serve before taking the order.
    NotTaken,
    /// The served dish is not what the table ordered.
    WrongDish { ordered: Dish, offered: Dish },
    /// The player's ticket is missing or for another table.
    NoTicket,
}

impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderError::NoOrder => write!(f, "table has no order"),
            OrderError::AlreadyPosted => write!(f, "table already has an order"),
            OrderError::AlreadyTaken => write!(f, "order already taken"),
            OrderError::NotTaken => write!(f, "order not taken yet"),
            OrderError::WrongDish { ordered, offered } => {
                write!(f, "wrong dish: ordered {}, offered {}", ordered, offered)
            }
            OrderError::NoTicket => write!(f, "no ticket for this table"),
        }
    }
}

impl std::error::Error for OrderError {}

/// Outcome of one patience tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatienceTick {
    /// No active order.
    Idle,
    /// Still waiting; remaining milliseconds.
    Waiting(u64),
    /// Patience ran out this tick. The order has been cleared.
    Expired { dish: Dish, was_taken: bool },
}

/// Order and patience state of one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOrder {
    order: Option<Dish>,
    taken: bool,
    patience_max_ms: u64,
    patience_remaining_ms: u64,
}

impl TableOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> OrderPhase {
        match (self.order, self.taken) {
            (None, _) => OrderPhase::Empty,
            (Some(_), false) => OrderPhase::Posted,
            (Some(_), true) => OrderPhase::Taken,
        }
    }

    pub fn order(&self) -> Option<Dish> {
        self.order
    }

    pub fn is_taken(&self) -> bool {
        self.taken
    }

    pub fn patience_max_ms(&self) -> u64 {
        self.patience_max_ms
    }

    pub fn patience_remaining_ms(&self) -> u64 {
        self.patience_remaining_ms
    }

    /// Remaining patience as a fraction of the maximum (0 when idle).
    pub fn patience_fraction(&self) -> f32 {
        if self.patience_max_ms == 0 {
            0.0
        } else {
            (self.patience_remaining_ms as f32 / self.patience_max_ms as f32).clamp(0.0, 1.0)
        }
    }

    /// Empty → Posted with a fresh patience budget.
    pub fn post(&mut self, dish: Dish, patience_ms: u64) -> Result<(), OrderError> {
        if self.order.is_some() {
            return Err(OrderError::AlreadyPosted);
        }
        self.order = Some(dish);
        self.taken = false;
        self.patience_max_ms = patience_ms;
        self.patience_remaining_ms = patience_ms;
        Ok(())
    }

    /// Posted → Taken. Returns the ordered dish.
    pub fn take(&mut self) -> Result<Dish, OrderError> {
        let dish = self.order.ok_or(OrderError::NoOrder)?;
        if self.taken {
            return Err(OrderError::AlreadyTaken);
        }
        self.taken = true;
        Ok(dish)
    }

    /// Check a delivery of `offered` against this table's order and the
    /// player's ticket without changing anything.
    pub fn check_delivery(
        &self,
        table: usize,
        offered: Dish,
        ticket: Option<&OrderTicket>,
    ) -> Result<(), OrderError> {
        let ordered = self.order.ok_or(OrderError::NoOrder)?;
        if ordered != offered {
            return Err(OrderError::WrongDish { ordered, offered });
        }
        if !self.taken {
            return Err(OrderError::NotTaken);
        }
        match ticket {
            Some(t) if t.table == table => Ok(()),
            _ => Err(OrderError::NoTicket),
        }
    }

    /// Taken → fulfilled. Validates like [`Self::check_delivery`] and
    /// clears the order on success.
    pub fn fulfill(
        &mut self,
        table: usize,
        offered: Dish,
        ticket: Option<&OrderTicket>,
    ) -> Result<Dish, OrderError> {
        self.check_delivery(table, offered, ticket)?;
        self.clear();
        Ok(offered)
    }

    /// Count patience down by `dt_ms`. Expiry clears the order, so it is
    /// reported once per posted order.
    pub fn tick(&mut self, dt_ms: u64) -> PatienceTick {
        let Some(dish) = self.order else {
            return PatienceTick::Idle;
        };
        self.patience_remaining_ms = self.patience_remaining_ms.saturating_sub(dt_ms);
        if self.patience_remaining_ms == 0 {
            let was_taken = self.taken;
            self.clear();
            return PatienceTick::Expired { dish, was_taken };
        }
        PatienceTick::Waiting(self.patience_remaining_ms)
    }

    /// Back to Empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Order roll parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderRoll {
    /// Chance per pass that a waiting customer orders.
    pub chance: f64,
    /// Inclusive patience window in seconds, before the bonus.
    pub patience_min_secs: u64,
    pub patience_max_secs: u64,
    /// Upgrade bonus added to both ends of the window.
    pub patience_bonus_secs: u64,
}

impl OrderRoll {
    /// Patience in milliseconds, a whole number of seconds drawn uniformly.
    pub fn roll_patience_ms<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let lo = self.patience_min_secs + self.patience_bonus_secs;
        let hi = (self.patience_max_secs + self.patience_bonus_secs).max(lo);
        rng.gen_range(lo..=hi) * 1000
    }

    /// Decide whether a waiting customer orders, and what.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(Dish, u64)> {
        if rng.gen::<f64>() >= self.chance {
            return None;
        }
        let dish = Dish::ALL[rng.gen_range(0..Dish::ALL.len())];
        Some((dish, self.roll_patience_ms(rng)))
    }
}

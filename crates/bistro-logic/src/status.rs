//! Player-facing status line messages.
//!
//! Player actions report their outcome as a [`Status`]. Rejections never
//! change game state.

use crate::economy::{PurchaseError, UpgradeKind};
use crate::orders::{Dish, OrderError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    TookOrder(Dish),
    Served { dish: Dish, reward: u64 },
    WrongDish,
    MustTakeOrderFirst,
    NeedTableTicket,
    HandsFull,
    GetIngredientsFirst,
    GotIngredient(Dish),
    Cooking(Dish),
    AlreadyCooking,
    Cooked(Dish),
    PickedUp(Dish),
    KitchenArea,
    Disposed(&'static str),
    NothingToDispose,
    DoorOpened,
    DoorClosed,
    BoughtUpgrade(UpgradeKind),
    NotEnoughMoney,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Status: ")?;
        match self {
            Status::TookOrder(dish) => write!(f, "Took order - {}", dish),
            Status::Served { dish, reward } => write!(f, "Served {} +${}", dish, reward),
            Status::WrongDish => f.write_str("Wrong dish"),
            Status::MustTakeOrderFirst => f.write_str("Must take the order first"),
            Status::NeedTableTicket => f.write_str("You must take this table's order first"),
            Status::HandsFull => f.write_str("Hands full - can't take an order"),
            Status::GetIngredientsFirst => f.write_str("Get ingredients from fridge first"),
            Status::GotIngredient(dish) => write!(f, "Got {} (take to oven)", dish),
            Status::Cooking(dish) => write!(f, "Cooking {}...", dish),
            Status::AlreadyCooking => f.write_str("Already cooking"),
            Status::Cooked(dish) => write!(f, "Cooked {} (at oven)", dish),
            Status::PickedUp(dish) => write!(f, "Picked up {}", dish),
            Status::KitchenArea => f.write_str("Kitchen area"),
            Status::Disposed(item) => write!(f, "Disposed {}", item),
            Status::NothingToDispose => f.write_str("Nothing to dispose"),
            Status::DoorOpened => f.write_str("Door opened"),
            Status::DoorClosed => f.write_str("Door closed"),
            Status::BoughtUpgrade(kind) => write!(f, "Bought upgrade! ({})", kind.name()),
            Status::NotEnoughMoney => f.write_str("Not enough money"),
        }
    }
}

impl From<OrderError> for Status {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::WrongDish { .. } => Status::WrongDish,
            OrderError::NotTaken => Status::MustTakeOrderFirst,
            OrderError::NoTicket => Status::NeedTableTicket,
            OrderError::NoOrder | OrderError::AlreadyPosted | OrderError::AlreadyTaken => {
                Status::GetIngredientsFirst
            }
        }
    }
}

impl From<PurchaseError> for Status {
    fn from(_: PurchaseError) -> Self {
        Status::NotEnoughMoney
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Status::Served {
                dish: Dish::Burger,
                reward: 25
            }
            .to_string(),
            "Status: Served Burger +$25"
        );
        assert_eq!(Status::WrongDish.to_string(), "Status: Wrong dish");
        assert_eq!(Status::Disposed("RawSoup").to_string(), "Status: Disposed RawSoup");
    }

    #[test]
    fn test_order_errors_map_to_messages() {
        let wrong = OrderError::WrongDish {
            ordered: Dish::Burger,
            offered: Dish::Salad,
        };
        assert_eq!(Status::from(wrong), Status::WrongDish);
        assert_eq!(Status::from(OrderError::NotTaken), Status::MustTakeOrderFirst);
        assert_eq!(Status::from(OrderError::NoTicket), Status::NeedTableTicket);
    }
}

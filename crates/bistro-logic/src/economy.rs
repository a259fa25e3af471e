//! Money and upgrade ledger.
//!
//! Four independent upgrade tracks, each an integer level starting at 0.
//! Buying level `L → L+1` costs `round(base × 1.5^L)`. The ledger holds
//! in-memory truth for a session; saving it is the caller's job.

use serde::{Deserialize, Serialize};

use crate::constants::economy::*;
use crate::constants::movement::BASE_PLAYER_SPEED;
use crate::constants::orders::PATIENCE_SECS_PER_LEVEL;
use crate::constants::timing::BASE_COOK_MS;

/// An upgrade track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    OvenSpeed,
    EarnRate,
    Patience,
    PlayerSpeed,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::OvenSpeed,
        UpgradeKind::EarnRate,
        UpgradeKind::Patience,
        UpgradeKind::PlayerSpeed,
    ];

    pub fn base_cost(self) -> u64 {
        match self {
            UpgradeKind::OvenSpeed => OVEN_SPEED_BASE_COST,
            UpgradeKind::EarnRate => EARN_RATE_BASE_COST,
            UpgradeKind::Patience => PATIENCE_BASE_COST,
            UpgradeKind::PlayerSpeed => PLAYER_SPEED_BASE_COST,
        }
    }

    /// Stable identifier used by the UI and save files.
    pub fn id(self) -> &'static str {
        match self {
            UpgradeKind::OvenSpeed => "ovenSpeed",
            UpgradeKind::EarnRate => "earnRate",
            UpgradeKind::Patience => "patience",
            UpgradeKind::PlayerSpeed => "playerSpeed",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            UpgradeKind::OvenSpeed => "Oven Speed Boost",
            UpgradeKind::EarnRate => "Better Prices",
            UpgradeKind::Patience => "Better Service",
            UpgradeKind::PlayerSpeed => "Shoes Upgrade",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            UpgradeKind::OvenSpeed => "Cook 30% faster per level",
            UpgradeKind::EarnRate => "Earn $5 more per dish per level",
            UpgradeKind::Patience => "Customers wait 3s longer per level",
            UpgradeKind::PlayerSpeed => "Move 20% faster per level",
        }
    }
}

/// Purchased level per track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrades {
    pub oven_speed: u32,
    pub earn_rate: u32,
    pub patience: u32,
    pub player_speed: u32,
}

impl Upgrades {
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::OvenSpeed => self.oven_speed,
            UpgradeKind::EarnRate => self.earn_rate,
            UpgradeKind::Patience => self.patience,
            UpgradeKind::PlayerSpeed => self.player_speed,
        }
    }

    fn level_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::OvenSpeed => &mut self.oven_speed,
            UpgradeKind::EarnRate => &mut self.earn_rate,
            UpgradeKind::Patience => &mut self.patience,
            UpgradeKind::PlayerSpeed => &mut self.player_speed,
        }
    }
}

/// Price of buying the level after `level` on a track.
pub fn upgrade_cost(kind: UpgradeKind, level: u32) -> u64 {
    let exponent = level.min(i32::MAX as u32) as i32;
    (kind.base_cost() as f64 * COST_GROWTH.powi(exponent)).round() as u64
}

/// A completed purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Purchase {
    pub kind: UpgradeKind,
    pub cost: u64,
    pub new_level: u32,
}

/// Why a purchase was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseError {
    InsufficientFunds { kind: UpgradeKind, cost: u64, money: u64 },
}

impl std::fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurchaseError::InsufficientFunds { kind, cost, money } => write!(
                f,
                "cannot afford {} (cost ${}, have ${})",
                kind.name(),
                cost,
                money
            ),
        }
    }
}

impl std::error::Error for PurchaseError {}

/// One row of the upgrade shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeOffer {
    pub kind: UpgradeKind,
    pub level: u32,
    pub cost: u64,
    pub affordable: bool,
}

/// Money, cook speed factor and upgrade levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    money: u64,
    cook_speed: f32,
    upgrades: Upgrades,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(0, 1.0, Upgrades::default())
    }
}

impl Ledger {
    /// A non-positive or non-finite cook speed falls back to 1.
    pub fn new(money: u64, cook_speed: f32, upgrades: Upgrades) -> Self {
        let cook_speed = if cook_speed.is_finite() && cook_speed > 0.0 {
            cook_speed
        } else {
            1.0
        };
        Self {
            money,
            cook_speed,
            upgrades,
        }
    }

    pub fn money(&self) -> u64 {
        self.money
    }

    pub fn cook_speed(&self) -> f32 {
        self.cook_speed
    }

    pub fn upgrades(&self) -> &Upgrades {
        &self.upgrades
    }

    pub fn level(&self, kind: UpgradeKind) -> u32 {
        self.upgrades.level(kind)
    }

    /// Cost of the next level on a track.
    pub fn next_cost(&self, kind: UpgradeKind) -> u64 {
        upgrade_cost(kind, self.level(kind))
    }

    /// Buy the next level if affordable. On refusal nothing changes.
    pub fn buy_upgrade(&mut self, kind: UpgradeKind) -> Result<Purchase, PurchaseError> {
        let cost = self.next_cost(kind);
        if self.money < cost {
            return Err(PurchaseError::InsufficientFunds {
                kind,
                cost,
                money: self.money,
            });
        }
        self.money -= cost;
        let level = self.upgrades.level_mut(kind);
        *level += 1;
        Ok(Purchase {
            kind,
            cost,
            new_level: *level,
        })
    }

    /// Money paid for one served dish.
    pub fn serve_reward(&self) -> u64 {
        BASE_REWARD + REWARD_PER_EARN_LEVEL * self.upgrades.earn_rate as u64
    }

    /// Credit a served dish and return the amount added.
    pub fn credit_serve(&mut self) -> u64 {
        let reward = self.serve_reward();
        self.money = self.money.saturating_add(reward);
        reward
    }

    /// Oven time for one dish.
    pub fn cook_duration_ms(&self) -> f32 {
        let oven_factor = 1.0 + OVEN_SPEED_PER_LEVEL * self.upgrades.oven_speed as f32;
        (BASE_COOK_MS / self.cook_speed) / oven_factor
    }

    /// Extra seconds of patience added to every new order.
    pub fn patience_bonus_secs(&self) -> u64 {
        PATIENCE_SECS_PER_LEVEL * self.upgrades.patience as u64
    }

    /// Player movement speed for the current shoe level.
    pub fn player_speed(&self) -> f32 {
        player_speed_for(self.upgrades.player_speed)
    }

    /// Shop listing in display order.
    pub fn offers(&self) -> Vec<UpgradeOffer> {
        UpgradeKind::ALL
            .into_iter()
            .map(|kind| {
                let cost = self.next_cost(kind);
                UpgradeOffer {
                    kind,
                    level: self.level(kind),
                    cost,
                    affordable: self.money >= cost,
                }
            })
            .collect()
    }
}

/// `BASE_PLAYER_SPEED × (1 + 0.20 × level)`.
pub fn player_speed_for(level: u32) -> f32 {
    BASE_PLAYER_SPEED * (1.0 + PLAYER_SPEED_PER_LEVEL * level as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_curve() {
        assert_eq!(upgrade_cost(UpgradeKind::OvenSpeed, 0), 40);
        assert_eq!(upgrade_cost(UpgradeKind::OvenSpeed, 1), 60);
        assert_eq!(upgrade_cost(UpgradeKind::EarnRate, 1), 53); // 52.5 rounds up
        assert_eq!(upgrade_cost(UpgradeKind::Patience, 2), 68); // 67.5
        assert_eq!(upgrade_cost(UpgradeKind::PlayerSpeed, 3), 152); // 151.875
    }

    #[test]
    fn test_earn_rate_purchase_then_refusal() {
        let mut ledger = Ledger::new(50, 1.0, Upgrades::default());
        let purchase = ledger.buy_upgrade(UpgradeKind::EarnRate).unwrap();
        assert_eq!(purchase.cost, 35);
        assert_eq!(ledger.money(), 15);
        assert_eq!(ledger.level(UpgradeKind::EarnRate), 1);

        let err = ledger.buy_upgrade(UpgradeKind::EarnRate).unwrap_err();
        assert_eq!(
            err,
            PurchaseError::InsufficientFunds {
                kind: UpgradeKind::EarnRate,
                cost: 53,
                money: 15
            }
        );
        assert_eq!(ledger.money(), 15);
        assert_eq!(ledger.level(UpgradeKind::EarnRate), 1);
    }

    #[test]
    fn test_exact_funds_reach_zero() {
        let mut ledger = Ledger::new(30, 1.0, Upgrades::default());
        assert!(ledger.buy_upgrade(UpgradeKind::Patience).is_ok());
        assert_eq!(ledger.money(), 0);
        assert!(ledger.buy_upgrade(UpgradeKind::Patience).is_err());
    }

    #[test]
    fn test_derived_values() {
        let ledger = Ledger::new(
            0,
            1.0,
            Upgrades {
                oven_speed: 2,
                earn_rate: 3,
                patience: 4,
                player_speed: 5,
            },
        );
        assert_eq!(ledger.serve_reward(), 35);
        assert_eq!(ledger.patience_bonus_secs(), 12);
        assert!((ledger.cook_duration_ms() - 1875.0).abs() < 0.01);
        assert!((ledger.player_speed() - 320.0).abs() < 0.01);
    }

    #[test]
    fn test_cook_speed_factor() {
        let ledger = Ledger::new(0, 2.0, Upgrades::default());
        assert!((ledger.cook_duration_ms() - 1500.0).abs() < 0.01);
        let ledger = Ledger::new(0, 0.0, Upgrades::default());
        assert!((ledger.cook_speed() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_credit_serve() {
        let mut ledger = Ledger::new(
            10,
            1.0,
            Upgrades {
                earn_rate: 1,
                ..Default::default()
            },
        );
        assert_eq!(ledger.credit_serve(), 25);
        assert_eq!(ledger.money(), 35);
    }

    #[test]
    fn test_offers_flag_affordability() {
        let ledger = Ledger::new(40, 1.0, Upgrades::default());
        let offers = ledger.offers();
        assert_eq!(offers.len(), 4);
        let affordable: Vec<_> = offers.iter().filter(|o| o.affordable).map(|o| o.kind).collect();
        assert_eq!(
            affordable,
            vec![UpgradeKind::OvenSpeed, UpgradeKind::EarnRate, UpgradeKind::Patience]
        );
    }

    #[test]
    fn test_offers_follow_purchases() {
        let mut ledger = Ledger::new(50, 1.0, Upgrades::default());
        let costs: Vec<_> = ledger.offers().iter().map(|o| o.cost).collect();
        assert_eq!(costs, vec![40, 35, 30, 45]);

        ledger.buy_upgrade(UpgradeKind::EarnRate).unwrap();
        let offers = ledger.offers();
        let earn = &offers[1];
        assert_eq!(earn.kind, UpgradeKind::EarnRate);
        assert_eq!((earn.level, earn.cost, earn.affordable), (1, 53, false));
        assert!(offers.iter().all(|o| !o.affordable));
    }

    #[test]
    fn test_ids_roundtrip() {
        for kind in UpgradeKind::ALL {
            assert_eq!(UpgradeKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(UpgradeKind::from_id("rocketBoots"), None);
    }
}

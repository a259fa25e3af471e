//! Session configuration and validation.
//!
//! Every tunable of a session lives in [`GameConfig`]. Defaults come from
//! [`crate::constants`]; hosts may override any field from JSON (missing
//! fields keep their default).
//!
//! ```
//! use bistro_logic::config::{validate_config, GameConfig};
//!
//! let mut config = GameConfig::default();
//! config.seed = Some(42);
//! assert!(validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{self, movement, orders, timing};
use crate::orders::OrderRoll;

/// Smallest world the restaurant layout fits into.
pub const MIN_WORLD_WIDTH: f32 = 480.0;
pub const MIN_WORLD_HEIGHT: f32 = 320.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World extents in world units.
    pub world_width: f32,
    pub world_height: f32,
    /// Navigation cell size.
    pub cell_size: f32,
    /// Customer walking speed (units/s).
    pub customer_speed: f32,
    /// Table interaction radius.
    pub interact_radius: f32,
    /// Oven counter pickup radius.
    pub pickup_radius: f32,
    /// Order-generation pass interval (ms).
    pub order_interval_ms: u64,
    /// Chance per pass that a waiting customer orders.
    pub order_chance: f64,
    /// Base patience window in seconds (inclusive).
    pub patience_min_secs: u64,
    pub patience_max_secs: u64,
    /// Respawn delay window (ms, inclusive).
    pub respawn_min_ms: u64,
    pub respawn_max_ms: u64,
    /// Autosave interval (ms).
    pub autosave_interval_ms: u64,
    /// First arrival delay and per-table stagger (ms).
    pub first_spawn_ms: u64,
    pub spawn_stagger_ms: u64,
    /// RNG seed (None = seeded from entropy).
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: constants::WORLD_WIDTH,
            world_height: constants::WORLD_HEIGHT,
            cell_size: constants::CELL_SIZE,
            customer_speed: movement::CUSTOMER_SPEED,
            interact_radius: constants::INTERACT_RADIUS,
            pickup_radius: constants::PICKUP_RADIUS,
            order_interval_ms: timing::ORDER_TICK_MS,
            order_chance: orders::ORDER_CHANCE,
            patience_min_secs: orders::PATIENCE_MIN_SECS,
            patience_max_secs: orders::PATIENCE_MAX_SECS,
            respawn_min_ms: timing::RESPAWN_MIN_MS,
            respawn_max_ms: timing::RESPAWN_MAX_MS,
            autosave_interval_ms: timing::AUTOSAVE_MS,
            first_spawn_ms: timing::FIRST_SPAWN_MS,
            spawn_stagger_ms: timing::SPAWN_STAGGER_MS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Order roll parameters for the given patience bonus.
    pub fn order_roll(&self, patience_bonus_secs: u64) -> OrderRoll {
        OrderRoll {
            chance: self.order_chance,
            patience_min_secs: self.patience_min_secs,
            patience_max_secs: self.patience_max_secs,
            patience_bonus_secs,
        }
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// World smaller than the restaurant layout.
    WorldTooSmall { width: f32, height: f32 },
    /// Cell size must be at least one unit.
    InvalidCellSize(f32),
    /// Customer speed must be positive.
    InvalidSpeed(f32),
    /// Interaction radii must be positive.
    InvalidRadius(f32),
    /// Order chance outside 0..=1.
    InvalidChance(f64),
    /// A min/max window is inverted.
    InvertedRange { field: &'static str, min: u64, max: u64 },
    /// A recurring interval of zero would never advance.
    ZeroInterval(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::WorldTooSmall { width, height } => write!(
                f,
                "world {}x{} is smaller than {}x{}",
                width, height, MIN_WORLD_WIDTH, MIN_WORLD_HEIGHT
            ),
            ConfigError::InvalidCellSize(v) => write!(f, "cell size {} must be a whole number >= 1", v),
            ConfigError::InvalidSpeed(v) => write!(f, "customer speed {} must be > 0", v),
            ConfigError::InvalidRadius(v) => write!(f, "radius {} must be > 0", v),
            ConfigError::InvalidChance(v) => write!(f, "order chance {} outside 0..=1", v),
            ConfigError::InvertedRange { field, min, max } => {
                write!(f, "{}: min {} exceeds max {}", field, min, max)
            }
            ConfigError::ZeroInterval(field) => write!(f, "{} must be non-zero", field),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &GameConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if !(config.world_width >= MIN_WORLD_WIDTH && config.world_height >= MIN_WORLD_HEIGHT) {
        errors.push(ConfigError::WorldTooSmall {
            width: config.world_width,
            height: config.world_height,
        });
    }
    if !(config.cell_size >= 1.0 && config.cell_size.fract() == 0.0) {
        errors.push(ConfigError::InvalidCellSize(config.cell_size));
    }
    if !(config.customer_speed > 0.0) {
        errors.push(ConfigError::InvalidSpeed(config.customer_speed));
    }
    for radius in [config.interact_radius, config.pickup_radius] {
        if !(radius > 0.0) {
            errors.push(ConfigError::InvalidRadius(radius));
        }
    }
    if !(0.0..=1.0).contains(&config.order_chance) {
        errors.push(ConfigError::InvalidChance(config.order_chance));
    }
    if config.patience_min_secs > config.patience_max_secs {
        errors.push(ConfigError::InvertedRange {
            field: "patience_secs",
            min: config.patience_min_secs,
            max: config.patience_max_secs,
        });
    }
    if config.respawn_min_ms > config.respawn_max_ms {
        errors.push(ConfigError::InvertedRange {
            field: "respawn_ms",
            min: config.respawn_min_ms,
            max: config.respawn_max_ms,
        });
    }
    if config.order_interval_ms == 0 {
        errors.push(ConfigError::ZeroInterval("order_interval_ms"));
    }
    if config.autosave_interval_ms == 0 {
        errors.push(ConfigError::ZeroInterval("autosave_interval_ms"));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&GameConfig::default()).is_empty());
    }

    #[test]
    fn test_collects_every_error() {
        let config = GameConfig {
            world_width: 100.0,
            cell_size: 0.0,
            order_chance: 1.5,
            patience_min_secs: 30,
            patience_max_secs: 10,
            order_interval_ms: 0,
            ..Default::default()
        };
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ConfigError::ZeroInterval("order_interval_ms")));
    }

    #[test]
    fn test_nan_speed_rejected() {
        let config = GameConfig {
            customer_speed: f32::NAN,
            ..Default::default()
        };
        assert_eq!(validate_config(&config).len(), 1);
    }

    #[test]
    fn test_fractional_cell_size_rejected() {
        let config = GameConfig {
            cell_size: 16.5,
            ..Default::default()
        };
        assert_eq!(validate_config(&config), vec![ConfigError::InvalidCellSize(16.5)]);
    }

    #[test]
    fn test_order_roll_carries_bonus() {
        let roll = GameConfig::default().order_roll(9);
        assert_eq!(roll.patience_bonus_secs, 9);
        assert_eq!(roll.patience_min_secs, 12);
        assert!((roll.chance - 0.4).abs() < f64::EPSILON);
    }
}

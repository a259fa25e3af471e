//! Game constants: timings, radii, rewards and upgrade costs.
//!
//! Durations are integer milliseconds, distances are world units.
//! `GameConfig::default()` is built from these values.

/// Side length of one navigation grid cell.
pub const CELL_SIZE: f32 = 16.0;

/// Default world extents.
pub const WORLD_WIDTH: f32 = 960.0;
pub const WORLD_HEIGHT: f32 = 640.0;

/// Distance within which the player can interact with a table.
pub const INTERACT_RADIUS: f32 = 48.0;

/// Distance within which cooked food on the oven counter can be picked up.
pub const PICKUP_RADIUS: f32 = 60.0;

pub mod timing {
    /// Order-generation pass interval.
    pub const ORDER_TICK_MS: u64 = 3_000;
    /// Autosave interval.
    pub const AUTOSAVE_MS: u64 = 5_000;
    /// Respawn delay bounds (inclusive).
    pub const RESPAWN_MIN_MS: u64 = 5_000;
    pub const RESPAWN_MAX_MS: u64 = 10_000;
    /// First customer arrives after this delay; later ones are staggered.
    pub const FIRST_SPAWN_MS: u64 = 500;
    pub const SPAWN_STAGGER_MS: u64 = 400;
    /// Base oven time before speed factors.
    pub const BASE_COOK_MS: f32 = 3_000.0;
    /// Shortest allowed motion segment.
    pub const MIN_SEGMENT_MS: f32 = 50.0;
}

pub mod orders {
    /// Chance per order tick that a waiting customer posts an order.
    pub const ORDER_CHANCE: f64 = 0.4;
    /// Base patience window in whole seconds (inclusive).
    pub const PATIENCE_MIN_SECS: u64 = 12;
    pub const PATIENCE_MAX_SECS: u64 = 22;
    /// Extra patience per `patience` upgrade level.
    pub const PATIENCE_SECS_PER_LEVEL: u64 = 3;
}

pub mod economy {
    pub const BASE_REWARD: u64 = 20;
    pub const REWARD_PER_EARN_LEVEL: u64 = 5;
    pub const COST_GROWTH: f64 = 1.5;
    pub const OVEN_SPEED_PER_LEVEL: f32 = 0.3;
    pub const PLAYER_SPEED_PER_LEVEL: f32 = 0.20;

    pub const OVEN_SPEED_BASE_COST: u64 = 40;
    pub const EARN_RATE_BASE_COST: u64 = 35;
    pub const PATIENCE_BASE_COST: u64 = 30;
    pub const PLAYER_SPEED_BASE_COST: u64 = 45;
}

pub mod movement {
    /// Customer walking speed (units per second).
    pub const CUSTOMER_SPEED: f32 = 80.0;
    /// Player speed before upgrades (units per second).
    pub const BASE_PLAYER_SPEED: f32 = 160.0;
    /// Side of the player's square collision body.
    pub const PLAYER_SIZE: f32 = 32.0;
    /// The player may wander this far outside, above the top wall.
    pub const OUTSIDE_TOP_MARGIN: f32 = 4_000.0;
    /// Longest sub-step when resolving player collisions.
    pub const MAX_COLLISION_STEP: f32 = 4.0;
}

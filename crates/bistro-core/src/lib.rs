//! Bistro Core - Restaurant Session Engine
//!
//! Runs one restaurant session: customers arrive through the top door,
//! walk to their tables and order. The player takes orders, cooks and
//! serves, and spends earnings on upgrades that persist in save slots.
//!
//! # Architecture
//!
//! Customers live in a `hecs` world, one entity per table:
//! - **Components**: Customer, Position, Facing, Tint, Walking
//! - **Systems**: free functions over the world and the table list
//! - **Scheduler**: virtual-clock timers for arrivals, cooking, order
//!   passes and autosave
//!
//! # Example
//!
//! ```rust,no_run
//! use bistro_core::prelude::*;
//! use bistro_logic::config::GameConfig;
//!
//! let mut engine = GameEngine::new(GameConfig::default(), MemoryStore::new(), "default");
//! engine.start();
//!
//! loop {
//!     engine.update(16, &FrameInput::default()); // ~60 FPS
//!     for event in engine.drain_events() {
//!         println!("{:?}", event);
//!     }
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod persistence;
pub mod scheduler;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{EnginePhase, GameEngine, Hud, LeaveCause, OrderLine, UiEvent};
    pub use crate::persistence::{DirStore, MemoryStore, SaveStore, SlotData};
}

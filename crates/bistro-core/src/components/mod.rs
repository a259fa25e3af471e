//! Component definitions for the restaurant ECS.
//!
//! Components are plain data attached to customer entities, plus the
//! singleton state (tables, player, oven) the engine owns directly.
//! Behaviour lives in systems and the engine.

mod common;
mod diners;
mod staff;

pub use common::*;
pub use diners::*;
pub use staff::*;

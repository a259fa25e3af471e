//! Pure simulation logic for Bistro.
//!
//! Everything here is independent of any engine, storage or renderer.
//! Functions take plain data and return results, so the whole kitchen can
//! be unit-tested without an engine.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Session tunables and validation |
//! | [`constants`] | Timings, radii, rewards, upgrade base costs |
//! | [`economy`] | Money, upgrade levels, costs and derived multipliers |
//! | [`geometry`] | Points and axis-aligned rectangles |
//! | [`grid`] | Occupancy grid rasterized from obstacle rectangles |
//! | [`interaction`] | Interact-press target precedence |
//! | [`layout`] | Restaurant floor plan (walls, tables, appliances, zones) |
//! | [`motion`] | Timed walking along waypoints with facing updates |
//! | [`orders`] | Dishes, carry slot, tickets, per-table order state machine |
//! | [`pathfinding`] | A* over the occupancy grid |
//! | [`status`] | Status line messages |

pub mod config;
pub mod constants;
pub mod economy;
pub mod geometry;
pub mod grid;
pub mod interaction;
pub mod layout;
pub mod motion;
pub mod orders;
pub mod pathfinding;
pub mod status;

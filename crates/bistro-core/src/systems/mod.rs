//! Systems - logic that operates on components

mod movement;
mod orders;
mod patience;
mod player;

pub use movement::*;
pub use orders::*;
pub use patience::*;
pub use player::*;

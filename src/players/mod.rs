//! Players and the round pool.
//!
//! - `Player`: per-category decay, clothing counter, level and points
//! - `PlayerPool`: active players, weighted category/player draws, scoring

mod player;
mod pool;

pub use player::{Player, Sex};
pub use pool::PlayerPool;

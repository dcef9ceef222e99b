//! Core engine types: categories, RNG, configuration, errors.
//!
//! Everything else in the crate is keyed by [`Category`] and draws its
//! randomness from [`GameRng`].

pub mod category;
pub mod config;
pub mod error;
pub mod rng;

pub use category::{Category, CategoryMap};
pub use config::EngineConfig;
pub use error::{EngineError, MatchError, QuestError, StoreError};
pub use rng::GameRng;

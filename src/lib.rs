//! # party-quest
//!
//! Quest selection and player matching engine for a party game.
//!
//! ## Design Principles
//!
//! 1. **Filtered Index**: Quests sit in an arena with per-category
//!    all/valid/linked views. Settings changes rebuild *valid*, level
//!    changes rebuild *linked*, draws are uniform over *linked*.
//!
//! 2. **Decay-Weighted Fairness**: Categories and players carry "rounds
//!    since last chosen" counters. Under-served categories and players are
//!    drawn more often without anything becoming impossible.
//!
//! 3. **Explicit Session**: All state lives in a [`Session`]. There are no
//!    globals, so independent sessions coexist in one process.
//!
//! 4. **Deterministic**: All randomness flows through a seeded
//!    [`GameRng`].
//!
//! ## Modules
//!
//! - `core`: Categories, RNG, configuration, errors
//! - `quests`: Quest records, configurations, the quest index, feeds
//! - `players`: Players and the round pool (matching and scoring)
//! - `settings`: Location, friendship level, props, category weights
//! - `store`: Key-value persistence of settings and players
//! - `round`: Round state machine and presentation
//! - `session`: The facade driving a game

pub mod core;
pub mod players;
pub mod quests;
pub mod round;
pub mod session;
pub mod settings;
pub mod store;

// Re-export commonly used types
pub use crate::core::{
    Category, CategoryMap, EngineConfig, EngineError, GameRng, MatchError, QuestError, StoreError,
};

pub use crate::quests::{
    parse_feed, Feed, FriendshipLevel, Location, PartnerSelector, PlayerSelector, Quest,
    QuestCollection, QuestConfiguration, QuestId, QuestRecord, Requirement, RuleMap,
    ValidationContext,
};

pub use crate::players::{Player, PlayerPool, Sex};

pub use crate::settings::{default_probability, Settings};

pub use crate::store::{KeyValueStore, MemoryStore, PlayerRecord, Storage};

pub use crate::round::{Button, Presentation, RoundAction, RoundState, Transition};

pub use crate::session::Session;

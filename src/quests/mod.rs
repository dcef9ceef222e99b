//! Quests and the quest index.
//!
//! - `Quest`: immutable prompt record with its configurations
//! - `QuestConfiguration`: level, player/partner selectors, friendship gate
//! - `QuestCollection`: per-category all/valid/linked views with random draws
//! - `RuleMap`: rule id to text lookup
//! - `parse_feed`: JSON quest feed decoding

mod collection;
mod configuration;
mod definition;
mod feed;
mod rules;

pub use collection::QuestCollection;
pub use configuration::{
    FriendshipLevel, Location, PartnerSelector, PlayerSelector, QuestConfiguration,
    ValidationContext,
};
pub use definition::{Quest, QuestId, QuestRecord, Requirement};
pub use feed::{parse_feed, Feed};
pub use rules::RuleMap;

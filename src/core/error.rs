//! Error types for the engine.

use crate::quests::{PartnerSelector, PlayerSelector};

/// A quest record that cannot become a [`Quest`](crate::quests::Quest).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestError {
    /// The record names no category.
    #[error("quest has no category")]
    NoCategory,

    /// The record has no prompt text.
    #[error("quest has no prompt text")]
    NoText,

    /// The record has no private configuration.
    #[error("quest has no configuration")]
    NoConfiguration,

    /// A public configuration set was given but is empty.
    #[error("quest has an empty public configuration set")]
    EmptyPublicConfiguration,
}

/// A round's player/partner binding could not be resolved.
///
/// Recovered by discarding the candidate quest and drawing another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// Nobody in the pool satisfies the player selector.
    #[error("no player matches selector {0:?}")]
    NoPlayer(PlayerSelector),

    /// Nobody in the pool satisfies the partner selector.
    #[error("no partner matches selector {0:?}")]
    NoPartner(PartnerSelector),

    /// Player and partner resolved to the same person.
    #[error("player and partner are the same person")]
    SamePerson,
}

/// Failure to encode or decode a stored value.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The value could not be encoded.
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: bincode::Error,
    },

    /// The stored bytes could not be decoded.
    #[error("failed to decode {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: bincode::Error,
    },
}

/// Errors surfaced by the session facade.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An operation needing at least one pooled player found none.
    #[error("the player pool is empty")]
    EmptyPool,

    /// Starting or resuming needs more players.
    #[error("not enough players: have {have}, need {need}")]
    NotEnoughPlayers { have: usize, need: usize },

    /// A player with this name is already pooled.
    #[error("player {0:?} is already in the game")]
    DuplicatePlayer(String),

    /// No pooled player has this name.
    #[error("player {0:?} is not in the game")]
    UnknownPlayer(String),

    /// Every category probability is zero.
    #[error("no category has a positive weight")]
    NoCategoryWeight,

    /// No playable quest was found within the attempt bound.
    #[error("no playable quest found after {attempts} attempts")]
    ContentExhausted { attempts: usize },

    /// A quest record was malformed.
    #[error(transparent)]
    Quest(#[from] QuestError),

    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The quest feed was not valid JSON.
    #[error("invalid quest feed: {0}")]
    Feed(#[from] serde_json::Error),
}
